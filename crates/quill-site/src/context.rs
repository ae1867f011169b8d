//! Site-wide content state.
//!
//! The context is produced by an external indexing step and loaded once at
//! startup. It is read-only while requests are served.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::SiteError;

/// Article metadata from front matter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// URI the article is served under (e.g. `"blog/post-x"`).
    pub uri: String,
    /// Display title.
    pub title: String,
    /// Tags, in front-matter order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Publication date as written in front matter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// URI of the owning category, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Remaining front-matter fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Article {
    /// Check whether the article carries `tag` (case-sensitive).
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// One node of the category tree.
///
/// Children are owned; the parent link is structural and reconstructed by
/// [`resolve_category`](crate::resolve_category) while walking the tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    /// URI segment naming this node.
    pub name: String,
    /// Display title (defaults to the name in views).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Sub-categories or series, in display order.
    #[serde(default)]
    pub children: Vec<CategoryNode>,
    /// URIs of the articles filed directly under this node.
    #[serde(default)]
    pub articles: Vec<String>,
}

impl CategoryNode {
    /// Title for display, falling back to the name.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// Site-wide content state shared by all requests.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteContext {
    /// Every tag used on the site.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Top-level category nodes.
    #[serde(default)]
    pub categories: Vec<CategoryNode>,
    /// All articles, in listing order.
    #[serde(default)]
    pub articles: Vec<Article>,
}

impl SiteContext {
    /// Load a context from its JSON index file.
    ///
    /// Tags are collected from the articles when the file lists none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds an invalid category tree.
    pub fn load(path: &Path) -> Result<Self, SiteError> {
        let content = std::fs::read_to_string(path).map_err(|source| SiteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let context = Self::from_json(&content)?;

        tracing::info!(
            path = %path.display(),
            articles = context.articles.len(),
            tags = context.tags.len(),
            categories = context.categories.len(),
            "Loaded site context"
        );

        Ok(context)
    }

    /// Parse and validate a context from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the category tree is invalid.
    pub fn from_json(json: &str) -> Result<Self, SiteError> {
        let mut context: Self = serde_json::from_str(json)?;
        validate_tree(&context.categories, "")?;

        if context.tags.is_empty() {
            context.tags = context
                .articles
                .iter()
                .flat_map(|a| a.tags.iter().cloned())
                .collect();
        }

        Ok(context)
    }
}

/// Sibling names must be unique, non-empty single segments so that a URI
/// resolves to at most one node.
fn validate_tree(nodes: &[CategoryNode], parent: &str) -> Result<(), SiteError> {
    let mut seen = HashSet::new();
    for node in nodes {
        if node.name.is_empty() || node.name.contains('/') {
            return Err(SiteError::InvalidTree(format!(
                "invalid category name {:?} under {:?}",
                node.name, parent
            )));
        }
        if !seen.insert(node.name.as_str()) {
            return Err(SiteError::InvalidTree(format!(
                "duplicate category {:?} under {:?}",
                node.name, parent
            )));
        }
        let path = if parent.is_empty() {
            node.name.clone()
        } else {
            format!("{parent}/{}", node.name)
        };
        validate_tree(&node.children, &path)?;
    }
    Ok(())
}

/// Articles carrying `tag`, in their original order.
///
/// An unknown tag yields an empty list.
#[must_use]
pub fn articles_with_tag(tag: &str, articles: &[Article]) -> Vec<Article> {
    articles.iter().filter(|a| a.has_tag(tag)).cloned().collect()
}

/// Find an article by URI, ignoring leading and trailing slashes.
#[must_use]
pub fn find_article<'a>(uri: &str, articles: &'a [Article]) -> Option<&'a Article> {
    let uri = uri.trim_matches('/');
    articles.iter().find(|a| a.uri.trim_matches('/') == uri)
}
