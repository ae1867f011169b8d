//! Per-request context snapshots.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::category::CategoryView;
use crate::context::{Article, CategoryNode, SiteContext, articles_with_tag};

/// A rendered markdown document and its metadata.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderedArticle {
    /// Converted HTML.
    pub text: String,
    /// Front matter of the matching article, if the URI is a known article.
    pub meta: Option<Article>,
}

/// Owned copy of the site context for one request.
///
/// Handlers narrow or enrich the snapshot; the shared [`SiteContext`] is
/// never modified.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    /// Every tag used on the site.
    pub tags: BTreeSet<String>,
    /// Top-level category nodes.
    pub categories: Vec<CategoryNode>,
    /// Articles to list (possibly filtered).
    pub articles: Vec<Article>,
    /// Tag the article list was filtered by.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Article or page being shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<RenderedArticle>,
    /// Category being listed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryView>,
}

impl Snapshot {
    /// Copy the whole site context.
    #[must_use]
    pub fn from_context(context: &SiteContext) -> Self {
        Self {
            tags: context.tags.clone(),
            categories: context.categories.clone(),
            articles: context.articles.clone(),
            tag: None,
            article: None,
            category: None,
        }
    }

    /// Copy the site context, keeping only articles tagged with `tag`.
    #[must_use]
    pub fn for_tag(context: &SiteContext, tag: &str) -> Self {
        Self {
            tags: context.tags.clone(),
            categories: context.categories.clone(),
            articles: articles_with_tag(tag, &context.articles),
            tag: Some(tag.to_owned()),
            article: None,
            category: None,
        }
    }

    /// Select an article to show.
    #[must_use]
    pub fn with_article(mut self, article: RenderedArticle) -> Self {
        self.article = Some(article);
        self
    }

    /// Select a category to list.
    #[must_use]
    pub fn with_category(mut self, category: CategoryView) -> Self {
        self.category = Some(category);
        self
    }
}
