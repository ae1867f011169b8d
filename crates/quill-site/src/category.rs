//! Category and series lookup.

use serde::Serialize;

use crate::context::{Article, CategoryNode, find_article};
use crate::{SiteError, url_segments};

/// Child category as shown in a category listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    /// URI segment.
    pub name: String,
    /// Display title.
    pub title: String,
    /// Full URI of the child.
    pub uri: String,
}

/// A resolved category node with its children and articles.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryView {
    /// URI segment of the node.
    pub name: String,
    /// Display title.
    pub title: String,
    /// Full URI of the node.
    pub uri: String,
    /// URI of the parent node, `None` for top-level categories.
    pub parent: Option<String>,
    /// Direct children, in tree order.
    pub children: Vec<CategorySummary>,
    /// Articles filed directly under the node, in tree order.
    pub articles: Vec<Article>,
}

/// Resolve `uri` against the category tree.
///
/// Every path segment must name a child of the previous node; article
/// references are looked up in `articles` and skipped when dangling.
///
/// # Errors
///
/// Returns [`SiteError::CategoryNotFound`] for an empty URI or when any
/// segment has no matching node.
pub fn resolve_category(
    uri: &str,
    categories: &[CategoryNode],
    articles: &[Article],
) -> Result<CategoryView, SiteError> {
    let not_found = || SiteError::CategoryNotFound(uri.to_owned());

    let segments = url_segments(uri);
    let (last, ancestors) = segments.split_last().ok_or_else(not_found)?;

    let mut level = categories;
    for segment in ancestors {
        let node = level.iter().find(|n| n.name == *segment).ok_or_else(not_found)?;
        level = &node.children;
    }
    let node = level.iter().find(|n| n.name == *last).ok_or_else(not_found)?;

    let path = segments.join("/");
    let parent = (!ancestors.is_empty()).then(|| ancestors.join("/"));

    let children = node
        .children
        .iter()
        .map(|child| CategorySummary {
            name: child.name.clone(),
            title: child.display_title().to_owned(),
            uri: format!("{path}/{}", child.name),
        })
        .collect();

    let node_articles = node
        .articles
        .iter()
        .filter_map(|article_uri| {
            let found = find_article(article_uri, articles);
            if found.is_none() {
                tracing::debug!(category = %path, article = %article_uri, "Dangling article reference");
            }
            found.cloned()
        })
        .collect();

    Ok(CategoryView {
        name: node.name.clone(),
        title: node.display_title().to_owned(),
        uri: path,
        parent,
        children,
        articles: node_articles,
    })
}
