//! Site context and content lookup for Quill.
//!
//! This crate holds everything the request handlers need to know about a
//! site without rendering anything:
//!
//! - [`SiteContext`]: articles, tags and the category tree, loaded once from
//!   a prebuilt JSON index
//! - [`Snapshot`]: per-request copy of the context enriched with the selected
//!   tag, article or category
//! - [`resolve_category`]: URI lookup in the category tree
//! - [`static_candidates`]: ordered filesystem locations for a static asset
//! - [`Probe`]: filesystem existence checks ([`FsProbe`] is the real one)
//!
//! # URI Convention
//!
//! URIs passed to this crate are request paths without the leading slash
//! (`"blog/post-x"`, `"notes/"`, `""` for the root). They are split on `/`
//! and never joined onto a filesystem path verbatim, so `..` cannot climb
//! above the root it is joined onto.

mod candidates;
mod category;
mod context;
mod error;
mod probe;
mod snapshot;

pub use candidates::{join_url, referrer_path, static_candidates, url_segments};
pub use category::{CategorySummary, CategoryView, resolve_category};
pub use context::{Article, CategoryNode, SiteContext, articles_with_tag, find_article};
pub use error::SiteError;
pub use probe::{EntryKind, Found, FsProbe, Probe, ProbeKind, ProbeOptions};
pub use snapshot::{RenderedArticle, Snapshot};
