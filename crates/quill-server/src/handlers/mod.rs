//! HTTP request handlers.

pub(crate) mod content;
pub(crate) mod index;
pub(crate) mod tag;
