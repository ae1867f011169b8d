//! Filesystem candidates for a request URI.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use url::Url;

/// Split a URL path into normalized segments.
///
/// Empty segments and `.` are dropped; `..` removes the previous segment and
/// is ignored when there is none.
#[must_use]
pub fn url_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    segments
}

/// Join a URL path onto a filesystem base without leaving it.
#[must_use]
pub fn join_url(base: &Path, url_path: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for segment in url_segments(url_path) {
        path.push(segment);
    }
    path
}

/// Extract the path of a `Referer` header value.
///
/// Absolute URLs are parsed with [`Url`]; bare absolute paths (`/a/b/`) are
/// accepted as-is. Returns `None` for anything else or an empty path.
#[must_use]
pub fn referrer_path(referrer: &str) -> Option<String> {
    let raw = match Url::parse(referrer) {
        Ok(url) if url.cannot_be_a_base() => return None,
        Ok(url) => url.path().to_owned(),
        Err(_) if referrer.starts_with('/') => referrer
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_owned(),
        Err(_) => return None,
    };

    let decoded = percent_decode_str(&raw).decode_utf8_lossy().into_owned();
    (!decoded.is_empty()).then_some(decoded)
}

/// Ordered locations to probe for a static asset, most specific first.
///
/// 1. `files` + referrer path + `uri` (only when a referrer path is known)
/// 2. `files` + `uri`
/// 3. `theme` + `uri`
/// 4. `site` + `uri`
///
/// The first entry recovers assets linked relatively from a page requested
/// without its trailing slash: the browser resolves `image.png` one directory
/// short, but the referrer still names the page directory.
#[must_use]
pub fn static_candidates(
    uri: &str,
    referrer: Option<&str>,
    files: &Path,
    theme: &Path,
    site: &Path,
) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(4);

    if let Some(referrer) = referrer {
        candidates.push(join_url(files, &format!("{referrer}/{uri}")));
    }
    candidates.push(join_url(files, uri));
    candidates.push(join_url(theme, uri));
    candidates.push(join_url(site, uri));

    candidates
}
