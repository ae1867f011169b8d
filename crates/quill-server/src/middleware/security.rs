//! Security headers set on every response.
//!
//! Only `X-Content-Type-Options` and `X-Frame-Options` are sent. Themes may
//! use inline styles and scripts, so there is no Content-Security-Policy.

use axum::http::HeaderValue;
use axum::http::header::{self, HeaderName};
use tower_http::set_header::SetResponseHeaderLayer;

/// Header name and value pairs, applied in order.
pub(crate) const HEADERS: [(HeaderName, &str); 2] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
];

/// Layer that sets one header, replacing any value a handler produced.
pub(crate) fn layer(
    (name, value): (HeaderName, &'static str),
) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}
