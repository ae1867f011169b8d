//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let [nosniff, frame_options] = security::HEADERS.map(security::layer);

    Router::new()
        .route("/", get(handlers::index::get_index))
        .route("/tag/{tag}", get(handlers::tag::get_tag))
        .route("/{*uri}", get(handlers::content::get_content))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(nosniff)
                .layer(frame_options),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use crate::test_support::{BrokenViews, Fixture};
    use crate::views::{NOT_FOUND_HTML, TemplateViews, View, ViewError, ViewRenderer};
    use quill_site::FsProbe;

    const CONTEXT: &str = r#"{
        "articles": [
            {"uri": "blog/post-x", "title": "Post X", "tags": ["rust", "web"]},
            {"uri": "blog/post-y", "title": "Post Y", "tags": ["go"]},
            {"uri": "blog/post-z", "title": "Post Z", "tags": ["rust"]},
            {"uri": "blog/rust/intro", "title": "Intro"}
        ],
        "categories": [
            {"name": "blog", "title": "Weblog",
             "articles": ["blog/post-x", "blog/post-y", "blog/post-z"],
             "children": [
                {"name": "rust", "title": "Rust Series", "articles": ["blog/rust/intro"]},
                {"name": "travel", "title": "Travel Notes"}
             ]}
        ]
    }"#;

    struct Reply {
        status: StatusCode,
        content_type: Option<String>,
        body: String,
    }

    async fn get(router: Router, path: &str, referer: Option<&str>) -> Reply {
        let mut request = Request::builder().uri(path);
        if let Some(referer) = referer {
            request = request.header(header::REFERER, referer);
        }
        let response = router
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_owned());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        Reply {
            status,
            content_type,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    fn site() -> Fixture {
        let fixture = Fixture::new();
        fixture.mkdir("content/blog/rust");
        fixture.mkdir("content/blog/travel");
        fixture.write("content/blog/post-x.md", "# X\n\nBody of *x*.");
        fixture.write("pages/contact.md", "# Contact\n\nWrite to us.");
        fixture
    }

    fn router(fixture: &Fixture) -> Router {
        create_router(fixture.state(CONTEXT))
    }

    #[tokio::test]
    async fn test_index_lists_all_articles() {
        let fixture = site();

        let reply = get(router(&fixture), "/", None).await;

        assert_eq!(reply.status, StatusCode::OK);
        for title in ["Post X", "Post Y", "Post Z", "Intro"] {
            assert!(reply.body.contains(title), "missing {title}: {}", reply.body);
        }
    }

    #[tokio::test]
    async fn test_tag_filters_in_order() {
        let fixture = site();

        let reply = get(router(&fixture), "/tag/rust", None).await;

        assert_eq!(reply.status, StatusCode::OK);
        let x = reply.body.find("Post X").unwrap();
        let z = reply.body.find("Post Z").unwrap();
        assert!(x < z, "{}", reply.body);
        assert!(!reply.body.contains("Post Y"), "{}", reply.body);
        assert!(!reply.body.contains("Intro"), "{}", reply.body);
    }

    #[tokio::test]
    async fn test_unknown_tag_lists_nothing() {
        let fixture = site();

        let reply = get(router(&fixture), "/tag/cobol", None).await;

        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.body.contains("No articles yet."), "{}", reply.body);
    }

    #[tokio::test]
    async fn test_static_file_streamed_with_content_type() {
        let fixture = site();
        fixture.write("static/css/site.css", "body { color: red }");

        let reply = get(router(&fixture), "/css/site.css", None).await;

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.content_type.as_deref(), Some("text/css"));
        assert_eq!(reply.body, "body { color: red }");
    }

    #[tokio::test]
    async fn test_referrer_recovers_relative_asset() {
        let fixture = site();
        fixture.write("static/blog/post-x/image.png", "nested");
        fixture.write("static/image.png", "top");

        let with_referrer = get(
            router(&fixture),
            "/image.png",
            Some("http://localhost:4000/blog/post-x/"),
        )
        .await;
        let without_referrer = get(router(&fixture), "/image.png", None).await;

        assert_eq!(with_referrer.body, "nested");
        assert_eq!(with_referrer.content_type.as_deref(), Some("image/png"));
        assert_eq!(without_referrer.body, "top");
    }

    #[tokio::test]
    async fn test_slug_skips_static_files() {
        let fixture = site();
        fixture.write("static/about", "raw static file");
        fixture.write("pages/about.md", "# About us");

        let reply = get(router(&fixture), "/about", None).await;

        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.body.contains("<h1>About us</h1>"), "{}", reply.body);
        assert!(!reply.body.contains("raw static file"), "{}", reply.body);
    }

    #[tokio::test]
    async fn test_article_renders_post() {
        let fixture = site();

        let reply = get(router(&fixture), "/blog/post-x", None).await;

        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.body.contains("<p>Body of <em>x</em>.</p>"), "{}", reply.body);
        assert!(reply.body.contains("Post X"), "{}", reply.body);
    }

    #[tokio::test]
    async fn test_page_renders_post() {
        let fixture = site();

        let reply = get(router(&fixture), "/contact", None).await;

        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.body.contains("<h1>Contact</h1>"), "{}", reply.body);
        assert!(reply.body.contains("<p>Write to us.</p>"), "{}", reply.body);
    }

    #[tokio::test]
    async fn test_category_lists_children_and_articles() {
        let fixture = site();

        let reply = get(router(&fixture), "/blog", None).await;

        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.body.contains("<h1>Weblog</h1>"), "{}", reply.body);
        assert_eq!(reply.body.matches("<li><a").count(), 5, "{}", reply.body);
        for title in ["Rust Series", "Travel Notes", "Post X", "Post Y", "Post Z"] {
            assert!(reply.body.contains(title), "missing {title}: {}", reply.body);
        }
    }

    #[tokio::test]
    async fn test_nested_category() {
        let fixture = site();

        let reply = get(router(&fixture), "/blog/rust/", None).await;

        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.body.contains("<h1>Rust Series</h1>"), "{}", reply.body);
        assert!(reply.body.contains("Intro"), "{}", reply.body);
    }

    #[tokio::test]
    async fn test_unresolved_is_not_found() {
        let fixture = site();

        let reply = get(router(&fixture), "/nothing/here", None).await;

        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.body, NOT_FOUND_HTML);
    }

    #[tokio::test]
    async fn test_traversal_stays_inside_roots() {
        let fixture = site();
        fixture.write("secret.txt", "top secret");

        let reply = get(router(&fixture), "/static/../../secret.txt", None).await;

        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_security_headers() {
        let fixture = site();
        let response = router(&fixture)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
    }

    #[tokio::test]
    async fn test_security_headers_on_static_files_and_not_found() {
        let fixture = site();
        fixture.write("static/app.js", "run()");

        for path in ["/app.js", "/nothing/here"] {
            let response = router(&fixture)
                .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
                .await
                .unwrap();

            for (name, value) in security::HEADERS {
                assert_eq!(response.headers()[&name], value, "{path}");
            }
        }
    }

    #[tokio::test]
    async fn test_index_view_failure_is_server_error() {
        let fixture = site();
        let state = fixture.state_with(CONTEXT, Box::new(BrokenViews), Box::new(FsProbe));

        let reply = get(create_router(state), "/", None).await;

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_view_failure_in_catch_all_is_not_found() {
        let fixture = site();
        let state = fixture.state_with(CONTEXT, Box::new(BrokenViews), Box::new(FsProbe));

        let reply = get(create_router(state), "/blog/post-x", None).await;

        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.body, NOT_FOUND_HTML);
    }

    #[tokio::test]
    async fn test_undecodable_path_is_not_found() {
        let fixture = site();

        let reply = get(router(&fixture), "/%FF", None).await;

        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.body, NOT_FOUND_HTML);
    }

    /// Built-in views with a custom not-found page.
    struct CustomNotFound(TemplateViews);

    impl ViewRenderer for CustomNotFound {
        fn render(&self, view: &View) -> Result<String, ViewError> {
            match view {
                View::NotFound => Ok("<h1>Lost?</h1>".to_owned()),
                other => self.0.render(other),
            }
        }
    }

    #[tokio::test]
    async fn test_not_found_uses_view() {
        let fixture = site();
        let views = CustomNotFound(TemplateViews::builtin());
        let state = fixture.state_with(CONTEXT, Box::new(views), Box::new(FsProbe));

        let reply = get(create_router(state), "/nothing/here", None).await;

        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.body, "<h1>Lost?</h1>");
    }

    #[tokio::test]
    async fn test_dotted_directory_serves_extensionless_file() {
        let fixture = site();
        fixture.write("static/v1.2/changelog", "fixed things");

        let reply = get(router(&fixture), "/v1.2/changelog", None).await;

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, "fixed things");
    }
}
