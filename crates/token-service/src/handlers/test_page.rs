use axum::response::Html;

const TEST_PAGE: &str = include_str!("../../static/index.html");

/// Serve the browser test page.
///
/// GET /
pub async fn test_page() -> Html<&'static str> {
    Html(TEST_PAGE)
}
