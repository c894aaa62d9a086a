use axum::{body::Body, http::Response};
use scraper::Html;

/// Read the full response body and parse it as an HTML document.
pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");
    let text = String::from_utf8_lossy(&body);

    Html::parse_document(&text)
}

/// Assert that the parser did not record any errors for the document.
#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "want valid HTML, got errors: {:?}",
        html.errors
    );
}
