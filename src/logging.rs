//! Middleware for logging requests and responses.

use axum::{extract::Request, http::header::CONTENT_TYPE, middleware::Next, response::Response};

const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated
/// and the full body logged at the `debug` level. Password form fields are
/// redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body_text) = extract_parts_and_body_text_from_request(request).await;

    let is_form_post = parts.method == axum::http::Method::POST
        && parts.headers.get(CONTENT_TYPE)
            == Some(&"application/x-www-form-urlencoded".parse().unwrap());

    if is_form_post {
        let display_text = redact_form_field(&body_text, "password");
        let display_text = redact_form_field(&display_text, "confirm_password");
        log_request(&parts, &display_text);
    } else {
        log_request(&parts, &body_text);
    }

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body_text) = extract_parts_and_body_text_from_response(response).await;
    log_response(&parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

fn redact_form_field(form_text: &str, field_name: &str) -> String {
    let field_start = form_text.find(&format!("{field_name}="));

    let start = match field_start {
        Some(field_pos) => field_pos,
        None => return form_text.to_string(),
    };

    let field_end = form_text[start..].find('&');
    let end = match field_end {
        Some(end) => start + end,
        None => form_text.len(),
    };
    let field = &form_text[start..end];

    form_text.replace(field, &format!("{field_name}=********"))
}

async fn extract_parts_and_body_text_from_request(
    request: Request,
) -> (axum::http::request::Parts, String) {
    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    (parts, String::from_utf8_lossy(&body_bytes).to_string())
}

async fn extract_parts_and_body_text_from_response(
    response: Response,
) -> (axum::http::response::Parts, String) {
    let (parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    (parts, String::from_utf8_lossy(&body_bytes).to_string())
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {parts:#?}\nbody: {:}...",
            &body[..LOG_BODY_LENGTH_LIMIT]
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {parts:#?}\nbody: {body:?}");
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {parts:#?}\nbody: {:}...",
            &body[..LOG_BODY_LENGTH_LIMIT]
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {parts:#?}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod redact_form_field_tests {
    use super::redact_form_field;

    #[test]
    fn redacts_field_in_middle() {
        let form_text = "username=budi&password=hunter2&remember_me=on";

        let got = redact_form_field(form_text, "password");

        assert_eq!(got, "username=budi&password=********&remember_me=on");
    }

    #[test]
    fn redacts_field_at_end() {
        let form_text = "username=budi&password=hunter2";

        let got = redact_form_field(form_text, "password");

        assert_eq!(got, "username=budi&password=********");
    }

    #[test]
    fn leaves_text_without_field_unchanged() {
        let form_text = "username=budi&remember_me=on";

        let got = redact_form_field(form_text, "password");

        assert_eq!(got, form_text);
    }
}
