//! HTTP response building module
//!
//! Provides builders for protocol-level responses, decoupled from the poetry endpoints.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, SERVER};
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::config::HttpConfig;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Build JSON response
pub fn build_json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            return build_500_response();
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", JSON_CONTENT_TYPE)
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(allow: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", allow)
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(allow: &str, enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(204).header("Allow", allow);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Methods", allow)
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(413)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("413 Payload Too Large")))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from("413 Payload Too Large")))
        })
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(500)
        .header("Content-Type", JSON_CONTENT_TYPE)
        .body(Full::new(Bytes::from(r#"{"detail":"Internal Server Error"}"#)))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Stamp headers every response carries (Server, CORS)
pub fn apply_common_headers(response: &mut Response<Full<Bytes>>, http_config: &HttpConfig) {
    let headers = response.headers_mut();

    match HeaderValue::from_str(&http_config.server_name) {
        Ok(value) => {
            headers.insert(SERVER, value);
        }
        Err(_) => crate::logger::log_warning(&format!(
            "Invalid server_name for Server header: '{}'",
            http_config.server_name
        )),
    }

    if http_config.enable_cors {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn http_config(enable_cors: bool) -> HttpConfig {
        HttpConfig {
            server_name: "poetry-test".to_string(),
            enable_cors,
            max_body_size: 1024,
        }
    }

    #[tokio::test]
    async fn test_json_response() {
        let response = build_json_response(StatusCode::OK, &serde_json::json!({"title": "静夜思"}));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], JSON_CONTENT_TYPE);
        assert_eq!(body_string(response).await, r#"{"title":"静夜思"}"#);
    }

    #[test]
    fn test_405_carries_allow() {
        let response = build_405_response("POST, OPTIONS");
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()["allow"], "POST, OPTIONS");
    }

    #[test]
    fn test_options_with_cors() {
        let response = build_options_response("GET, HEAD, OPTIONS", true);
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers()["access-control-allow-methods"],
            "GET, HEAD, OPTIONS"
        );

        let response = build_options_response("GET, HEAD, OPTIONS", false);
        assert!(response
            .headers()
            .get("access-control-allow-methods")
            .is_none());
    }

    #[test]
    fn test_common_headers() {
        let mut response = build_413_response();
        apply_common_headers(&mut response, &http_config(true));
        assert_eq!(response.headers()["server"], "poetry-test");
        assert_eq!(response.headers()["access-control-allow-origin"], "*");

        let mut response = build_413_response();
        apply_common_headers(&mut response, &http_config(false));
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }
}
