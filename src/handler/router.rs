//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: body size guard, dispatch to the
//! API, common response headers and access logging.

use crate::api;
use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};
use std::convert::Infallible;
use std::error::Error as StdError;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let started = Instant::now();
    let mut entry = state
        .access_log()
        .then(|| AccessLogEntry::from_request(&req, remote_addr));

    logger::log_debug(&format!(
        "{} {} from {remote_addr} ({} headers)",
        req.method(),
        req.uri(),
        req.headers().len()
    ));

    let mut response = match check_body_size(&req, state.config.http.max_body_size) {
        Some(resp) => resp,
        None => api::route(req, &state).await,
    };

    http::apply_common_headers(&mut response, &state.config.http);

    if let Some(entry) = entry.as_mut() {
        let body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_default();
        entry.finish(response.status().as_u16(), body_bytes, started);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::poetry::Catalog;
    use hyper::{Method, StatusCode};

    fn state_with(config: Config) -> Arc<AppState> {
        Arc::new(AppState::new(config, Catalog::embedded().unwrap()))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[tokio::test]
    async fn test_declared_oversized_body_rejected_before_routing() {
        let mut config = Config::defaults();
        config.http.max_body_size = 8;
        config.logging.access_log = false;

        let req = Request::builder()
            .method(Method::POST)
            .uri("/mcp/call")
            .header("content-length", "4096")
            .body(Full::new(Bytes::from_static(b"{}")))
            .unwrap();

        let response = handle_request(req, state_with(config), peer()).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_common_headers_applied() {
        let mut config = Config::defaults();
        config.http.enable_cors = true;
        config.http.server_name = "poetry-test".to_string();
        config.logging.access_log = false;

        let req = Request::builder()
            .method(Method::GET)
            .uri("/mcp/describe")
            .body(Full::new(Bytes::new()))
            .unwrap();

        let response = handle_request(req, state_with(config), peer()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["server"], "poetry-test");
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[test]
    fn test_check_body_size() {
        let req = |len: &str| {
            Request::builder()
                .header("content-length", len)
                .body(())
                .unwrap()
        };
        assert!(check_body_size(&req("10"), 10).is_none());
        assert!(check_body_size(&req("11"), 10).is_some());
        assert!(check_body_size(&req("abc"), 10).is_none());
        assert!(check_body_size(&Request::new(()), 10).is_none());
    }
}
