// API module entry
// MCP-style tool endpoints: describe + call, plus health probes

mod handlers;
mod response;
mod types;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::error::Error as StdError;

use crate::config::AppState;
use crate::http::{build_405_response, build_options_response};
use crate::poetry::query::ThreadRandom;

pub const DESCRIBE_PATH: &str = "/mcp/describe";
pub const CALL_PATH: &str = "/mcp/call";

const READ_ONLY_ALLOW: &str = "GET, HEAD, OPTIONS";
const CALL_ALLOW: &str = "POST, OPTIONS";

/// API route handler
///
/// Dispatches to handler functions based on request path and method
pub async fn route<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let path = req.uri().path().to_string();
    let method = req.method().clone();
    let enable_cors = state.config.http.enable_cors;
    let health = &state.config.health;

    // Health probes
    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        return match method {
            Method::GET | Method::HEAD if path == health.liveness_path => {
                handlers::handle_liveness()
            }
            Method::GET | Method::HEAD => handlers::handle_readiness(state),
            Method::OPTIONS => build_options_response(READ_ONLY_ALLOW, enable_cors),
            _ => build_405_response(READ_ONLY_ALLOW),
        };
    }

    match (method, path.as_str()) {
        (Method::GET | Method::HEAD, DESCRIBE_PATH) => handlers::handle_describe(state),
        (Method::OPTIONS, DESCRIBE_PATH) => build_options_response(READ_ONLY_ALLOW, enable_cors),
        (_, DESCRIBE_PATH) => build_405_response(READ_ONLY_ALLOW),

        (Method::POST, CALL_PATH) => handlers::handle_call(req, state, &mut ThreadRandom).await,
        (Method::OPTIONS, CALL_PATH) => build_options_response(CALL_ALLOW, enable_cors),
        (_, CALL_PATH) => build_405_response(CALL_ALLOW),

        // Unknown route
        _ => response::not_found(health),
    }
}
