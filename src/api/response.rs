// API response utility functions module

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::types::{ErrorDetail, NotFoundBody};
use super::{CALL_PATH, DESCRIBE_PATH};
use crate::config::HealthConfig;
use crate::http::build_json_response;
use crate::poetry::QueryError;

/// 4xx response for a rejected query
pub fn query_error_response(err: &QueryError) -> Response<Full<Bytes>> {
    detail_response(err.status(), err.to_string())
}

/// 400 Bad Request response
pub fn bad_request(message: &str) -> Response<Full<Bytes>> {
    detail_response(StatusCode::BAD_REQUEST, message.to_string())
}

/// 408 Request Timeout response
pub fn request_timeout() -> Response<Full<Bytes>> {
    detail_response(StatusCode::REQUEST_TIMEOUT, "Request body timed out".to_string())
}

/// 404 Not Found response listing what is served
pub fn not_found(health: &HealthConfig) -> Response<Full<Bytes>> {
    let mut available_endpoints = vec![DESCRIBE_PATH.to_string(), CALL_PATH.to_string()];
    if health.enabled {
        available_endpoints.push(health.liveness_path.clone());
        available_endpoints.push(health.readiness_path.clone());
    }

    build_json_response(
        StatusCode::NOT_FOUND,
        &NotFoundBody {
            detail: "Not Found",
            available_endpoints,
        },
    )
}

fn detail_response(status: StatusCode, detail: String) -> Response<Full<Bytes>> {
    build_json_response(status, &ErrorDetail { detail })
}
