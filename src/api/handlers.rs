// MCP endpoint handlers

use chrono::Local;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use std::error::Error as StdError;
use std::time::Duration;

use super::response::{bad_request, query_error_response, request_timeout};
use super::types::{HealthStatus, NoMatchBody};
use crate::config::AppState;
use crate::http::{build_413_response, build_json_response};
use crate::logger;
use crate::poetry::query::{self, QueryOutcome, QueryRequest, RandomSource, NO_MATCH_MESSAGE};

/// GET /mcp/describe
pub fn handle_describe(state: &AppState) -> Response<Full<Bytes>> {
    build_json_response(StatusCode::OK, &state.descriptor)
}

/// POST /mcp/call
///
/// Reads at most `http.max_body_size` bytes within `performance.read_timeout`
/// seconds, then validates and runs the query.
pub async fn handle_call<B, R>(
    req: Request<B>,
    state: &AppState,
    rng: &mut R,
) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
    R: RandomSource + ?Sized,
{
    let limit = usize::try_from(state.config.http.max_body_size).unwrap_or(usize::MAX);

    let read_timeout = Duration::from_secs(state.config.performance.read_timeout);
    let collected = Limited::new(req.into_body(), limit).collect();

    let body = match tokio::time::timeout(read_timeout, collected).await {
        Err(_) => {
            logger::log_warning(&format!(
                "Request body not received within {} seconds",
                read_timeout.as_secs()
            ));
            return request_timeout();
        }
        Ok(Ok(collected)) => collected.to_bytes(),
        Ok(Err(e)) if e.is::<LengthLimitError>() => {
            logger::log_warning(&format!("Request body exceeds {limit} bytes"));
            return build_413_response();
        }
        Ok(Err(e)) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return bad_request("Failed to read request body");
        }
    };

    let query = match QueryRequest::from_slice(&body).and_then(|request| request.validate()) {
        Ok(q) => q,
        Err(e) => {
            logger::log_debug(&format!("Rejected query: {e}"));
            return query_error_response(&e);
        }
    };

    match query::run_query(&state.catalog, &query, rng, Local::now()) {
        QueryOutcome::Found(hit) => {
            logger::log_debug(&format!(
                "Query keyword='{}' dynasty={} -> {}",
                query.keyword,
                query.dynasty_label(),
                hit.title
            ));
            build_json_response(StatusCode::OK, &hit)
        }
        QueryOutcome::NoMatch => {
            logger::log_debug(&format!(
                "Query keyword='{}' dynasty={} -> no match",
                query.keyword,
                query.dynasty_label()
            ));
            build_json_response(
                StatusCode::OK,
                &NoMatchBody {
                    error: NO_MATCH_MESSAGE,
                },
            )
        }
    }
}

/// Liveness probe
pub fn handle_liveness() -> Response<Full<Bytes>> {
    build_json_response(
        StatusCode::OK,
        &HealthStatus {
            status: "ok",
            poems: None,
        },
    )
}

/// Readiness probe, reports catalog size
pub fn handle_readiness(state: &AppState) -> Response<Full<Bytes>> {
    build_json_response(
        StatusCode::OK,
        &HealthStatus {
            status: "ok",
            poems: Some(state.catalog.len()),
        },
    )
}
