// API body types
// JSON shapes returned by the MCP endpoints besides the poem itself

use serde::Serialize;

/// Soft no-match result, sent with 200
#[derive(Debug, Serialize)]
pub struct NoMatchBody {
    pub error: &'static str,
}

/// Protocol-level error body, sent with a 4xx status
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct NotFoundBody {
    pub detail: &'static str,
    pub available_endpoints: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    /// Catalog size, reported by the readiness probe only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poems: Option<usize>,
}
