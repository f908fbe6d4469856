// Poetry domain errors

use hyper::StatusCode;
use thiserror::Error;

use super::catalog::Dynasty;

/// Errors raised while building the catalog at startup
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to parse poem dataset: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unknown dynasty '{0}' in poem dataset")]
    UnknownDynasty(String),
}

/// Errors rejected at the query boundary, before any filtering happens
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("不支持的朝代，请从{choices}中选择", choices = Dynasty::choices_literal())]
    UnsupportedDynasty(String),
}

impl QueryError {
    /// HTTP status the error maps to
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UnsupportedDynasty(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_dynasty_lists_every_choice() {
        let err = QueryError::UnsupportedDynasty("汉".to_string());
        assert_eq!(
            err.to_string(),
            "不支持的朝代，请从['唐', '宋', '元', '明', '清']中选择"
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_invalid_body_status() {
        let err = QueryError::InvalidBody("expected a JSON object".to_string());
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.to_string().starts_with("Invalid request body"));
    }
}
