//! HTTP protocol layer module
//!
//! Protocol-level responses and headers, independent of the poetry endpoints.

pub mod response;

// Re-export commonly used builders
pub use response::{
    apply_common_headers, build_405_response, build_413_response, build_json_response,
    build_options_response,
};
