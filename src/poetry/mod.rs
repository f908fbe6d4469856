//! Poetry domain module
//!
//! Everything the MCP endpoints need and nothing HTTP-specific:
//! - `catalog`: the immutable dynasty → poems mapping built from the embedded dataset
//! - `query`: request validation, the two-stage filter and random selection
//! - `descriptor`: the tool description handed to language models

pub mod catalog;
pub mod descriptor;
mod error;
pub mod query;

pub use catalog::Catalog;
pub use descriptor::ToolDescriptor;
pub use error::QueryError;
