//! Request handler module
//!
//! - `router`: request entry point, guards, access logging

pub mod router;

pub use router::handle_request;
