// Application state module
// Read-only state shared by every connection

use crate::poetry::{Catalog, ToolDescriptor};

use super::types::Config;

/// Application state
///
/// Built once at startup and shared through `Arc` without locks; nothing in
/// here changes while the server runs.
pub struct AppState {
    pub config: Config,
    pub catalog: Catalog,
    pub descriptor: ToolDescriptor,
}

impl AppState {
    pub fn new(config: Config, catalog: Catalog) -> Self {
        Self {
            config,
            catalog,
            descriptor: ToolDescriptor::new(),
        }
    }

    /// Whether access lines should be written
    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
