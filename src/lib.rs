use std::sync::Arc;

pub mod config;
pub mod errors;
pub mod logging;
pub mod mcp;
pub mod registry;

use registry::ToolRegistry;

/// Per-process state shared by all in-flight requests: the advertised server
/// identity and the tool table, which is populated once at startup and only
/// read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub server_name: Arc<str>,
    pub server_version: Arc<str>,
    pub registry: Arc<ToolRegistry>,
}

impl AppState {
    pub fn new(server_name: String, server_version: String, registry: Arc<ToolRegistry>) -> Self {
        Self {
            server_name: Arc::<str>::from(server_name),
            server_version: Arc::<str>::from(server_version),
            registry,
        }
    }

    pub fn from_config(config: &config::Config, registry: Arc<ToolRegistry>) -> Self {
        Self::new(
            config.server_name.clone(),
            config.server_version.clone(),
            registry,
        )
    }
}
