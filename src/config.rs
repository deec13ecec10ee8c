use std::env;

use thiserror::Error;

/// Server identity advertised in `initialize` and `ping` responses.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_name: String,
    pub server_version: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MCP_SERVER_NAME must not be blank when set")]
    BlankServerName,
    #[error("MCP_SERVER_VERSION must not be blank when set")]
    BlankServerVersion,
}

impl Config {
    /// Reads the server identity from the environment, falling back to the
    /// crate's own name and version. A variable that is set but blank is a
    /// configuration error rather than a silent fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_name = match env::var("MCP_SERVER_NAME") {
            Ok(value) => {
                let value = value.trim().to_string();
                if value.is_empty() {
                    return Err(ConfigError::BlankServerName);
                }
                value
            }
            Err(_) => env!("CARGO_PKG_NAME").to_string(),
        };

        let server_version = match env::var("MCP_SERVER_VERSION") {
            Ok(value) => {
                let value = value.trim().to_string();
                if value.is_empty() {
                    return Err(ConfigError::BlankServerVersion);
                }
                value
            }
            Err(_) => env!("CARGO_PKG_VERSION").to_string(),
        };

        Ok(Self {
            server_name,
            server_version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test because the cases share process-wide environment state.
    #[test]
    fn env_overrides_and_defaults() {
        env::remove_var("MCP_SERVER_NAME");
        env::remove_var("MCP_SERVER_VERSION");
        let config = Config::from_env().expect("defaults should parse");
        assert_eq!(config.server_name, env!("CARGO_PKG_NAME"));
        assert_eq!(config.server_version, env!("CARGO_PKG_VERSION"));

        env::set_var("MCP_SERVER_NAME", "  review-server  ");
        env::set_var("MCP_SERVER_VERSION", "1.4.2");
        let config = Config::from_env().expect("overrides should parse");
        assert_eq!(config.server_name, "review-server");
        assert_eq!(config.server_version, "1.4.2");

        env::set_var("MCP_SERVER_NAME", "   ");
        let err = Config::from_env().expect_err("blank name must fail");
        assert!(matches!(err, ConfigError::BlankServerName));

        env::set_var("MCP_SERVER_NAME", "review-server");
        env::set_var("MCP_SERVER_VERSION", " ");
        let err = Config::from_env().expect_err("blank version must fail");
        assert!(matches!(err, ConfigError::BlankServerVersion));

        env::remove_var("MCP_SERVER_NAME");
        env::remove_var("MCP_SERVER_VERSION");
    }
}
