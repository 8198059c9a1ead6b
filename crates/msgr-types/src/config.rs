//! Global configuration types for msgr.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls
//! message pagination and other session-wide settings.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the msgr backend.
///
/// Loaded from `~/.msgr/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Number of messages returned per "load more" page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    10
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_global_config_deserialize_with_defaults() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let config: GlobalConfig = toml::from_str("page_size = 25").unwrap();
        assert_eq!(config.page_size, 25);
    }
}
