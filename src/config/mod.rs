#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::request::OpenMode;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_APP_NAME: &str = "QB Terms Reader";

/// Message-set country and SDK version every request set is created with.
pub const REQUEST_COUNTRY: &str = "US";
pub const REQUEST_MAJOR_VERSION: u16 = 16;
pub const REQUEST_MINOR_VERSION: u16 = 0;

/// Connection and session settings used by the session gateway.
///
/// The message-set version and error mode are not part of it: request sets
/// are always built for US 16.0 and continue on error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    pub app_id: String,
    pub app_name: String,
    /// Empty means whatever company file is currently open in the application.
    pub company_file: String,
    pub open_mode: OpenMode,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_name: DEFAULT_APP_NAME.to_string(),
            company_file: String::new(),
            open_mode: OpenMode::DontCare,
        }
    }
}

impl GatewayConfig {
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }
}

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("gateway.app_name", &self.app_name)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gateway_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.app_name, DEFAULT_APP_NAME);
        assert_eq!(config.open_mode, OpenMode::DontCare);
        assert!(config.app_id.is_empty());
        assert!(config.company_file.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_app_name_is_rejected() {
        let config = GatewayConfig::default().with_app_name("  ");
        assert!(config.validate().is_err());
    }
}
