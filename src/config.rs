//! Toolkit configuration
//!
//! Settings are read from a YAML or JSON file (YAML is a superset, so one
//! parser handles both) and then overridden from the environment:
//!
//! | Variable               | Field                  |
//! |------------------------|------------------------|
//! | `FIVETRAN_API_KEY`     | `api_key`              |
//! | `FIVETRAN_API_SECRET`  | `api_secret`           |
//! | `FIVETRAN_API_VERSION` | `api_version`          |
//! | `FIVETRAN_BASE_URL`    | `base_url`             |
//! | `GOOGLE_SHEETS_TOKEN`  | `sheets.access_token`  |

use crate::auth::Credentials;
use crate::client::DEFAULT_BASE_URL;
use crate::error::{Error, Result};
use crate::export::DEFAULT_SHEETS_API_URL;
use crate::http::DEFAULT_API_VERSION;
use crate::pagination::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete toolkit configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolkitConfig {
    /// Fivetran API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Fivetran API secret
    #[serde(default)]
    pub api_secret: Option<String>,

    /// Version sent in the `Accept` header
    #[serde(default = "default_api_version")]
    pub api_version: u32,

    /// API root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// `limit` used on continuation pages
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Spreadsheet source settings
    #[serde(default)]
    pub sheets: SheetsConfig,
}

fn default_api_version() -> u32 {
    DEFAULT_API_VERSION
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            api_version: default_api_version(),
            base_url: default_base_url(),
            page_size: default_page_size(),
            timeout_seconds: default_timeout_seconds(),
            sheets: SheetsConfig::default(),
        }
    }
}

// ============================================================================
// Sheets Config
// ============================================================================

/// Google Sheets API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// API root
    #[serde(default = "default_sheets_url")]
    pub base_url: String,

    /// OAuth2 bearer token
    #[serde(default)]
    pub access_token: Option<String>,
}

fn default_sheets_url() -> String {
    DEFAULT_SHEETS_API_URL.to_string()
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            base_url: default_sheets_url(),
            access_token: None,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl ToolkitConfig {
    /// Parse configuration from YAML or JSON text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_yaml_str(&content)
    }

    /// Load from an optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (normally the environment)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("FIVETRAN_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(secret) = lookup("FIVETRAN_API_SECRET") {
            self.api_secret = Some(secret);
        }
        if let Some(version) = lookup("FIVETRAN_API_VERSION") {
            self.api_version = version.parse().map_err(|_| Error::InvalidConfigValue {
                field: "api_version".to_string(),
                message: format!("'{version}' is not a positive integer"),
            })?;
        }
        if let Some(url) = lookup("FIVETRAN_BASE_URL") {
            self.base_url = url;
        }
        if let Some(token) = lookup("GOOGLE_SHEETS_TOKEN") {
            self.sheets.access_token = Some(token);
        }
        self.validate()
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::InvalidConfigValue {
                field: "page_size".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.base_url.trim().is_empty() {
            return Err(Error::missing_field("base_url"));
        }
        Ok(())
    }

    /// API credentials; both halves are required
    pub fn credentials(&self) -> Result<Credentials> {
        let key = non_empty(self.api_key.as_deref()).ok_or_else(|| Error::missing_field("api_key"))?;
        let secret =
            non_empty(self.api_secret.as_deref()).ok_or_else(|| Error::missing_field("api_secret"))?;
        Ok(Credentials::new(key, secret))
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
