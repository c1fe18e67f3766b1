//! Validated connection settings.
//!
//! An [`AdlsConfig`] can only be obtained through [`AdlsConfig::new`] (or by
//! deserializing, which routes through the same checks), so holding one means
//! both fields are usable:
//!
//! ```rust
//! use dog_adls::AdlsConfig;
//!
//! let config = AdlsConfig::new("https://acct.blob.core.windows.net", "  papers  ").unwrap();
//! assert_eq!(config.container_name(), "papers");
//!
//! assert!(AdlsConfig::new("http://acct.blob.core.windows.net", "papers").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding the storage account endpoint
pub const ADLS_URL_VAR: &str = "ADLS_URL";

/// Environment variable holding the container name
pub const CONTAINER_NAME_VAR: &str = "AZURE_STORAGE_CONTAINER_NAME";

const SECURE_SCHEME: &str = "https://";

/// Validation failures raised while building an [`AdlsConfig`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("ADLS URL must be a valid HTTPS URL")]
    InvalidEndpoint,

    #[error("Container name cannot be empty")]
    EmptyContainerName,
}

/// Storage account endpoint and container, validated on construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAdlsConfig")]
pub struct AdlsConfig {
    #[serde(rename = "adls_url")]
    endpoint_url: String,
    container_name: String,
}

impl AdlsConfig {
    /// Validate and build a config.
    ///
    /// The endpoint must start with `https://`. The container name is trimmed
    /// and must not be empty afterwards. Nothing else is normalized.
    pub fn new<U, C>(endpoint_url: U, container_name: C) -> Result<Self, ConfigurationError>
    where
        U: Into<String>,
        C: AsRef<str>,
    {
        let endpoint_url = endpoint_url.into();
        if endpoint_url.is_empty() || !endpoint_url.starts_with(SECURE_SCHEME) {
            return Err(ConfigurationError::InvalidEndpoint);
        }

        let container_name = container_name.as_ref().trim();
        if container_name.is_empty() {
            return Err(ConfigurationError::EmptyContainerName);
        }

        Ok(Self {
            endpoint_url,
            container_name: container_name.to_string(),
        })
    }

    /// Storage account endpoint, e.g. `https://acct.blob.core.windows.net`
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Container holding the blobs (already trimmed)
    pub fn container_name(&self) -> &str {
        &self.container_name
    }
}

#[derive(Deserialize)]
struct RawAdlsConfig {
    adls_url: String,
    container_name: String,
}

impl TryFrom<RawAdlsConfig> for AdlsConfig {
    type Error = ConfigurationError;

    fn try_from(raw: RawAdlsConfig) -> Result<Self, Self::Error> {
        AdlsConfig::new(raw.adls_url, raw.container_name)
    }
}
