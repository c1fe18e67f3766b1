//! # dog-adls: Validated, best-effort blob reads from Azure Data Lake Storage
//!
//! `dog-adls` binds a validated [`AdlsConfig`] (account endpoint + container) to a
//! credential and a storage client, and reads one document at a time as text.
//!
//! ## Key Features
//!
//! - **Fail-fast configuration**: an HTTPS endpoint and a non-blank container, checked on construction
//! - **Best-effort reads**: a missing blob, a network failure and bad UTF-8 all come back as `None`, with one logged error
//! - **Injectable collaborators**: environment, identity provider and storage client are traits, so the
//!   connection logic runs without a network in tests
//! - **Azure by default**: `DefaultAzureCredential` + Blob Storage behind the default `azure` feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dog_adls::prelude::*;
//!
//! # async fn run() -> AdlsResult<()> {
//! // Explicit config...
//! let config = AdlsConfig::new("https://acct.blob.core.windows.net", "documents")?;
//! let connection = AdlsConnection::new(Some(config))?;
//!
//! // ...or ADLS_URL / AZURE_STORAGE_CONTAINER_NAME from the environment (and .env)
//! let from_env = AdlsConnection::new(None)?;
//!
//! // Reads quant/monthly-report.pdf
//! match connection.read_blob_content("monthly-report", "pdf").await {
//!     Some(text) => println!("{} characters", text.len()),
//!     None => println!("not available"),
//! }
//! # drop(from_env);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │   AdlsConnection    │  ← config + credential + client, read_blob_content
//! ├─────────────────────┤
//! │  EnvSource          │  ← where ADLS_URL / AZURE_STORAGE_CONTAINER_NAME come from
//! │  IdentityProvider   │  ← credential acquisition
//! │  BlobServiceFactory │  ← storage client construction
//! └─────────────────────┘
//! ```

#[cfg(feature = "azure")]
pub mod azure;
mod config;
mod connection;
mod env;
mod error;
mod legacy;
pub mod store;

// Re-export main types for clean API
#[cfg(feature = "azure")]
pub use azure::{AzureBlobServiceFactory, AzureIdentity};
pub use config::{AdlsConfig, ConfigurationError, ADLS_URL_VAR, CONTAINER_NAME_VAR};
pub use connection::{blob_path, AdlsConnection, AdlsConnectionBuilder, BLOB_PREFIX};
pub use env::{EnvSource, ProcessEnv, StaticEnv};
pub use error::{AdlsError, AdlsResult};
#[cfg(feature = "azure")]
pub use legacy::legacy_read;
pub use legacy::{legacy_read_with, LEGACY_EXTENSION};
pub use store::{BlobClient, BlobServiceClient, BlobServiceFactory, Credential, IdentityProvider};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        AdlsConfig, AdlsConnection, AdlsConnectionBuilder, AdlsError, AdlsResult,
        ConfigurationError, EnvSource,
    };
}
