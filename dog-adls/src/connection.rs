use std::fmt;
use std::sync::Arc;

use crate::{
    AdlsConfig, AdlsError, AdlsResult, BlobServiceClient, BlobServiceFactory, Credential,
    EnvSource, IdentityProvider, ADLS_URL_VAR, CONTAINER_NAME_VAR,
};

/// Folder every document lives under inside the container
pub const BLOB_PREFIX: &str = "quant";

/// Blob path for a document: `quant/{document_key}.{extension}`.
///
/// Inputs are used verbatim; callers are responsible for passing safe keys.
pub fn blob_path(document_key: &str, extension: &str) -> String {
    format!("{}/{}.{}", BLOB_PREFIX, document_key, extension)
}

/// A config bound to a live credential and storage client
///
/// Credential and client are acquired eagerly when the connection is built
/// and owned by it for its whole life. Reads share no state with each other.
pub struct AdlsConnection {
    config: AdlsConfig,
    credential: Credential,
    client: Arc<dyn BlobServiceClient>,
}

impl AdlsConnection {
    /// Start building a connection
    pub fn builder() -> AdlsConnectionBuilder {
        AdlsConnectionBuilder::new()
    }

    /// Connect with the Azure collaborators, using `config` if given or the
    /// process environment (after loading `.env`) otherwise.
    #[cfg(feature = "azure")]
    pub fn new(config: Option<AdlsConfig>) -> AdlsResult<Self> {
        let builder = match config {
            Some(config) => Self::builder().with_config(config),
            None => Self::builder(),
        };
        builder.connect()
    }

    pub fn config(&self) -> &AdlsConfig {
        &self.config
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Read `quant/{document_key}.{extension}` from the configured container as UTF-8 text.
    ///
    /// Best effort: a missing blob, a network or permission failure and
    /// undecodable content all log one error and return `None`.
    pub async fn read_blob_content(&self, document_key: &str, extension: &str) -> Option<String> {
        let path = blob_path(document_key, extension);
        match self.fetch_text(&path).await {
            Ok(text) => {
                tracing::debug!(
                    container = self.config.container_name(),
                    blob = %path,
                    bytes = text.len(),
                    "blob read"
                );
                Some(text)
            }
            Err(e) => {
                tracing::error!(
                    container = self.config.container_name(),
                    blob = %path,
                    "Error reading blob: {}",
                    e
                );
                None
            }
        }
    }

    async fn fetch_text(&self, path: &str) -> AdlsResult<String> {
        let blob = self.client.blob_client(self.config.container_name(), path)?;
        let bytes = blob.download().await?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

impl fmt::Debug for AdlsConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdlsConnection")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AdlsConnection`]
///
/// With the `azure` feature every collaborator has a default: [`ProcessEnv`](crate::ProcessEnv),
/// [`AzureIdentity`](crate::AzureIdentity) and [`AzureBlobServiceFactory`](crate::AzureBlobServiceFactory).
pub struct AdlsConnectionBuilder {
    config: Option<AdlsConfig>,
    env: Option<Arc<dyn EnvSource>>,
    identity: Option<Arc<dyn IdentityProvider>>,
    factory: Option<Arc<dyn BlobServiceFactory>>,
}

impl AdlsConnectionBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            env: None,
            identity: None,
            factory: None,
        }
    }

    /// Use an explicit config instead of reading the environment
    pub fn with_config(mut self, config: AdlsConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub(crate) fn without_config(mut self) -> Self {
        self.config = None;
        self
    }

    /// Environment to read when no explicit config is set
    pub fn with_env<E: EnvSource + 'static>(mut self, env: E) -> Self {
        self.env = Some(Arc::new(env));
        self
    }

    pub fn with_identity<I: IdentityProvider + 'static>(mut self, identity: I) -> Self {
        self.identity = Some(Arc::new(identity));
        self
    }

    pub fn with_factory<F: BlobServiceFactory + 'static>(mut self, factory: F) -> Self {
        self.factory = Some(Arc::new(factory));
        self
    }

    /// Resolve the config, acquire a credential, then build the storage client.
    ///
    /// Environment problems are reported before any credential is requested.
    pub fn connect(self) -> AdlsResult<AdlsConnection> {
        let config = match self.config {
            Some(config) => config,
            None => config_from_env(self.env.unwrap_or_else(default_env).as_ref())?,
        };

        let identity = self.identity.map_or_else(default_identity, Ok)?;
        let factory = self.factory.map_or_else(default_factory, Ok)?;

        let credential = identity.default_credential()?;
        let client = factory.create(config.endpoint_url(), &credential)?;

        tracing::debug!(
            endpoint = config.endpoint_url(),
            container = config.container_name(),
            "ADLS connection established"
        );

        Ok(AdlsConnection {
            config,
            credential,
            client,
        })
    }
}

impl Default for AdlsConnectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn config_from_env(env: &dyn EnvSource) -> AdlsResult<AdlsConfig> {
    env.load();
    match (env.var(ADLS_URL_VAR), env.var(CONTAINER_NAME_VAR)) {
        (Some(endpoint_url), Some(container_name)) => {
            Ok(AdlsConfig::new(endpoint_url, container_name)?)
        }
        _ => Err(AdlsError::MissingEnvironment),
    }
}

fn default_env() -> Arc<dyn EnvSource> {
    Arc::new(crate::ProcessEnv)
}

#[cfg(feature = "azure")]
fn default_identity() -> AdlsResult<Arc<dyn IdentityProvider>> {
    Ok(Arc::new(crate::AzureIdentity))
}

#[cfg(not(feature = "azure"))]
fn default_identity() -> AdlsResult<Arc<dyn IdentityProvider>> {
    Err(AdlsError::MissingCollaborator("identity provider"))
}

#[cfg(feature = "azure")]
fn default_factory() -> AdlsResult<Arc<dyn BlobServiceFactory>> {
    Ok(Arc::new(crate::AzureBlobServiceFactory))
}

#[cfg(not(feature = "azure"))]
fn default_factory() -> AdlsResult<Arc<dyn BlobServiceFactory>> {
    Err(AdlsError::MissingCollaborator("blob service factory"))
}
