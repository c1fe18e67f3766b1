use std::string::FromUtf8Error;

use thiserror::Error;

use crate::config::ConfigurationError;

/// Result type for ADLS operations
pub type AdlsResult<T> = Result<T, AdlsError>;

/// Errors that can occur while connecting to or reading from ADLS
#[derive(Error, Debug)]
pub enum AdlsError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("ADLS_URL and AZURE_STORAGE_CONTAINER_NAME must be set")]
    MissingEnvironment,

    #[error("Failed to acquire credential: {source}")]
    Credential {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to create storage client: {source}")]
    Client {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{source}")]
    Transport {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Blob content is not valid UTF-8: {0}")]
    Decode(#[from] FromUtf8Error),

    #[error("No {0} configured for this connection")]
    MissingCollaborator(&'static str),
}

impl AdlsError {
    /// Create a credential error from any error type
    pub fn credential<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Credential {
            source: Box::new(error),
        }
    }

    /// Create a client construction error from any error type
    pub fn client<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Client {
            source: Box::new(error),
        }
    }

    /// Create a transport error from any error type
    pub fn transport<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport {
            source: Box::new(error),
        }
    }

    /// Create a transport error from a plain message
    pub fn transport_msg<S: Into<String>>(message: S) -> Self {
        let message: String = message.into();
        Self::Transport {
            source: message.into(),
        }
    }
}
