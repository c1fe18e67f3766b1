use std::any::Any;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::AdlsResult;

/// Opaque credential handle produced by an [`IdentityProvider`]
///
/// The connection never looks inside; a [`BlobServiceFactory`] recovers the
/// concrete type it expects with [`Credential::downcast_ref`].
#[derive(Clone)]
pub struct Credential(Arc<dyn Any + Send + Sync>);

impl Credential {
    pub fn new<T: Any + Send + Sync>(inner: T) -> Self {
        Self(Arc::new(inner))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Whether two handles refer to the same underlying credential
    pub fn ptr_eq(&self, other: &Credential) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// Acquires credentials for the storage service
pub trait IdentityProvider: Send + Sync {
    /// Acquire the default credential for this environment
    fn default_credential(&self) -> AdlsResult<Credential>;
}

/// Builds storage service clients
pub trait BlobServiceFactory: Send + Sync {
    /// Create a client for the account at `endpoint_url`, authorized by `credential`
    fn create(
        &self,
        endpoint_url: &str,
        credential: &Credential,
    ) -> AdlsResult<Arc<dyn BlobServiceClient>>;
}

/// Account-level storage client
pub trait BlobServiceClient: Send + Sync {
    /// Get a handle for one blob in one container
    fn blob_client(&self, container: &str, blob_path: &str) -> AdlsResult<Box<dyn BlobClient>>;
}

/// Handle for a single blob
#[async_trait]
pub trait BlobClient: Send + Sync {
    /// Download the whole blob
    async fn download(&self) -> AdlsResult<Bytes>;
}
