//! Production collaborators backed by the Azure SDK.
//!
//! [`AzureIdentity`] resolves credentials through `DefaultAzureCredential`
//! (environment, workload identity, managed identity, Azure CLI). Token
//! exchange happens lazily on the first request, so building a connection
//! does not touch the network.

use std::sync::Arc;

use async_trait::async_trait;
use azure_core::auth::TokenCredential;
use azure_identity::{DefaultAzureCredential, TokenCredentialOptions};
use azure_storage::{CloudLocation, StorageCredentials};
use azure_storage_blobs::prelude::{BlobClient as AzureBlobClient, BlobServiceClient as AzureServiceClient, ClientBuilder};
use bytes::Bytes;
use url::Url;

use crate::{AdlsError, AdlsResult, BlobClient, BlobServiceClient, BlobServiceFactory, Credential, IdentityProvider};

/// `DefaultAzureCredential` as an [`IdentityProvider`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AzureIdentity;

impl IdentityProvider for AzureIdentity {
    fn default_credential(&self) -> AdlsResult<Credential> {
        let credential = DefaultAzureCredential::create(TokenCredentialOptions::default())
            .map_err(AdlsError::credential)?;
        let credential: Arc<dyn TokenCredential> = Arc::new(credential);
        Ok(Credential::new(credential))
    }
}

/// Builds Azure Blob service clients from credentials issued by [`AzureIdentity`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AzureBlobServiceFactory;

impl BlobServiceFactory for AzureBlobServiceFactory {
    fn create(
        &self,
        endpoint_url: &str,
        credential: &Credential,
    ) -> AdlsResult<Arc<dyn BlobServiceClient>> {
        let token_credential = credential
            .downcast_ref::<Arc<dyn TokenCredential>>()
            .ok_or_else(|| client_error("credential was not issued by an Azure identity provider"))?
            .clone();

        let location = CloudLocation::Custom {
            account: account_name(endpoint_url)?,
            uri: endpoint_url.trim_end_matches('/').to_string(),
        };
        let service = ClientBuilder::with_location(
            location,
            StorageCredentials::token_credential(token_credential),
        )
        .blob_service_client();

        Ok(Arc::new(AzureBlobService { service }))
    }
}

/// Account name is the first label of the endpoint host
/// (`https://acct.blob.core.windows.net` -> `acct`).
fn account_name(endpoint_url: &str) -> AdlsResult<String> {
    let url = Url::parse(endpoint_url).map_err(AdlsError::client)?;
    url.host_str()
        .and_then(|host| host.split('.').next())
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .ok_or_else(|| client_error(format!("no storage account in endpoint {endpoint_url}")))
}

fn client_error<S: Into<String>>(message: S) -> AdlsError {
    let message: String = message.into();
    AdlsError::Client {
        source: message.into(),
    }
}

struct AzureBlobService {
    service: AzureServiceClient,
}

impl BlobServiceClient for AzureBlobService {
    fn blob_client(&self, container: &str, blob_path: &str) -> AdlsResult<Box<dyn BlobClient>> {
        let client = self.service.container_client(container).blob_client(blob_path);
        Ok(Box::new(AzureBlob { client }))
    }
}

struct AzureBlob {
    client: AzureBlobClient,
}

#[async_trait]
impl BlobClient for AzureBlob {
    async fn download(&self) -> AdlsResult<Bytes> {
        let content = self
            .client
            .get_content()
            .await
            .map_err(AdlsError::transport)?;
        Ok(Bytes::from(content))
    }
}
