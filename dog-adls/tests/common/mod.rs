#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::Registry;

use dog_adls::{
    AdlsConfig, AdlsConnectionBuilder, AdlsError, AdlsResult, BlobClient, BlobServiceClient,
    BlobServiceFactory, Credential, EnvSource, IdentityProvider, StaticEnv, ADLS_URL_VAR,
    CONTAINER_NAME_VAR,
};

pub const ENDPOINT: &str = "https://teststorage.blob.core.windows.net";
pub const CONTAINER: &str = "test-container";
pub const TOKEN: &str = "test-token";

pub fn valid_config() -> AdlsConfig {
    AdlsConfig::new(ENDPOINT, CONTAINER).unwrap()
}

pub fn valid_env() -> StaticEnv {
    StaticEnv::new()
        .with_var(ADLS_URL_VAR, ENDPOINT)
        .with_var(CONTAINER_NAME_VAR, CONTAINER)
}

/// Env source that counts `load` calls
#[derive(Clone)]
pub struct CountingEnv {
    inner: StaticEnv,
    loads: Arc<AtomicUsize>,
}

impl CountingEnv {
    pub fn new(inner: StaticEnv) -> Self {
        Self {
            inner,
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl EnvSource for CountingEnv {
    fn load(&self) {
        self.loads.fetch_add(1, Ordering::SeqCst);
    }

    fn var(&self, name: &str) -> Option<String> {
        self.inner.var(name)
    }
}

/// Identity provider handing out a fixed token credential
#[derive(Clone, Default)]
pub struct FakeIdentity {
    calls: Arc<AtomicUsize>,
    fail: bool,
    issued: Arc<Mutex<Option<Credential>>>,
}

impl FakeIdentity {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn issued(&self) -> Option<Credential> {
        self.issued.lock().unwrap().clone()
    }
}

impl IdentityProvider for FakeIdentity {
    fn default_credential(&self) -> AdlsResult<Credential> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AdlsError::credential(FakeFailure("no identity available")));
        }
        let credential = Credential::new(TOKEN.to_string());
        *self.issued.lock().unwrap() = Some(credential.clone());
        Ok(credential)
    }
}

/// Blob service factory returning a shared in-memory service
#[derive(Clone, Default)]
pub struct FakeFactory {
    pub service: MemoryBlobService,
    calls: Arc<AtomicUsize>,
    fail: bool,
    seen: Arc<Mutex<Vec<(String, Credential)>>>,
}

impl FakeFactory {
    pub fn new(service: MemoryBlobService) -> Self {
        Self {
            service,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Endpoint and credential of every `create` call
    pub fn seen(&self) -> Vec<(String, Credential)> {
        self.seen.lock().unwrap().clone()
    }
}

impl BlobServiceFactory for FakeFactory {
    fn create(
        &self,
        endpoint_url: &str,
        credential: &Credential,
    ) -> AdlsResult<Arc<dyn BlobServiceClient>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((endpoint_url.to_string(), credential.clone()));
        if self.fail {
            return Err(AdlsError::client(FakeFailure("endpoint unreachable")));
        }
        Ok(Arc::new(self.service.clone()))
    }
}

/// Blob service backed by a map of `(container, path) -> bytes`
#[derive(Clone, Default)]
pub struct MemoryBlobService {
    blobs: Arc<Mutex<HashMap<(String, String), Bytes>>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
    downloads: Arc<AtomicUsize>,
    lookup_error: Option<&'static str>,
}

impl MemoryBlobService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `blob_client` lookup fails with `message`
    pub fn failing_lookup(message: &'static str) -> Self {
        Self {
            lookup_error: Some(message),
            ..Self::default()
        }
    }

    pub fn with_blob(self, container: &str, path: &str, content: impl Into<Bytes>) -> Self {
        self.blobs
            .lock()
            .unwrap()
            .insert((container.to_string(), path.to_string()), content.into());
        self
    }

    /// `(container, path)` of every lookup, in order
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

impl BlobServiceClient for MemoryBlobService {
    fn blob_client(&self, container: &str, blob_path: &str) -> AdlsResult<Box<dyn BlobClient>> {
        self.requests
            .lock()
            .unwrap()
            .push((container.to_string(), blob_path.to_string()));
        if let Some(message) = self.lookup_error {
            return Err(AdlsError::transport_msg(message));
        }
        let content = self
            .blobs
            .lock()
            .unwrap()
            .get(&(container.to_string(), blob_path.to_string()))
            .cloned();
        Ok(Box::new(MemoryBlob {
            path: blob_path.to_string(),
            content,
            downloads: self.downloads.clone(),
        }))
    }
}

struct MemoryBlob {
    path: String,
    content: Option<Bytes>,
    downloads: Arc<AtomicUsize>,
}

#[async_trait]
impl BlobClient for MemoryBlob {
    async fn download(&self) -> AdlsResult<Bytes> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        self.content
            .clone()
            .ok_or_else(|| AdlsError::transport_msg(format!("The specified blob does not exist: {}", self.path)))
    }
}

#[derive(Debug)]
pub struct FakeFailure(pub &'static str);

impl fmt::Display for FakeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for FakeFailure {}

/// Fakes wired into one builder, with handles kept for assertions
pub struct Harness {
    pub env: CountingEnv,
    pub identity: FakeIdentity,
    pub factory: FakeFactory,
}

impl Harness {
    pub fn new(env: StaticEnv, service: MemoryBlobService) -> Self {
        Self {
            env: CountingEnv::new(env),
            identity: FakeIdentity::default(),
            factory: FakeFactory::new(service),
        }
    }

    pub fn builder(&self) -> AdlsConnectionBuilder {
        AdlsConnectionBuilder::new()
            .with_env(self.env.clone())
            .with_identity(self.identity.clone())
            .with_factory(self.factory.clone())
    }

    pub fn service(&self) -> &MemoryBlobService {
        &self.factory.service
    }
}

/// Records the message of every ERROR event while installed
#[derive(Clone, Default)]
pub struct ErrorLog {
    messages: Arc<Mutex<Vec<String>>>,
}

impl ErrorLog {
    /// Install as the thread's default subscriber until the guard drops
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let log = Self::default();
        let subscriber = Registry::default().with(log.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (log, guard)
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl<S: Subscriber> Layer<S> for ErrorLog {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::ERROR {
            return;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.messages.lock().unwrap().push(visitor.0);
    }
}

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}
