use std::collections::HashMap;

/// Source of environment-style settings for [`AdlsConnection`](crate::AdlsConnection)
pub trait EnvSource: Send + Sync {
    /// Load settings from external files (e.g. `.env`) into the source
    fn load(&self);

    /// Look up a variable. Unset and empty values are both `None`.
    fn var(&self, name: &str) -> Option<String>;
}

/// Process environment, seeded from a `.env` file when one is found
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn load(&self) {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "no .env file loaded");
        }
    }

    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|value| !value.is_empty())
    }
}

/// Fixed set of variables, independent of the process environment
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    vars: HashMap<String, String>,
}

impl StaticEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a variable
    pub fn with_var<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for StaticEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for StaticEnv {
    fn load(&self) {}

    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).filter(|value| !value.is_empty()).cloned()
    }
}
