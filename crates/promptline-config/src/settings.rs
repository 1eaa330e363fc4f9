//! Credentials and endpoints resolved from the environment.
//!
//! Nothing secret lives in source. The server binary loads `.env` with `dotenvy`
//! and then calls [`Settings::from_env`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use promptline_core::Provider;
use tracing::info;

use crate::ConfigError;

const DEFAULT_ADDR: &str = "0.0.0.0:8000";
const REDACTED: &str = "<redacted>";
const PROVIDERS: [Provider; 3] = [Provider::OpenAi, Provider::Groq, Provider::Anthropic];

/// Process-wide settings read once at startup.
///
/// `Debug` output names which credentials are set but never their values.
#[derive(Clone, Default)]
pub struct Settings {
    credentials: HashMap<Provider, String>,
    api_bases: HashMap<Provider, String>,
    /// Tavily key; when absent the DuckDuckGo backend is used.
    pub tavily_api_key: Option<String>,
    /// Listen address for the HTTP server.
    pub addr: String,
}

impl Settings {
    /// Reads settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary lookup function.
    ///
    /// Empty values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credentials = PROVIDERS
            .iter()
            .filter_map(|p| get(p.credential_env()).map(|k| (*p, k)))
            .collect();

        let api_bases = PROVIDERS
            .iter()
            .filter_map(|p| get(&api_base_env(*p)).map(|b| (*p, b)))
            .collect();

        Self {
            credentials,
            api_bases,
            tavily_api_key: get("TAVILY_API_KEY"),
            addr: get("PROMPTLINE_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string()),
        }
    }

    /// Adds a credential (used by tests and embedding applications).
    pub fn with_credential(mut self, provider: Provider, key: impl Into<String>) -> Self {
        self.credentials.insert(provider, key.into());
        self
    }

    /// Returns the API key for a provider, if configured.
    pub fn credential(&self, provider: Provider) -> Option<&str> {
        self.credentials.get(&provider).map(String::as_str)
    }

    /// Returns an API base override for a provider, if configured.
    pub fn api_base(&self, provider: Provider) -> Option<&str> {
        self.api_bases.get(&provider).map(String::as_str)
    }

    /// Fails on the first provider in `providers` without a credential.
    pub fn require<I>(&self, providers: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = Provider>,
    {
        for provider in providers {
            if self.credential(provider).is_none() {
                return Err(ConfigError::MissingCredential {
                    provider,
                    env: provider.credential_env(),
                });
            }
            info!("Credential present for {}", provider);
        }
        Ok(())
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let credentials: BTreeMap<Provider, &str> =
            self.credentials.keys().map(|p| (*p, REDACTED)).collect();

        f.debug_struct("Settings")
            .field("credentials", &credentials)
            .field("api_bases", &self.api_bases)
            .field("tavily_api_key", &self.tavily_api_key.as_ref().map(|_| REDACTED))
            .field("addr", &self.addr)
            .finish()
    }
}

fn api_base_env(provider: Provider) -> String {
    format!("{}_API_BASE", provider.to_string().to_uppercase())
}
