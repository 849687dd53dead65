//! Credential resolution for the exchange rate service.

use std::fmt;

use crate::error::NodeError;

/// Name of the credential profile the node requires from its host.
pub const CREDENTIAL_PROFILE: &str = "currencyExchangeApi";

/// The secret bundle behind the `currencyExchangeApi` profile.
///
/// Held read-only for the duration of one execution pass. The `Debug` impl
/// redacts the key so it can never leak through diagnostics.
#[derive(Clone)]
pub struct ApiCredentials {
    pub api_key: String,
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Resolves a named credential profile on behalf of the executor.
///
/// The host owns credential storage; this trait is the seam the executor
/// reaches through. The bundled implementation reads the key from the
/// application config, a workflow host would adapt its own store instead.
pub trait CredentialResolver: Send + Sync {
    fn resolve(&self, profile: &str) -> Result<ApiCredentials, NodeError>;
}

/// Config-backed resolver used by the CLI harness.
pub struct ConfigCredentialResolver {
    api_key: Option<String>,
}

impl ConfigCredentialResolver {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }
}

impl CredentialResolver for ConfigCredentialResolver {
    fn resolve(&self, profile: &str) -> Result<ApiCredentials, NodeError> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(ApiCredentials {
                api_key: key.to_string(),
            }),
            _ => Err(NodeError::Credential(profile.to_string())),
        }
    }
}
