//! Gateway configuration.
//!
//! An explicit config object injected into [`crate::Gateway::new`] rather
//! than ambient process state, so the gateway can be pointed at a fake
//! endpoint with fake credentials in tests.

use crate::error::ClientError;

pub const API_KEY_VAR: &str = "INKSIGN_API_KEY";
pub const ENVIRONMENT_VAR: &str = "INKSIGN_ENVIRONMENT";

/// Which signing-service platform to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Demo,
    Prod,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Demo => "https://api-sandbox.yousign.app/v3",
            Self::Prod => "https://api.yousign.app/v3",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "demo" => Some(Self::Demo),
            "prod" => Some(Self::Prod),
            _ => None,
        }
    }
}

/// Credentials and endpoint selection for the gateway.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub environment: Environment,
    /// Overrides the environment's base URL when set (tests).
    pub base_url: Option<String>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, environment: Environment) -> Self {
        Self {
            api_key: api_key.into(),
            environment,
            base_url: None,
        }
    }

    /// Read the configuration from `INKSIGN_API_KEY` and
    /// `INKSIGN_ENVIRONMENT` (defaults to `demo`).
    ///
    /// A missing API key fails fast here, before any request is built.
    pub fn from_env() -> Result<Self, ClientError> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ClientError::Config(format!("{API_KEY_VAR} is not set in the environment"))
            })?;
        let environment = match std::env::var(ENVIRONMENT_VAR) {
            Ok(value) => Environment::parse(&value).ok_or_else(|| {
                ClientError::Config(format!(
                    "{ENVIRONMENT_VAR} must be 'demo' or 'prod', got '{value}'"
                ))
            })?,
            Err(_) => Environment::Demo,
        };
        Ok(Self::new(api_key, environment))
    }

    /// Point the gateway at an arbitrary base URL (no trailing slash).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
    }

    pub(crate) fn validate(&self) -> Result<(), ClientError> {
        if self.api_key.trim().is_empty() {
            return Err(ClientError::Config(
                "the signing-service API key is empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environments_select_platform_urls() {
        assert_eq!(
            Environment::Demo.base_url(),
            "https://api-sandbox.yousign.app/v3"
        );
        assert_eq!(Environment::Prod.base_url(), "https://api.yousign.app/v3");
        assert_eq!(Environment::parse("demo"), Some(Environment::Demo));
        assert_eq!(Environment::parse("staging"), None);
    }

    #[test]
    fn override_wins_over_environment() {
        let config =
            ClientConfig::new("key", Environment::Demo).with_base_url("http://127.0.0.1:9999");
        assert_eq!(config.resolved_base_url(), "http://127.0.0.1:9999");
    }

    #[test]
    fn empty_api_key_is_a_config_error() {
        let config = ClientConfig::new("  ", Environment::Demo);
        assert!(matches!(config.validate(), Err(ClientError::Config(_))));
    }
}
