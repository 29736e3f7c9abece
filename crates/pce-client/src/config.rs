use std::fmt;
use std::time::Duration;

use crate::errors::ApiError;

/// API key pair used for HTTP basic authentication.
#[derive(Clone, Default)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Connection settings for one PCE.
#[derive(Debug, Clone)]
pub struct PceConfig {
    pub fqdn: String,
    pub port: u16,
    pub org: u32,
    pub credentials: Credentials,
    /// Verify the server certificate. Disabling it is an explicit operator choice.
    pub verify_tls: bool,
    /// Per-request timeout.
    pub request_timeout_ms: u64,
}

impl Default for PceConfig {
    fn default() -> Self {
        Self {
            fqdn: String::new(),
            port: 9443,
            org: 1,
            credentials: Credentials::default(),
            verify_tls: true,
            request_timeout_ms: 60_000,
        }
    }
}

impl PceConfig {
    pub fn base_url(&self) -> String {
        format!("https://{}:{}/api/v2", self.fqdn, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Fails with [`ApiError::Config`] naming every missing setting.
    pub fn validate(&self) -> Result<(), ApiError> {
        let missing: Vec<&str> = [
            ("PCE_FQDN", self.fqdn.trim().is_empty()),
            ("PCE_API_KEY", self.credentials.api_key.is_empty()),
            ("PCE_API_SECRET", self.credentials.api_secret.is_empty()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        if !missing.is_empty() {
            return Err(ApiError::Config(format!(
                "missing required settings: {}",
                missing.join(", ")
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(ApiError::Config("request timeout must be positive".to_string()));
        }
        Ok(())
    }
}

/// How long and how often to poll an async job.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Pause between two status polls.
    pub interval_ms: u64,
    /// Give up after this many polls.
    pub max_attempts: Option<u32>,
    /// Give up once the next poll would start after this much time.
    pub timeout_ms: Option<u64>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval_ms: 5_000,
            max_attempts: None,
            timeout_ms: Some(30 * 60 * 1_000),
        }
    }
}

impl PollPolicy {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PceConfig {
        PceConfig {
            fqdn: "pce.example.com".to_string(),
            credentials: Credentials::new("api_123", "s3cret"),
            ..Default::default()
        }
    }

    #[test]
    fn base_url_uses_port_and_version() {
        assert_eq!(config().base_url(), "https://pce.example.com:9443/api/v2");
    }

    #[test]
    fn defaults_verify_tls() {
        assert!(PceConfig::default().verify_tls);
        assert_eq!(PceConfig::default().org, 1);
    }

    #[test]
    fn validate_lists_missing_settings() {
        assert!(config().validate().is_ok());

        let cfg = PceConfig {
            credentials: Credentials::new("", ""),
            ..config()
        };
        match cfg.validate() {
            Err(ApiError::Config(msg)) => {
                assert!(msg.contains("PCE_API_KEY"));
                assert!(msg.contains("PCE_API_SECRET"));
                assert!(!msg.contains("PCE_FQDN"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn debug_hides_secret() {
        let out = format!("{:?}", Credentials::new("api_123", "s3cret"));
        assert!(out.contains("api_123"));
        assert!(!out.contains("s3cret"));
    }

    #[test]
    fn poll_policy_is_bounded_by_default() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval(), Duration::from_secs(5));
        assert_eq!(policy.timeout(), Some(Duration::from_secs(1800)));
    }
}
