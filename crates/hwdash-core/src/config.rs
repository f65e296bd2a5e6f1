// ── Runtime backend configuration ──
//
// Describes *how* to reach the inventory and metrics backends. Carries
// credentials and tuning but never touches disk; the CLI builds a
// `BackendConfig` from its profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use hwdash_api::{TlsMode, TransportConfig};

use crate::filter::DebounceTiming;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    CustomCa(PathBuf),
    /// Skip verification (lab backends with self-signed certs).
    DangerAcceptInvalid,
}

/// Connection settings for one backend pair.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Inventory REST base, e.g. `https://cdim.example/cdim/api/v1/`.
    pub api_url: Url,
    /// Metrics query base, e.g. `https://cdim.example/api/v1/`.
    pub metrics_url: Url,
    pub token: Option<SecretString>,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Debounce windows for interactive list filters.
    pub debounce: DebounceTiming,
}

impl BackendConfig {
    pub fn new(api_url: Url, metrics_url: Url) -> Self {
        Self {
            api_url,
            metrics_url,
            token: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            debounce: DebounceTiming::default(),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
            token: self.token.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn transport_carries_tls_timeout_and_token() {
        let mut config = BackendConfig::new(
            Url::parse("https://cdim.local/cdim/api/v1/").unwrap(),
            Url::parse("https://cdim.local/api/v1/").unwrap(),
        );
        config.tls = TlsVerification::DangerAcceptInvalid;
        config.timeout = Duration::from_secs(5);
        config.token = Some(SecretString::from("t0ken"));

        let transport = config.transport();
        assert!(matches!(transport.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(transport.timeout, Duration::from_secs(5));
        assert_eq!(transport.token.unwrap().expose_secret(), "t0ken");
    }
}
