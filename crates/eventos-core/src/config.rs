// ── Runtime connection configuration ──
//
// Describes how to reach the API. Front ends build a `ClientConfig`
// (from a profile, flags, or by hand in tests) and hand it to
// `AppContext`; core never reads config files.

use std::path::PathBuf;
use std::time::Duration;

use eventos_api::{TlsMode, TransportConfig};
use url::Url;

/// API root used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed development servers).
    DangerAcceptInvalid,
}

/// Everything needed to talk to one API deployment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root including the path prefix, e.g. `http://localhost:5000/api`.
    pub api_url: Url,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig::default()
            .with_tls(tls)
            .with_timeout(self.timeout)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_system_tls_and_thirty_seconds() {
        let config = ClientConfig::new(Url::parse(DEFAULT_API_URL).unwrap());
        assert_eq!(config.api_url.as_str(), DEFAULT_API_URL);
        assert_eq!(config.tls, TlsVerification::SystemDefaults);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
