//! Shared configuration for the eventos tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! session storage selection, and translation to
//! `eventos_core::ClientConfig`. The CLI layers its flag overrides on top.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;
use tracing::debug;

use eventos_core::{
    ClientConfig, DEFAULT_API_URL, DurableStorage, FileStorage, MemoryStorage, StorageError,
    TlsVerification,
};

mod keyring_store;

pub use keyring_store::KeyringStorage;

/// Keyring service name for every stored secret.
pub const KEYRING_SERVICE: &str = "eventos";

/// Environment variable consulted for the account password.
pub const PASSWORD_ENV: &str = "EVENTOS_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named API profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// `name`, else the configured default, else `"default"`.
    pub fn profile_name(&self, name: Option<&str>) -> String {
        name.map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// Where the session token and user are kept between runs.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageBackend {
    /// JSON file under the platform data directory.
    #[default]
    File,
    /// OS keyring, one entry per key.
    Keyring,
    /// Nothing survives the process.
    Memory,
}

/// A named API profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// API root, e.g. "http://localhost:5000/api".
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Account email used by `login` when none is given.
    pub email: Option<String>,

    /// Password (plaintext; prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Session storage backend.
    pub storage: Option<StorageBackend>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            email: None,
            password: None,
            password_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            storage: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "eventos", "eventos")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// File holding the stored session of `profile_name`.
pub fn session_path(profile_name: &str) -> PathBuf {
    let dir = project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    );
    dir.join("sessions").join(format!("{profile_name}.json"))
}

fn dirs_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("eventos");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
///
/// Environment keys use `__` for nesting: `EVENTOS_DEFAULT_PROFILE`,
/// `EVENTOS_DEFAULTS__TIMEOUT`.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("EVENTOS_").ignore(&["PASSWORD"]).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    debug!(path = %path.display(), "config saved");
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_entry(profile_name: &str, key: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{key}"))
}

/// Resolve the account password from the credential chain (no CLI flag
/// and no prompt): profile `password_env`, then `EVENTOS_PASSWORD`, then
/// the keyring, then plaintext in the profile.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Global env var
    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(profile_name, "password") {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Save a password to the system keyring for `profile_name`.
pub fn store_password(profile_name: &str, password: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name, "password")?.set_password(password.expose_secret())?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ClientConfig` from a profile and the global defaults.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let api_url: url::Url = profile
        .api_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", profile.api_url),
        })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(ClientConfig {
        api_url,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
    })
}

/// Open the session storage a profile asks for.
pub fn open_storage(backend: StorageBackend, profile_name: &str) -> Arc<dyn DurableStorage> {
    debug!(%backend, profile = profile_name, "opening session storage");
    match backend {
        StorageBackend::File => Arc::new(FileStorage::new(session_path(profile_name))),
        StorageBackend::Keyring => Arc::new(KeyringStorage::new(profile_name)),
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn profile_defaults_to_local_api() {
        let profile: Profile = toml::from_str("").unwrap();
        assert_eq!(profile.api_url, DEFAULT_API_URL);
        assert_eq!(profile.storage, None);
    }

    #[test]
    fn parses_full_config() {
        let cfg: Config = toml::from_str(
            r#"
            default_profile = "staging"

            [defaults]
            output = "json"
            timeout = 10

            [profiles.staging]
            api_url = "https://eventos.example.com/api"
            email = "ana@example.com"
            password_env = "STAGING_PW"
            storage = "keyring"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.profile_name(None), "staging");
        assert_eq!(cfg.profile_name(Some("other")), "other");
        let staging = &cfg.profiles["staging"];
        assert_eq!(staging.storage, Some(StorageBackend::Keyring));
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.color, "auto");
    }

    #[test]
    fn client_config_follows_tls_precedence() {
        let defaults = Defaults::default();
        let mut profile = Profile {
            ca_cert: Some(PathBuf::from("/tmp/ca.pem")),
            ..Profile::default()
        };

        let cfg = profile_to_client_config(&profile, &defaults).unwrap();
        assert_eq!(cfg.tls, TlsVerification::CustomCa(PathBuf::from("/tmp/ca.pem")));
        assert_eq!(cfg.timeout, Duration::from_secs(30));

        profile.insecure = Some(true);
        profile.timeout = Some(5);
        let cfg = profile_to_client_config(&profile, &defaults).unwrap();
        assert_eq!(cfg.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_url_is_a_validation_error() {
        let profile = Profile {
            api_url: "not a url".into(),
            ..Profile::default()
        };
        let err = profile_to_client_config(&profile, &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "api_url"));
    }

    #[test]
    fn plaintext_password_is_last_resort() {
        let profile = Profile {
            password: Some("from-file".into()),
            password_env: Some("EVENTOS_TEST_UNSET_VARIABLE".into()),
            ..Profile::default()
        };
        // Only meaningful when the global env var is not set in the test
        // environment.
        if std::env::var(PASSWORD_ENV).is_err() {
            let pw = resolve_password(&profile, "eventos-config-test-profile").unwrap();
            assert_eq!(pw.expose_secret(), "from-file");
        }
    }

    #[test]
    fn storage_backend_names() {
        assert_eq!(StorageBackend::Keyring.to_string(), "keyring");
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
    }

    #[test]
    fn session_paths_are_per_profile() {
        let a = session_path("a");
        let b = session_path("b");
        assert_ne!(a, b);
        assert!(a.ends_with("sessions/a.json"));
    }
}
