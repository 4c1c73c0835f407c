//! CLI configuration: thin wrapper around `eventos_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--api-url, --insecure, etc.).

use std::sync::Arc;

use secrecy::SecretString;

use eventos_config::ConfigError;
use eventos_core::{AppContext, ClientConfig, Navigator};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use eventos_config::{
    Config, Defaults, Profile, StorageBackend, config_path, load_config_or_default, save_config,
    session_path,
};

/// Everything a command needs to know about where it talks to.
#[derive(Debug)]
pub struct Resolved {
    pub profile_name: String,
    pub profile: Profile,
    pub client: ClientConfig,
    pub storage: StorageBackend,
}

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// List profile names for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Merge the config file, the active profile and the CLI flags.
///
/// A missing profile is only an error when it was asked for by name;
/// otherwise the built-in defaults apply.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        None => Profile::default(),
    };

    // Flag > env > profile
    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let client = eventos_config::profile_to_client_config(&profile, &cfg.defaults)?;
    let storage = if global.ephemeral {
        StorageBackend::Memory
    } else {
        profile.storage.unwrap_or_default()
    };

    Ok(Resolved {
        profile_name,
        profile,
        client,
        storage,
    })
}

/// Open session storage and build the shared application context.
pub fn build_context(
    resolved: &Resolved,
    navigator: Arc<dyn Navigator>,
) -> Result<AppContext, CliError> {
    let storage = eventos_config::open_storage(resolved.storage, &resolved.profile_name);
    Ok(AppContext::new(&resolved.client, storage, navigator)?)
}

/// Password for `login`: the flag, then the shared credential chain, then
/// an interactive prompt.
pub fn resolve_password(
    flag: Option<String>,
    resolved: &Resolved,
) -> Result<SecretString, CliError> {
    if let Some(pw) = flag {
        return Ok(SecretString::from(pw));
    }

    match eventos_config::resolve_password(&resolved.profile, &resolved.profile_name) {
        Ok(pw) => Ok(pw),
        Err(ConfigError::NoCredentials { .. }) => {
            let pw = rpassword::prompt_password("Password: ").map_err(|e| {
                CliError::Validation {
                    field: "password".into(),
                    reason: format!("prompt failed: {e}"),
                }
            })?;
            Ok(SecretString::from(pw))
        }
        Err(e) => Err(e.into()),
    }
}
