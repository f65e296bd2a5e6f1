//! CLI configuration: thin wrapper around `hwdash_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--api-url, --metrics-url, --token, --insecure, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use hwdash_core::{BackendConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use hwdash_config::{Config, Profile, config_path, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

fn available_profiles(config: &Config) -> String {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    names.sort_unstable();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Build the `BackendConfig` for this invocation.
///
/// Flags override the profile. Without a profile, both URLs must come from
/// flags or environment.
pub fn build_backend_config(global: &GlobalOpts, cfg: &Config) -> Result<BackendConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut backend = match cfg.profiles.get(&profile_name) {
        Some(profile) => {
            let mut profile = profile.clone();
            if let Some(ref url) = global.api_url {
                profile.api_url.clone_from(url);
            }
            if let Some(ref url) = global.metrics_url {
                profile.metrics_url.clone_from(url);
            }
            hwdash_config::profile_to_backend_config(&profile, &profile_name, &cfg.defaults)?
        }
        None => {
            let (Some(api_url), Some(metrics_url)) = (&global.api_url, &global.metrics_url)
            else {
                if global.profile.is_some() {
                    return Err(CliError::ProfileNotFound {
                        name: profile_name,
                        available: available_profiles(cfg),
                    });
                }
                return Err(CliError::NoConfig {
                    path: config_path().display().to_string(),
                });
            };
            let profile = Profile {
                api_url: api_url.clone(),
                metrics_url: metrics_url.clone(),
                token: None,
                token_env: None,
                ca_cert: None,
                insecure: None,
                timeout: None,
            };
            hwdash_config::profile_to_backend_config(&profile, &profile_name, &cfg.defaults)?
        }
    };

    if let Some(ref token) = global.token {
        backend.token = Some(SecretString::from(token.clone()));
    }
    if global.insecure {
        backend.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        backend.timeout = Duration::from_secs(secs);
    }

    Ok(backend)
}
