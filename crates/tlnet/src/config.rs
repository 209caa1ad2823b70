//! CLI configuration: thin wrapper around `tlnet_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides (--host,
//! --user, --port, ...).

use secrecy::SecretString;

use tlnet_api::SessionConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use tlnet_config::{Config, Profile, config_path, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref()).to_owned()
}

/// The active profile with flag overrides applied.
///
/// Without a stored profile, `--host` alone is enough to build one. An
/// explicitly requested profile that doesn't exist is an error.
pub fn effective_profile(global: &GlobalOpts, config: &Config) -> Result<Profile, CliError> {
    let name = active_profile_name(global, config);
    let mut profile = match (config.profiles.get(&name), &global.host) {
        (Some(stored), _) => stored.clone(),
        (None, Some(host)) if global.profile.is_none() => Profile {
            host: host.clone(),
            ..Profile::default()
        },
        (None, _) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(config),
            });
        }
        (None, _) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if let Some(ref user) = global.user {
        profile.username = Some(user.clone());
    }
    if global.port.is_some() {
        profile.port = global.port;
    }
    if global.no_tls {
        profile.use_tls = Some(false);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }
    Ok(profile)
}

/// Build the session configuration for the active profile.
pub fn session_config(
    global: &GlobalOpts,
    config: &Config,
) -> Result<(SessionConfig, Profile), CliError> {
    let profile = effective_profile(global, config)?;
    let session = tlnet_config::profile_to_session_config(&profile, &config.defaults)?;
    Ok((session, profile))
}

/// Non-interactive password for the active profile, if any source has one.
pub fn stored_password(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    tlnet_config::resolve_password(profile, profile_name)
}

pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config
            .profiles
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
