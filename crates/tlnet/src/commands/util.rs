//! Shared helpers for command handlers.

use secrecy::SecretString;
use tracing::debug;

use tlnet_api::admin::UserRole;
use tlnet_api::{PasswordPrompt, Scope, Session, TerminalPrompt};

use crate::cli::{GlobalOpts, RoleArg, ScopeArg};
use crate::config;
use crate::error::CliError;

/// Open an authenticated session for the active profile.
///
/// Password order: env vars, keyring, plaintext profile value, then an
/// interactive prompt. A rejected login is an error here, unlike in the
/// library, since no command can proceed without one.
pub async fn open_session(global: &GlobalOpts) -> Result<(Session, SecretString), CliError> {
    let cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);
    let (session_config, profile) = config::session_config(global, &cfg)?;

    let password = match config::stored_password(&profile, &profile_name) {
        Some(password) => password,
        None => TerminalPrompt.prompt(&profile.host)?,
    };

    debug!(profile = %profile_name, host = %profile.host, "connecting");
    let session = Session::connect(session_config, &password).await?;
    if !session.is_authenticated() {
        return Err(CliError::AuthFailed {
            host: profile.host,
            profile: profile_name,
        });
    }
    Ok((session, password))
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read a secret without echo.
pub fn prompt_secret(label: &str) -> Result<SecretString, CliError> {
    let value = rpassword::prompt_password(format!("{label}: "))?;
    if value.is_empty() {
        return Err(CliError::Validation {
            field: label.to_lowercase(),
            reason: "cannot be empty".into(),
        });
    }
    Ok(SecretString::from(value))
}

pub fn scope(arg: ScopeArg) -> Scope {
    match arg {
        ScopeArg::System => Scope::System,
        ScopeArg::Snmp => Scope::Snmp,
    }
}

pub fn role(arg: RoleArg) -> UserRole {
    match arg {
        RoleArg::Admin => UserRole::Administrator,
        RoleArg::Device => UserRole::DeviceManager,
        RoleArg::ReadOnly => UserRole::ReadOnlyUser,
    }
}

/// "enabled" / "disabled" for status messages.
pub fn state_word(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}
