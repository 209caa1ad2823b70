//! Profile management handlers. None of these touch the card.

use std::fmt::Write;

use serde::Serialize;
use tabled::Tabled;
use tracing::warn;

use crate::cli::{GlobalOpts, ProfilesArgs, ProfilesCommand};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Serialize, Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    marker: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "User")]
    username: String,
    #[tabled(rename = "TLS")]
    tls: String,
}

fn rows(cfg: &Config) -> Vec<ProfileRow> {
    let default = cfg.default_profile.as_deref();
    cfg.profiles
        .iter()
        .map(|(name, p)| ProfileRow {
            marker: if Some(name.as_str()) == default { "*" } else { "" }.into(),
            name: name.clone(),
            host: p.host.clone(),
            username: p.username.clone().unwrap_or_else(|| "admin".into()),
            tls: match (p.use_tls.unwrap_or(cfg.defaults.use_tls), p.insecure) {
                (false, _) => "off".into(),
                (true, Some(true)) => "insecure".into(),
                (true, _) => "on".into(),
            },
        })
        .collect()
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "use_tls = {}", cfg.defaults.use_tls);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "host = \"{}\"", p.host);
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if let Some(port) = p.port {
            let _ = writeln!(out, "port = {port}");
        }
        if let Some(tls) = p.use_tls {
            let _ = writeln!(out, "use_tls = {tls}");
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        if p.retain_password {
            let _ = writeln!(out, "retain_password = true");
        }
    }

    out
}

fn require_profile(cfg: &Config, name: &str) -> Result<(), CliError> {
    if cfg.profiles.contains_key(name) {
        Ok(())
    } else {
        Err(CliError::ProfileNotFound {
            name: name.into(),
            available: config::available_profiles(cfg),
        })
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ProfilesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    match args.command {
        ProfilesCommand::List => {
            let rows = rows(&cfg);
            let out = output::render_list(
                &global.output,
                &rows,
                |r| ProfileRow {
                    marker: r.marker.clone(),
                    name: r.name.clone(),
                    host: r.host.clone(),
                    username: r.username.clone(),
                    tls: r.tls.clone(),
                },
                |r| r.name.clone(),
            );
            output::print_output(&out, global.quiet);
        }

        ProfilesCommand::Show => {
            output::print_output(&format_config_redacted(&cfg), global.quiet);
        }

        ProfilesCommand::Add {
            name,
            ca_cert,
            retain_password,
        } => {
            let Some(host) = global.host.clone() else {
                return Err(CliError::Validation {
                    field: "host".into(),
                    reason: "pass --host with the card's address".into(),
                });
            };
            let profile = Profile {
                host,
                username: global.user.clone(),
                port: global.port,
                use_tls: global.no_tls.then_some(false),
                insecure: global.insecure.then_some(true),
                ca_cert,
                timeout: global.timeout,
                retain_password,
                ..Profile::default()
            };
            // Trial conversion surfaces validation errors before saving.
            tlnet_config::profile_to_session_config(&profile, &cfg.defaults)?;

            if cfg.profiles.is_empty() {
                cfg.default_profile = Some(name.clone());
            }
            cfg.profiles.insert(name.clone(), profile);
            config::save_config(&cfg)?;
            output::print_done(global, &format!("Profile '{name}' saved"));
        }

        ProfilesCommand::Use { name } => {
            require_profile(&cfg, &name)?;
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::print_done(global, &format!("Default profile set to '{name}'"));
        }

        ProfilesCommand::Remove { name } => {
            require_profile(&cfg, &name)?;
            if !util::confirm(&format!("Delete profile '{name}'?"), global.yes)? {
                return Ok(());
            }
            cfg.profiles.remove(&name);
            if cfg.default_profile.as_deref() == Some(name.as_str()) {
                cfg.default_profile = cfg.profiles.keys().next().cloned();
            }
            config::save_config(&cfg)?;
            if let Err(e) = tlnet_config::forget_password(&name) {
                warn!(profile = %name, error = %e, "could not clear keyring entry");
            }
            output::print_done(global, &format!("Profile '{name}' removed"));
        }

        ProfilesCommand::SetPassword { name } => {
            let name = name.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            require_profile(&cfg, &name)?;
            let password = util::prompt_secret("Password")?;
            tlnet_config::store_password(&name, &password)?;
            output::print_done(global, &format!("Password for '{name}' stored in keyring"));
        }
    }
    Ok(())
}
