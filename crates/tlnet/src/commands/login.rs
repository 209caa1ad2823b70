//! Login command: run the handshake and report the outcome.

use serde::Serialize;
use tracing::warn;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct LoginReport {
    profile: String,
    host: String,
    url: String,
    username: String,
    authenticated: bool,
}

pub async fn handle(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (session, password) = util::open_session(global).await?;

    let cfg = config::load_config_or_default();
    let profile = config::active_profile_name(global, &cfg);
    if args.save_password {
        if cfg.profiles.contains_key(&profile) {
            tlnet_config::store_password(&profile, &password)?;
            output::print_done(global, &format!("Password for '{profile}' stored in keyring"));
        } else {
            warn!(profile = %profile, "no such profile, password not stored");
        }
    }

    let report = LoginReport {
        profile,
        host: session.host().unwrap_or_default(),
        url: session.base_url().map(|u| u.to_string())?,
        username: session.username().to_owned(),
        authenticated: session.is_authenticated(),
    };
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &report,
        |r| {
            output::render_fields(
                &[
                    ("Profile", r.profile.clone()),
                    ("Card", r.url.clone()),
                    ("User", r.username.clone()),
                    ("Status", "logged in".into()),
                ],
                color,
            )
        },
        |r| r.host.clone(),
    );
    output::print_output(&out, global.quiet);
    session.close();
    Ok(())
}
