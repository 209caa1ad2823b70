//! User manager command handlers (local accounts and RADIUS).

use serde::Serialize;
use tabled::Tabled;

use tlnet_api::Session;
use tlnet_api::admin::{Permission, RadiusPermissions, UserManager, UserRole};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Serialize, Tabled)]
struct AccountRow {
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "WAN access")]
    wan_access: bool,
}

#[derive(Serialize, Tabled)]
struct PermissionRow {
    #[tabled(rename = "Bit")]
    bit: usize,
    #[tabled(rename = "Service type")]
    permission: String,
    #[tabled(rename = "Granted")]
    granted: bool,
}

fn permission_rows(perms: RadiusPermissions) -> Vec<PermissionRow> {
    Permission::ALL
        .iter()
        .enumerate()
        .map(|(bit, p)| PermissionRow {
            bit,
            permission: p.to_string(),
            granted: perms.contains(*p),
        })
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(session: &Session, args: UsersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let users = UserManager::new(session);
    match args.command {
        UsersCommand::List => {
            let mut rows = Vec::with_capacity(UserRole::ALL.len());
            for role in UserRole::ALL {
                let account = users.account(role).await?;
                rows.push(AccountRow {
                    role: role.to_string(),
                    name: account.name.unwrap_or_default(),
                    wan_access: account.wan_access,
                });
            }
            let out = output::render_list(
                &global.output,
                &rows,
                |r| AccountRow {
                    role: r.role.clone(),
                    name: r.name.clone(),
                    wan_access: r.wan_access,
                },
                |r| r.name.clone(),
            );
            output::print_output(&out, global.quiet);
        }

        UsersCommand::Set {
            role,
            name,
            wan_access,
        } => {
            let role = util::role(role);
            let password = util::prompt_secret("New password")?;
            users.set_account(role, &name, &password, wan_access).await?;
            output::print_done(global, &format!("{role} account set to '{name}'"));
        }

        UsersCommand::Radius { state } => {
            users.set_radius_enabled(state.enabled()).await?;
            output::print_done(global, &format!("RADIUS {}", util::state_word(state.enabled())));
        }

        UsersCommand::RadiusShow => {
            let server = users.radius_server().await?;
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &server,
                |s| {
                    output::render_fields(
                        &[
                            ("Server", output::or_dash(s.ip.as_deref())),
                            ("Port", output::or_dash(s.port)),
                            (
                                "Secret",
                                if s.secret.is_some() { "****" } else { "-" }.into(),
                            ),
                        ],
                        color,
                    )
                },
                |s| s.ip.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
        }

        UsersCommand::RadiusServer { server, auth_port } => {
            let secret = util::prompt_secret("Shared secret")?;
            users.set_radius_server(&server, &secret, auth_port).await?;
            output::print_done(global, &format!("RADIUS server set to {server}:{auth_port}"));
        }

        UsersCommand::Permissions { role } => {
            let perms = users.permissions(util::role(role)).await?;
            let rows = permission_rows(perms);
            let out = output::render_list(
                &global.output,
                &rows,
                |r| PermissionRow {
                    bit: r.bit,
                    permission: r.permission.clone(),
                    granted: r.granted,
                },
                |r| format!("{}={}", r.permission, u8::from(r.granted)),
            );
            output::print_output(&out, global.quiet);
        }

        UsersCommand::SetPermissions { role, permissions } => {
            let role = util::role(role);
            let perms = permissions
                .iter()
                .map(|p| p.parse::<Permission>())
                .collect::<Result<RadiusPermissions, _>>()?;

            let prompt = format!(
                "Replace RADIUS permissions for {role} (mask {})? This uploads the system configuration and restarts the card's services.",
                perms.code()
            );
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }

            let receipt = users.set_permissions(role, perms).await?;
            output::print_done(
                global,
                &format!(
                    "{role} RADIUS permissions set; card offline for about {}s",
                    receipt.offline_for.as_secs()
                ),
            );
        }
    }
    Ok(())
}
