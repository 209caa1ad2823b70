//! Syslog command handlers.

use serde::Serialize;
use tabled::Tabled;

use tlnet_api::Session;
use tlnet_api::admin::Syslog;

use crate::cli::{GlobalOpts, SyslogArgs, SyslogCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Serialize, Tabled)]
struct ServerRow {
    #[tabled(rename = "Slot")]
    slot: usize,
    #[tabled(rename = "Server")]
    server: String,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &Session,
    args: SyslogArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let syslog = Syslog::new(session);
    match args.command {
        SyslogCommand::List => {
            let servers: Vec<ServerRow> = syslog
                .servers()
                .await?
                .into_iter()
                .enumerate()
                .map(|(i, server)| ServerRow { slot: i + 1, server })
                .collect();
            let out = output::render_list(
                &global.output,
                &servers,
                |s| ServerRow {
                    slot: s.slot,
                    server: s.server.clone(),
                },
                |s| s.server.clone(),
            );
            output::print_output(&out, global.quiet);
        }
        SyslogCommand::State { state } => {
            syslog.set_enabled(state.enabled()).await?;
            output::print_done(
                global,
                &format!("Remote syslog {}", util::state_word(state.enabled())),
            );
        }
        SyslogCommand::Add { server } => {
            syslog.add_server(&server).await?;
            output::print_done(global, &format!("Syslog server {server} configured"));
        }
        SyslogCommand::Remove { server } => {
            syslog.remove_server(&server).await?;
            output::print_done(global, &format!("Syslog server {server} removed"));
        }
        SyslogCommand::Clear => {
            if !util::confirm("Remove all syslog servers?", global.yes)? {
                return Ok(());
            }
            syslog.clear_servers().await?;
            output::print_done(global, "Syslog servers cleared");
        }
    }
    Ok(())
}
