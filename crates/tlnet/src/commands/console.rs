//! Console (SSH/Telnet) command handlers.

use serde::Serialize;

use tlnet_api::Session;
use tlnet_api::admin::Console;

use crate::cli::{ConsoleArgs, ConsoleCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct ConsolePorts {
    ssh_port: Option<u16>,
    telnet_port: Option<u16>,
}

pub async fn handle(
    session: &Session,
    args: ConsoleArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let console = Console::new(session);
    match args.command {
        ConsoleCommand::Show => {
            let ports = ConsolePorts {
                ssh_port: console.ssh_port().await?,
                telnet_port: console.telnet_port().await?,
            };
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &ports,
                |p| {
                    output::render_fields(
                        &[
                            ("SSH port", output::or_dash(p.ssh_port)),
                            ("Telnet port", output::or_dash(p.telnet_port)),
                        ],
                        color,
                    )
                },
                |p| format!("{}\n{}", output::or_dash(p.ssh_port), output::or_dash(p.telnet_port)),
            );
            output::print_output(&out, global.quiet);
        }
        ConsoleCommand::Ssh { state } => {
            console.set_ssh_enabled(state.enabled()).await?;
            output::print_done(global, &format!("SSH {}", util::state_word(state.enabled())));
        }
        ConsoleCommand::Telnet { state } => {
            console.set_telnet_enabled(state.enabled()).await?;
            output::print_done(
                global,
                &format!("Telnet {}", util::state_word(state.enabled())),
            );
        }
        ConsoleCommand::SshPort { number: port } => {
            console.set_ssh_port(port).await?;
            output::print_done(global, &format!("SSH port set to {port}"));
        }
        ConsoleCommand::TelnetPort { number: port } => {
            console.set_telnet_port(port).await?;
            output::print_done(global, &format!("Telnet port set to {port}"));
        }
    }
    Ok(())
}
