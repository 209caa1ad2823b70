//! Time server command handlers.

use serde::Serialize;

use tlnet_api::Session;
use tlnet_api::admin::TimeServer;
use tlnet_api::admin::time_server::TIME_ZONES;

use crate::cli::{GlobalOpts, TimeArgs, TimeCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct SntpServers {
    primary: Option<String>,
    secondary: Option<String>,
}

/// `time zones` needs no card connection.
pub fn list_zones(global: &GlobalOpts) {
    let out = output::render_single(
        &global.output,
        &TIME_ZONES[..],
        |zones| zones.join("\n"),
        |zones| zones.join("\n"),
    );
    output::print_output(&out, global.quiet);
}

pub async fn handle(session: &Session, args: TimeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let time = TimeServer::new(session);
    match args.command {
        TimeCommand::Show => {
            let servers = SntpServers {
                primary: time.primary_server().await?,
                secondary: time.secondary_server().await?,
            };
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &servers,
                |s| {
                    output::render_fields(
                        &[
                            ("Primary SNTP", output::or_dash(s.primary.as_deref())),
                            ("Secondary SNTP", output::or_dash(s.secondary.as_deref())),
                        ],
                        color,
                    )
                },
                |s| s.primary.clone().unwrap_or_default(),
            );
            output::print_output(&out, global.quiet);
        }
        TimeCommand::Sntp { state } => {
            time.set_sntp_enabled(state.enabled()).await?;
            output::print_done(global, &format!("SNTP {}", util::state_word(state.enabled())));
        }
        TimeCommand::Primary { server } => {
            time.set_primary_server(&server).await?;
            output::print_done(global, &format!("Primary SNTP server set to {server}"));
        }
        TimeCommand::Secondary { server } => {
            time.set_secondary_server(&server).await?;
            output::print_done(global, &format!("Secondary SNTP server set to {server}"));
        }
        TimeCommand::Zone { zone } => {
            time.set_time_zone(&zone).await?;
            output::print_done(global, &format!("Time zone set to {zone}"));
        }
        TimeCommand::Zones => list_zones(global),
        TimeCommand::Dst { state, start, end } => match (state.enabled(), start, end) {
            (true, Some(start), Some(end)) => {
                time.enable_daylight_saving(&start, &end).await?;
                output::print_done(global, &format!("Daylight saving {start} - {end}"));
            }
            (true, _, _) => {
                return Err(CliError::Validation {
                    field: "dst".into(),
                    reason: "--start and --end are required to enable daylight saving".into(),
                });
            }
            (false, _, _) => {
                time.disable_daylight_saving().await?;
                output::print_done(global, "Daylight saving disabled");
            }
        },
        TimeCommand::Manual { date, time: clock } => {
            time.set_manual_time(&date, &clock).await?;
            output::print_done(global, &format!("Clock set to {date} {clock}"));
        }
        TimeCommand::Local => {
            time.use_local_time().await?;
            output::print_done(global, "Clock synced from this machine");
        }
    }
    Ok(())
}
