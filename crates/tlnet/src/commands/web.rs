//! Web interface command handlers.

use serde::Serialize;

use tlnet_api::Session;
use tlnet_api::admin::Web;

use crate::cli::{GlobalOpts, WebArgs, WebCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct WebSettings {
    http_port: Option<u16>,
    https_port: Option<u16>,
    refresh_secs: Option<u32>,
}

pub async fn handle(session: &Session, args: WebArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let web = Web::new(session);
    match args.command {
        WebCommand::Show => {
            let settings = WebSettings {
                http_port: web.http_port().await?,
                https_port: web.https_port().await?,
                refresh_secs: web.refresh_secs().await?,
            };
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &settings,
                |s| {
                    output::render_fields(
                        &[
                            ("HTTP port", output::or_dash(s.http_port)),
                            ("HTTPS port", output::or_dash(s.https_port)),
                            ("Refresh (s)", output::or_dash(s.refresh_secs)),
                        ],
                        color,
                    )
                },
                |s| output::or_dash(s.https_port),
            );
            output::print_output(&out, global.quiet);
        }
        WebCommand::Http { state } => {
            web.set_http_enabled(state.enabled()).await?;
            output::print_done(global, &format!("HTTP {}", util::state_word(state.enabled())));
        }
        WebCommand::Https { state } => {
            web.set_https_enabled(state.enabled()).await?;
            output::print_done(global, &format!("HTTPS {}", util::state_word(state.enabled())));
        }
        WebCommand::HttpPort { number: port } => {
            web.set_http_port(port).await?;
            output::print_done(global, &format!("HTTP port set to {port}"));
        }
        WebCommand::HttpsPort { number: port } => {
            web.set_https_port(port).await?;
            output::print_done(global, &format!("HTTPS port set to {port}"));
        }
        WebCommand::Refresh { seconds } => {
            web.set_refresh_secs(seconds).await?;
            output::print_done(global, &format!("Refresh interval set to {seconds}s"));
        }
    }
    Ok(())
}
