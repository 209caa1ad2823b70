//! FTP command handlers.

use tlnet_api::Session;
use tlnet_api::admin::Ftp;

use crate::cli::{FtpArgs, FtpCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(session: &Session, args: FtpArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let ftp = Ftp::new(session);
    match args.command {
        FtpCommand::Show => {
            let port = ftp.port().await?;
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &port,
                |p| output::render_fields(&[("FTP port", output::or_dash(*p))], color),
                |p| output::or_dash(*p),
            );
            output::print_output(&out, global.quiet);
        }
        FtpCommand::State { state } => {
            ftp.set_enabled(state.enabled()).await?;
            output::print_done(global, &format!("FTP {}", util::state_word(state.enabled())));
        }
        FtpCommand::Port { number: port } => {
            ftp.set_port(port).await?;
            output::print_done(global, &format!("FTP port set to {port}"));
        }
    }
    Ok(())
}
