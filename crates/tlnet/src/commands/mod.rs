//! Command dispatch: bridges CLI args -> page operations -> output formatting.

pub mod batch;
pub mod console;
pub mod ftp;
pub mod ip;
pub mod login;
pub mod profiles;
pub mod show;
pub mod syslog;
pub mod time;
pub mod users;
pub mod util;
pub mod web;

use tlnet_api::Session;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a card-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Show(args) => show::handle(session, args, global).await,
        Command::Batch(args) => batch::handle(session, args, global).await,
        Command::Console(args) => console::handle(session, args, global).await,
        Command::Ftp(args) => ftp::handle(session, args, global).await,
        Command::Web(args) => web::handle(session, args, global).await,
        Command::Syslog(args) => syslog::handle(session, args, global).await,
        Command::Time(args) => time::handle(session, args, global).await,
        Command::Ip(args) => ip::handle(session, args, global).await,
        Command::Users(args) => users::handle(session, args, global).await,
        // Handled before a session is opened
        Command::Login(_) | Command::Profiles(_) | Command::Completions(_) => unreachable!(),
    }
}
