// Administration pages
//
// Each page of the card's System > Administration menu posts a form to
// `/delta/adm_<page>` and reads its current values back from the system
// batch configuration. Every accepted post invalidates the system cache.

pub mod console;
pub mod ftp;
pub mod syslog;
pub mod tcp_ip;
pub mod time_server;
pub mod user_manager;
pub mod web;

use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::cache::ConfigInvalidator;
use crate::document::{ConfigMap, Scope};
use crate::error::Error;
use crate::session::Session;
use crate::transport::check_status;

pub use console::Console;
pub use ftp::Ftp;
pub use syslog::Syslog;
pub use tcp_ip::{Ipv4Info, Ipv6Info, TcpIp};
pub use time_server::TimeServer;
pub use user_manager::{
    Account, Permission, RadiusPermissions, RadiusServer, UserManager, UserRole,
};
pub use web::Web;

/// A page's form endpoint plus the capabilities it needs from the core.
pub(crate) struct FormEndpoint<'a> {
    session: &'a Session,
    invalidator: &'a dyn ConfigInvalidator,
    path: &'static str,
}

impl<'a> FormEndpoint<'a> {
    pub(crate) fn new(session: &'a Session, path: &'static str) -> Self {
        Self {
            session,
            invalidator: session,
            path,
        }
    }

    pub(crate) fn with_invalidator(
        session: &'a Session,
        invalidator: &'a dyn ConfigInvalidator,
        path: &'static str,
    ) -> Self {
        Self {
            session,
            invalidator,
            path,
        }
    }

    pub(crate) fn session(&self) -> &'a Session {
        self.session
    }

    pub(crate) fn invalidator(&self) -> &'a dyn ConfigInvalidator {
        self.invalidator
    }

    /// POST `fields` to the page and invalidate the system configuration.
    pub(crate) async fn submit(&self, fields: &[(&str, &str)]) -> Result<(), Error> {
        let http = self.session.http()?;
        let url = self.session.url(self.path)?;
        debug!(url = %url, fields = fields.len(), "submitting form");

        check_status(http.post(url).form(fields).send().await?)?;
        self.invalidator.invalidate(Scope::System);
        Ok(())
    }

    pub(crate) async fn system_config(&self) -> Result<Arc<ConfigMap>, Error> {
        self.session.config_map(Scope::System, false).await
    }
}

/// `"1"` / `"0"` as the card's checkbox fields expect them.
pub(crate) fn flag(enabled: bool) -> &'static str {
    if enabled { "1" } else { "0" }
}

/// Parse the value stored under exactly `key`.
///
/// Absent keys are `None`; present but unparsable values are an error.
pub(crate) fn parse_value<T: FromStr>(map: &ConfigMap, key: &str) -> Result<Option<T>, Error> {
    map.get(key).map(|raw| parse_raw(key, raw)).transpose()
}

/// Like [`parse_value`], matching the first key containing `needle`.
pub(crate) fn parse_found<T: FromStr>(map: &ConfigMap, needle: &str) -> Result<Option<T>, Error> {
    map.find(needle)
        .map(|(key, raw)| parse_raw(key, raw))
        .transpose()
}

fn parse_raw<T: FromStr>(key: &str, raw: &str) -> Result<T, Error> {
    raw.trim().parse().map_err(|_| Error::MissingKey {
        scope: Scope::System,
        key: key.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ports() {
        let map = ConfigMap::parse("SSH Port=22\nTelnet Port=abc\nFTP Port (Ctrl)=2121\n");
        assert_eq!(parse_value::<u16>(&map, "SSH Port").ok().flatten(), Some(22));
        assert_eq!(parse_value::<u16>(&map, "HTTP Port").ok().flatten(), None);
        assert!(matches!(
            parse_value::<u16>(&map, "Telnet Port"),
            Err(Error::MissingKey { .. })
        ));
        assert_eq!(parse_found::<u16>(&map, "FTP Port").ok().flatten(), Some(2121));
    }

    #[test]
    fn flags() {
        assert_eq!(flag(true), "1");
        assert_eq!(flag(false), "0");
    }
}
