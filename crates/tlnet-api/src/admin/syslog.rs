// Syslog page: up to four remote syslog servers.

use tracing::debug;

use crate::cache::ConfigInvalidator;
use crate::error::Error;
use crate::session::Session;

use super::{FormEndpoint, flag};

const ENDPOINT: &str = "/delta/adm_syslog";

/// Server slots on the page (`SLG_SERVER1` .. `SLG_SERVER4`).
pub const MAX_SERVERS: usize = 4;

const SLOT_FIELDS: [&str; MAX_SERVERS] =
    ["SLG_SERVER1", "SLG_SERVER2", "SLG_SERVER3", "SLG_SERVER4"];

pub struct Syslog<'a> {
    form: FormEndpoint<'a>,
}

impl<'a> Syslog<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            form: FormEndpoint::new(session, ENDPOINT),
        }
    }

    pub fn with_invalidator(session: &'a Session, invalidator: &'a dyn ConfigInvalidator) -> Self {
        Self {
            form: FormEndpoint::with_invalidator(session, invalidator, ENDPOINT),
        }
    }

    pub async fn set_enabled(&self, enabled: bool) -> Result<(), Error> {
        self.form.submit(&[("SLG_SLG", flag(enabled))]).await
    }

    /// Configured servers in slot order; empty slots are skipped.
    pub async fn servers(&self) -> Result<Vec<String>, Error> {
        let config = self.form.system_config().await?;
        Ok(config
            .find_all("SysLog Server")
            .filter(|(_, value)| !value.is_empty())
            .map(|(_, value)| value.to_owned())
            .collect())
    }

    /// Add `server`. Already-present servers are left alone.
    pub async fn add_server(&self, server: &str) -> Result<(), Error> {
        let mut servers = self.servers().await?;
        if servers.iter().any(|s| s == server) {
            debug!(server, "syslog server already configured");
            return Ok(());
        }
        if servers.len() >= MAX_SERVERS {
            return Err(Error::ServerSlotsFull { max: MAX_SERVERS });
        }
        servers.push(server.to_owned());
        self.write_servers(&servers).await
    }

    pub async fn remove_server(&self, server: &str) -> Result<(), Error> {
        let mut servers = self.servers().await?;
        let Some(index) = servers.iter().position(|s| s == server) else {
            return Err(Error::invalid("server", server, "not a configured syslog server"));
        };
        servers.remove(index);
        self.write_servers(&servers).await
    }

    pub async fn clear_servers(&self) -> Result<(), Error> {
        self.write_servers(&[]).await
    }

    /// Post all four slots, filling the tail with blanks.
    async fn write_servers(&self, servers: &[String]) -> Result<(), Error> {
        let fields: Vec<(&str, &str)> = SLOT_FIELDS
            .iter()
            .enumerate()
            .map(|(i, field)| (*field, servers.get(i).map_or("", String::as_str)))
            .collect();
        self.form.submit(&fields).await
    }
}
