// Console page: SSH and Telnet services.

use crate::cache::ConfigInvalidator;
use crate::error::Error;
use crate::session::Session;

use super::{FormEndpoint, flag, parse_value};

const ENDPOINT: &str = "/delta/adm_console";

pub struct Console<'a> {
    form: FormEndpoint<'a>,
}

impl<'a> Console<'a> {
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

    pub async fn set_ssh_enabled(&self, enabled: bool) -> Result<(), Error> {
        self.form.submit(&[("CON_SSH", flag(enabled))]).await
    }

    pub async fn set_telnet_enabled(&self, enabled: bool) -> Result<(), Error> {
        self.form.submit(&[("CON_TELNET", flag(enabled))]).await
    }

    /// Set the SSH port; also enables SSH.
    pub async fn set_ssh_port(&self, port: u16) -> Result<(), Error> {
        let port = port.to_string();
        self.form
            .submit(&[("CON_SSH", "1"), ("CON_PORT_SSH", port.as_str())])
            .await
    }

    /// Set the Telnet port; also enables Telnet.
    pub async fn set_telnet_port(&self, port: u16) -> Result<(), Error> {
        let port = port.to_string();
        self.form
            .submit(&[("CON_TELNET", "1"), ("CON_PORT_TELNET", port.as_str())])
            .await
    }

    pub async fn ssh_port(&self) -> Result<Option<u16>, Error> {
        let config = self.form.system_config().await?;
        parse_value(&config, "SSH Port")
    }

    pub async fn telnet_port(&self) -> Result<Option<u16>, Error> {
        let config = self.form.system_config().await?;
        parse_value(&config, "Telnet Port")
    }
}
