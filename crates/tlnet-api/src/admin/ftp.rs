// FTP page.

use crate::cache::ConfigInvalidator;
use crate::error::Error;
use crate::session::Session;

use super::{FormEndpoint, flag, parse_found};

const ENDPOINT: &str = "/delta/adm_ftp";

pub struct Ftp<'a> {
    form: FormEndpoint<'a>,
}

impl<'a> Ftp<'a> {
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
        self.form.submit(&[("FTP_FTP", flag(enabled))]).await
    }

    /// Set the FTP port; also enables FTP.
    pub async fn set_port(&self, port: u16) -> Result<(), Error> {
        let port = port.to_string();
        self.form
            .submit(&[("FTP_FTP", "1"), ("FTP_PORT_FTP", port.as_str())])
            .await
    }

    pub async fn port(&self) -> Result<Option<u16>, Error> {
        let config = self.form.system_config().await?;
        parse_found(&config, "FTP Port")
    }
}
