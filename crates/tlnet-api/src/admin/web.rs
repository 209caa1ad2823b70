// Web page: HTTP/HTTPS listeners and page refresh interval.

use crate::cache::ConfigInvalidator;
use crate::error::Error;
use crate::session::Session;

use super::{FormEndpoint, flag, parse_value};

const ENDPOINT: &str = "/delta/adm_web";

pub struct Web<'a> {
    form: FormEndpoint<'a>,
}

impl<'a> Web<'a> {
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

    /// Turning off the protocol the session uses locks this client out.
    pub async fn set_http_enabled(&self, enabled: bool) -> Result<(), Error> {
        self.form.submit(&[("WEB_HTTP", flag(enabled))]).await
    }

    pub async fn set_https_enabled(&self, enabled: bool) -> Result<(), Error> {
        self.form.submit(&[("WEB_HTTPS", flag(enabled))]).await
    }

    pub async fn set_http_port(&self, port: u16) -> Result<(), Error> {
        let port = port.to_string();
        self.form
            .submit(&[("WEB_HTTP", "1"), ("WEB_PORT_HTTP", port.as_str())])
            .await
    }

    pub async fn set_https_port(&self, port: u16) -> Result<(), Error> {
        let port = port.to_string();
        self.form
            .submit(&[("WEB_HTTPS", "1"), ("WEB_PORT_HTTPS", port.as_str())])
            .await
    }

    /// Browser auto-refresh interval of the card's status pages.
    pub async fn set_refresh_secs(&self, seconds: u32) -> Result<(), Error> {
        let seconds = seconds.to_string();
        self.form.submit(&[("WEB_REFRESH", seconds.as_str())]).await
    }

    pub async fn http_port(&self) -> Result<Option<u16>, Error> {
        let config = self.form.system_config().await?;
        parse_value(&config, "HTTP Port")
    }

    pub async fn https_port(&self) -> Result<Option<u16>, Error> {
        let config = self.form.system_config().await?;
        parse_value(&config, "HTTPS Port")
    }

    pub async fn refresh_secs(&self) -> Result<Option<u32>, Error> {
        let config = self.form.system_config().await?;
        parse_value(&config, "Web Refresh")
    }
}
