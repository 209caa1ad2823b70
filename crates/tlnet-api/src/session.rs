// Authenticated session with a TLNET Supervisor card
//
// Owns the connection parameters, the cookie-carrying HTTP client once the
// login handshake succeeds, and the two configuration caches. Page modules
// borrow the session for its transport and its configuration view.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, trace, warn};
use url::Url;

use crate::auth::{self, AuthOutcome, LOGIN_ENDPOINT, LOGIN_PAGE, PasswordPrompt};
use crate::batch::BatchConfig;
use crate::cache::{CacheState, ConfigCaches, ConfigInvalidator};
use crate::document::{ConfigMap, Scope};
use crate::error::Error;
use crate::transport::{TlsMode, TransportConfig, check_status};

/// Connection parameters for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Card hostname or IP address. A session may start without one.
    pub host: Option<String>,
    pub username: String,
    /// Defaults to 443 with TLS, 80 without.
    pub port: Option<u16>,
    pub use_tls: bool,
    pub tls: TlsMode,
    /// Applied to every request the session issues.
    pub timeout: Duration,
    /// Keep the password after login so `change_host` can reuse it.
    pub retain_password: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            host: None,
            username: "admin".into(),
            port: None,
            use_tls: true,
            tls: TlsMode::System,
            timeout: Duration::from_secs(10),
            retain_password: false,
        }
    }
}

impl SessionConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            ..Self::default()
        }
    }

    /// The effective port.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(if self.use_tls { 443 } else { 80 })
    }

    pub fn scheme(&self) -> &'static str {
        if self.use_tls { "https" } else { "http" }
    }

    fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
            cookie_jar: None,
        }
    }
}

/// One card, one login, one pair of configuration caches.
///
/// Construction never touches the network. [`authenticate`](Self::authenticate)
/// (or [`connect`](Self::connect)) runs the login handshake; a rejected
/// login leaves the session usable but unauthenticated, visible through
/// [`is_authenticated`](Self::is_authenticated).
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    host: RwLock<Option<String>>,
    http: RwLock<Option<reqwest::Client>>,
    retained_password: RwLock<Option<SecretString>>,
    caches: ConfigCaches,
}

impl Session {
    /// Create an unauthenticated session.
    pub fn new(mut config: SessionConfig) -> Self {
        let host = config.host.take();
        Self {
            config,
            host: RwLock::new(host),
            http: RwLock::new(None),
            retained_password: RwLock::new(None),
            caches: ConfigCaches::default(),
        }
    }

    /// Create a session around an already-authenticated client.
    ///
    /// Use this when the login cookie was obtained elsewhere.
    pub fn with_client(config: SessionConfig, http: reqwest::Client) -> Self {
        let session = Self::new(config);
        session.set_transport(Some(http));
        session
    }

    /// Create a session and log in.
    ///
    /// Rejected credentials still return the session (unauthenticated,
    /// with a warning logged); transport faults are errors.
    pub async fn connect(config: SessionConfig, password: &SecretString) -> Result<Self, Error> {
        let session = Self::new(config);
        session.authenticate(password).await?;
        Ok(session)
    }

    // ── Identity & URLs ──────────────────────────────────────────────

    pub fn host(&self) -> Option<String> {
        self.host.read().expect("host lock poisoned").clone()
    }

    pub fn port(&self) -> u16 {
        self.config.port()
    }

    pub fn username(&self) -> &str {
        &self.config.username
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    pub fn settings(&self) -> &SessionConfig {
        &self.config
    }

    /// `scheme://host:port` of the card.
    pub fn base_url(&self) -> Result<Url, Error> {
        let host = self.host().ok_or(Error::NoHost)?;
        let host = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]")
        } else {
            host
        };
        let raw = format!("{}://{host}:{}", self.config.scheme(), self.port());
        Ok(Url::parse(&raw)?)
    }

    /// Absolute URL for a card path such as `/delta/adm_batch`.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url()?.join(path)?)
    }

    // ── Transport ────────────────────────────────────────────────────

    pub fn is_authenticated(&self) -> bool {
        self.http.read().expect("transport lock poisoned").is_some()
    }

    /// The authenticated client (cheap clone sharing the cookie jar).
    pub fn http(&self) -> Result<reqwest::Client, Error> {
        self.http
            .read()
            .expect("transport lock poisoned")
            .clone()
            .ok_or_else(|| Error::NotAuthenticated {
                host: self.host().unwrap_or_default(),
            })
    }

    fn set_transport(&self, http: Option<reqwest::Client>) -> Option<reqwest::Client> {
        std::mem::replace(&mut *self.http.write().expect("transport lock poisoned"), http)
    }

    // ── Login lifecycle ──────────────────────────────────────────────

    /// Run the challenge-response handshake against the current host.
    ///
    /// 1. `GET /home.asp` and slice the challenge out of the page.
    /// 2. `POST /delta/login` with `MD5(user + password + challenge)`.
    /// 3. `GET /home.asp` again; seeing the login screen means rejection.
    pub async fn authenticate(&self, password: &SecretString) -> Result<AuthOutcome, Error> {
        let login_page = self.url(LOGIN_PAGE)?;
        let login_post = self.url(LOGIN_ENDPOINT)?;
        let host = self.host().unwrap_or_default();

        if self.config.retain_password {
            *self
                .retained_password
                .write()
                .expect("password lock poisoned") = Some(password.clone());
        }

        let http = self.config.transport().with_cookie_jar().build_client()?;

        debug!(url = %login_page, "fetching login challenge");
        let page = check_status(http.get(login_page.clone()).send().await?)?
            .text()
            .await?;
        let challenge = auth::extract_challenge(&page)
            .map_err(|reason| Error::Challenge {
                url: login_page.to_string(),
                reason: reason.into(),
            })?
            .to_owned();
        trace!(%challenge, "challenge extracted");

        let user = self.username();
        let response = auth::compute_response(user, password.expose_secret(), &challenge);
        let form = auth::login_form(user, password.expose_secret(), &challenge, &response);

        debug!(url = %login_post, user, "posting login form");
        check_status(http.post(login_post).form(&form).send().await?)?;

        let landing = check_status(http.get(login_page).send().await?)?
            .text()
            .await?;
        if auth::is_login_screen(&landing) {
            warn!(host = %host, user, "login failed: card served the login screen again");
            self.set_transport(None);
            return Ok(AuthOutcome::Rejected);
        }

        self.set_transport(Some(http));
        info!(host = %host, user, "logged in");
        Ok(AuthOutcome::Authenticated)
    }

    /// Point the session at another card and log in there.
    ///
    /// Password precedence: `password`, then a retained password, then
    /// `prompt`. Both caches are marked stale since they described the
    /// previous card.
    pub async fn change_host(
        &self,
        host: impl Into<String>,
        password: Option<&SecretString>,
        prompt: &dyn PasswordPrompt,
    ) -> Result<AuthOutcome, Error> {
        let host = host.into();
        self.close();
        self.caches.invalidate_all();
        *self.host.write().expect("host lock poisoned") = Some(host.clone());
        debug!(host = %host, "host changed");

        let password = match password {
            Some(password) => password.clone(),
            None => {
                let retained = self
                    .retained_password
                    .read()
                    .expect("password lock poisoned")
                    .clone();
                match retained {
                    Some(password) => password,
                    None => prompt.prompt(&host)?,
                }
            }
        };

        self.authenticate(&password).await
    }

    /// Drop the authenticated transport. A no-op when not logged in.
    pub fn close(&self) {
        if self.set_transport(None).is_some() {
            debug!(host = ?self.host(), "session closed");
        }
    }

    // ── Configuration view ───────────────────────────────────────────

    /// The configuration for `scope`, fetched only when stale or forced.
    ///
    /// A refresh downloads the whole batch document and replaces the
    /// cache wholesale. Concurrent cold reads of one scope share a fetch.
    pub async fn config_map(&self, scope: Scope, force: bool) -> Result<Arc<ConfigMap>, Error> {
        let slot = self.caches.slot(scope);
        if !force {
            if let (Some(map), _) = slot.snapshot() {
                trace!(%scope, "configuration served from cache");
                return Ok(map);
            }
        }

        let _refresh = slot.refresh_lock().lock().await;
        let (cached, generation) = slot.snapshot();
        if !force {
            if let Some(map) = cached {
                return Ok(map);
            }
        }

        debug!(%scope, force, "refreshing configuration");
        let document = BatchConfig::new(self).download(scope).await?;
        let map = Arc::new(ConfigMap::parse(&document));
        if !slot.store(Arc::clone(&map), generation) {
            debug!(%scope, "invalidated during refresh, cache left stale");
        }
        Ok(map)
    }

    /// Shorthand for `config_map(Scope::System, false)`.
    pub async fn system_config(&self) -> Result<Arc<ConfigMap>, Error> {
        self.config_map(Scope::System, false).await
    }

    /// Shorthand for `config_map(Scope::Snmp, false)`.
    pub async fn snmp_config(&self) -> Result<Arc<ConfigMap>, Error> {
        self.config_map(Scope::Snmp, false).await
    }

    pub fn cache_state(&self, scope: Scope) -> CacheState {
        self.caches.slot(scope).state()
    }

    /// Mark `scope` stale without fetching.
    pub fn invalidate(&self, scope: Scope) {
        debug!(%scope, "configuration cache invalidated");
        self.caches.slot(scope).invalidate();
    }
}

impl ConfigInvalidator for Session {
    fn invalidate(&self, scope: Scope) {
        Session::invalidate(self, scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_follows_tls_flag() {
        let mut config = SessionConfig::new("ups1");
        assert_eq!(config.port(), 443);
        config.use_tls = false;
        assert_eq!(config.port(), 80);
        config.port = Some(8080);
        assert_eq!(config.port(), 8080);
    }

    #[test]
    fn base_url_includes_port() {
        let session = Session::new(SessionConfig::new("10.0.0.5"));
        assert_eq!(
            session.base_url().map(|u| u.to_string()).ok(),
            Some("https://10.0.0.5/".into())
        );

        let session = Session::new(SessionConfig {
            use_tls: false,
            port: Some(8080),
            ..SessionConfig::new("ups1.lan")
        });
        assert_eq!(
            session.url("/delta/adm_batch").map(|u| u.to_string()).ok(),
            Some("http://ups1.lan:8080/delta/adm_batch".into())
        );
    }

    #[test]
    fn ipv6_hosts_are_bracketed() {
        let session = Session::new(SessionConfig {
            use_tls: false,
            ..SessionConfig::new("fe80::1")
        });
        assert_eq!(
            session.base_url().map(|u| u.to_string()).ok(),
            Some("http://[fe80::1]/".into())
        );
    }

    #[test]
    fn new_session_is_unauthenticated() {
        let session = Session::new(SessionConfig::default());
        assert!(!session.is_authenticated());
        assert!(matches!(session.base_url(), Err(Error::NoHost)));
        assert!(matches!(session.http(), Err(Error::NotAuthenticated { .. })));
        assert!(!session.cache_state(Scope::System).is_fresh());
    }

    #[test]
    fn close_is_idempotent() {
        let session = Session::with_client(SessionConfig::new("ups1"), reqwest::Client::new());
        assert!(session.is_authenticated());
        session.close();
        session.close();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn session_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Session>();
    }
}
