// User manager page: local accounts and RADIUS authentication.

use std::fmt;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::batch::{BatchConfig, UploadReceipt, UploadSource};
use crate::cache::ConfigInvalidator;
use crate::document::{ConfigMap, Scope};
use crate::error::Error;
use crate::session::Session;

use super::{FormEndpoint, flag, parse_found, parse_value};

const ENDPOINT: &str = "/delta/adm_user";

/// Default RADIUS authentication port.
pub const DEFAULT_RADIUS_PORT: u16 = 1812;

// ── Roles ───────────────────────────────────────────────────────────

/// The three local account slots on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UserRole {
    #[serde(rename = "Administrator")]
    Administrator,
    #[serde(rename = "Device Manager")]
    DeviceManager,
    #[serde(rename = "Read Only User")]
    ReadOnlyUser,
}

impl UserRole {
    pub const ALL: [Self; 3] = [Self::Administrator, Self::DeviceManager, Self::ReadOnlyUser];

    /// Suffix of the page's `account<n>` / `passwd<n>` / `limit<n>` fields.
    pub fn account_index(self) -> u8 {
        match self {
            Self::Administrator => 1,
            Self::DeviceManager => 2,
            Self::ReadOnlyUser => 3,
        }
    }

    /// Prefix used by the role's keys in the system document.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Administrator => "Admin",
            Self::DeviceManager => "Device",
            Self::ReadOnlyUser => "User",
        }
    }

    /// Key fragment of the role's RADIUS permission line.
    pub fn radius_fragment(self) -> String {
        format!("RADIUS {} User", self.tag())
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Administrator => "Administrator",
            Self::DeviceManager => "Device Manager",
            Self::ReadOnlyUser => "Read Only User",
        })
    }
}

impl FromStr for UserRole {
    type Err = Error;

    /// Accepts display names (`Device Manager`) and short forms (`device`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "administrator" | "admin" => Ok(Self::Administrator),
            "devicemanager" | "device" => Ok(Self::DeviceManager),
            "readonlyuser" | "readonly" | "user" => Ok(Self::ReadOnlyUser),
            _ => Err(Error::invalid(
                "role",
                s,
                "expected Administrator, Device Manager or Read Only User",
            )),
        }
    }
}

// ── RADIUS permissions ──────────────────────────────────────────────

/// RADIUS service types, in bit order of the permission mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
pub enum Permission {
    #[strum(serialize = "Login User")]
    LoginUser,
    #[strum(serialize = "Framed User")]
    FramedUser,
    #[strum(serialize = "Callback Login")]
    CallbackLogin,
    #[strum(serialize = "Callback Framed")]
    CallbackFramed,
    #[strum(serialize = "Outbound")]
    Outbound,
    #[strum(serialize = "Administrative")]
    Administrative,
    #[strum(serialize = "NAS Prompt")]
    NasPrompt,
    #[strum(serialize = "Authenticate Only")]
    AuthenticateOnly,
    #[strum(serialize = "Callback NAS Prompt")]
    CallbackNasPrompt,
    #[strum(serialize = "Call Check")]
    CallCheck,
    #[strum(serialize = "Callback Administrative")]
    CallbackAdministrative,
}

impl Permission {
    pub const ALL: [Self; 11] = [
        Self::LoginUser,
        Self::FramedUser,
        Self::CallbackLogin,
        Self::CallbackFramed,
        Self::Outbound,
        Self::Administrative,
        Self::NasPrompt,
        Self::AuthenticateOnly,
        Self::CallbackNasPrompt,
        Self::CallCheck,
        Self::CallbackAdministrative,
    ];

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl FromStr for Permission {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| {
                p.to_string()
                    .chars()
                    .filter(char::is_ascii_alphanumeric)
                    .collect::<String>()
                    .eq_ignore_ascii_case(&wanted)
            })
            .ok_or_else(|| Error::invalid("permission", s, "unknown RADIUS service type"))
    }
}

/// 11-bit permission mask; bit `i` is `Permission::ALL[i]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RadiusPermissions(u16);

impl RadiusPermissions {
    const MASK: u16 = (1 << Permission::ALL.len()) - 1;

    pub fn from_code(code: u16) -> Self {
        Self(code & Self::MASK)
    }

    pub fn code(self) -> u16 {
        self.0
    }

    pub fn contains(self, permission: Permission) -> bool {
        self.0 & permission.bit() != 0
    }

    #[must_use]
    pub fn with(self, permission: Permission) -> Self {
        Self(self.0 | permission.bit())
    }

    /// Enabled permissions in bit order.
    pub fn iter(self) -> impl Iterator<Item = Permission> {
        Permission::ALL.into_iter().filter(move |p| self.contains(*p))
    }
}

impl FromIterator<Permission> for RadiusPermissions {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), Self::with)
    }
}

// ── Records ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RadiusServer {
    pub ip: Option<String>,
    #[serde(skip)]
    pub secret: Option<SecretString>,
    pub port: Option<u16>,
}

#[derive(Debug, Serialize)]
pub struct Account {
    pub role: UserRole,
    pub name: Option<String>,
    #[serde(skip)]
    pub password: Option<SecretString>,
    pub wan_access: bool,
}

impl Account {
    pub fn from_config(config: &ConfigMap, role: UserRole) -> Self {
        let key = |field: &str| format!("{} {field}", role.tag());
        Self {
            role,
            name: config.get(&key("Account")).map(str::to_owned),
            password: config
                .get(&key("Password"))
                .map(|p| SecretString::from(p.to_owned())),
            wan_access: config.get(&key("Limit")).is_some_and(|v| v.trim() == "1"),
        }
    }
}

/// Replace every line mentioning the role's RADIUS fragment with the new
/// mask. Other lines, including their endings, are kept as-is.
///
/// Returns `None` when the document has no line for the role.
pub fn rewrite_permissions(document: &str, role: UserRole, code: u16) -> Option<String> {
    let fragment = role.radius_fragment();
    let mut out = String::with_capacity(document.len());
    let mut matched = false;
    for line in document.split_inclusive('\n') {
        if line.contains(&fragment) {
            let ending = if line.ends_with("\r\n") {
                "\r\n"
            } else if line.ends_with('\n') {
                "\n"
            } else {
                ""
            };
            out.push_str(&format!("{fragment} Type={code}{ending}"));
            matched = true;
        } else {
            out.push_str(line);
        }
    }
    matched.then_some(out)
}

// ── Page ────────────────────────────────────────────────────────────

pub struct UserManager<'a> {
    form: FormEndpoint<'a>,
}

impl<'a> UserManager<'a> {
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

    pub async fn set_radius_enabled(&self, enabled: bool) -> Result<(), Error> {
        self.form.submit(&[("radius", flag(enabled))]).await
    }

    /// Point RADIUS at `server`; this also enables RADIUS.
    pub async fn set_radius_server(
        &self,
        server: &str,
        secret: &SecretString,
        port: u16,
    ) -> Result<(), Error> {
        let port = port.to_string();
        self.form
            .submit(&[
                ("radius", "1"),
                ("USR_RADSRV", server),
                ("USR_RADSEC", secret.expose_secret()),
                ("USR_RADPRT", port.as_str()),
            ])
            .await
    }

    pub async fn radius_server(&self) -> Result<RadiusServer, Error> {
        let config = self.form.system_config().await?;
        Ok(RadiusServer {
            ip: config.get("RADIUS Server").map(str::to_owned),
            secret: config
                .get("RADIUS Secret")
                .map(|s| SecretString::from(s.to_owned())),
            port: parse_value(&config, "RADIUS Port")?,
        })
    }

    pub async fn set_account(
        &self,
        role: UserRole,
        name: &str,
        password: &SecretString,
        wan_access: bool,
    ) -> Result<(), Error> {
        let n = role.account_index();
        let account = format!("account{n}");
        let passwd = format!("passwd{n}");
        let limit = format!("limit{n}");
        self.form
            .submit(&[
                (account.as_str(), name),
                (passwd.as_str(), password.expose_secret()),
                (limit.as_str(), flag(wan_access)),
            ])
            .await
    }

    pub async fn account(&self, role: UserRole) -> Result<Account, Error> {
        let config = self.form.system_config().await?;
        Ok(Account::from_config(&config, role))
    }

    /// The role's RADIUS permissions; an absent line reads as no permissions.
    pub async fn permissions(&self, role: UserRole) -> Result<RadiusPermissions, Error> {
        let config = self.form.system_config().await?;
        let code: Option<u16> = parse_found(&config, &role.radius_fragment())?;
        Ok(RadiusPermissions::from_code(code.unwrap_or_default()))
    }

    /// The page has no form field for the mask, so this goes through a
    /// batch download, rewrite and upload. The card restarts afterwards.
    ///
    /// A document without the role's permission line is left alone and
    /// reported as `MissingKey`; nothing is uploaded.
    pub async fn set_permissions(
        &self,
        role: UserRole,
        permissions: RadiusPermissions,
    ) -> Result<UploadReceipt, Error> {
        let batch = BatchConfig::with_invalidator(self.form.session(), self.form.invalidator());
        let document = batch.download(Scope::System).await?;
        let Some(rewritten) = rewrite_permissions(&document, role, permissions.code()) else {
            warn!(%role, "no RADIUS permission line in system configuration");
            return Err(Error::MissingKey {
                scope: Scope::System,
                key: role.radius_fragment(),
            });
        };
        debug!(%role, code = permissions.code(), "rewrote RADIUS permission line");

        let receipt = batch
            .upload(
                Scope::System,
                UploadSource::Bytes {
                    file_name: Scope::System.default_file_name().to_owned(),
                    data: rewritten.into_bytes(),
                },
            )
            .await?;
        info!(%role, "RADIUS permissions updated");
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn roles_parse_from_names_and_short_forms() {
        assert_eq!(
            "Device Manager".parse::<UserRole>().ok(),
            Some(UserRole::DeviceManager)
        );
        assert_eq!("admin".parse::<UserRole>().ok(), Some(UserRole::Administrator));
        assert_eq!(
            "read-only".parse::<UserRole>().ok(),
            Some(UserRole::ReadOnlyUser)
        );
        assert!(matches!(
            "guest".parse::<UserRole>(),
            Err(Error::InvalidArgument { field: "role", .. })
        ));
    }

    #[test]
    fn role_keys() {
        assert_eq!(UserRole::ReadOnlyUser.account_index(), 3);
        assert_eq!(UserRole::DeviceManager.radius_fragment(), "RADIUS Device User");
    }

    #[test]
    fn mask_is_lsb_first() {
        let perms = RadiusPermissions::from_code(0b100_1000_0001);
        assert!(perms.contains(Permission::LoginUser));
        assert!(perms.contains(Permission::AuthenticateOnly));
        assert!(perms.contains(Permission::CallbackAdministrative));
        assert!(!perms.contains(Permission::FramedUser));
        assert_eq!(
            perms.iter().collect::<Vec<_>>(),
            vec![
                Permission::LoginUser,
                Permission::AuthenticateOnly,
                Permission::CallbackAdministrative
            ]
        );
    }

    #[test]
    fn mask_drops_unknown_bits() {
        assert_eq!(RadiusPermissions::from_code(u16::MAX).code(), 0x7ff);
    }

    #[test]
    fn permissions_collect_and_parse() {
        let perms: RadiusPermissions = [Permission::Outbound, Permission::NasPrompt]
            .into_iter()
            .collect();
        assert_eq!(perms.code(), (1 << 4) | (1 << 6));
        assert_eq!(
            "nas-prompt".parse::<Permission>().ok(),
            Some(Permission::NasPrompt)
        );
        assert!("superuser".parse::<Permission>().is_err());
    }

    #[test]
    fn account_reads_tagged_keys() {
        let config =
            ConfigMap::parse("Device Account=ops\nDevice Password=hunter2\nDevice Limit=1\n");
        let account = Account::from_config(&config, UserRole::DeviceManager);
        assert_eq!(account.name.as_deref(), Some("ops"));
        assert_eq!(
            account.password.as_ref().map(|p| p.expose_secret().to_owned()),
            Some("hunter2".to_owned())
        );
        assert!(account.wan_access);

        let missing = Account::from_config(&config, UserRole::Administrator);
        assert_eq!(missing.name, None);
        assert!(!missing.wan_access);
    }

    #[test]
    fn rewrite_replaces_only_the_role_line() {
        let doc = "[Users]\r\nRADIUS Admin User Type=1\r\nRADIUS Device User Type=3\r\nEnd=1";
        let out = rewrite_permissions(doc, UserRole::Administrator, 33);
        assert_eq!(
            out.as_deref(),
            Some("[Users]\r\nRADIUS Admin User Type=33\r\nRADIUS Device User Type=3\r\nEnd=1")
        );
    }

    #[test]
    fn rewrite_without_role_line_is_none() {
        let doc = "RADIUS Admin User Type=1\nRADIUS Device User Type=3\n";
        assert_eq!(rewrite_permissions(doc, UserRole::ReadOnlyUser, 1), None);
    }
}
