use std::path::PathBuf;

use thiserror::Error;

use crate::document::Scope;

/// Top-level error type for the `tlnet-api` crate.
///
/// Transport-level faults (network, TLS, HTTP status, unexpected pages) are
/// hard failures. Missing local files, unknown arguments and an
/// unauthenticated session are recoverable: a batch script can log them
/// and carry on with the next card.
#[derive(Debug, Error)]
pub enum Error {
    // ── Session ─────────────────────────────────────────────────────
    /// No host has been configured on the session yet.
    #[error("no host configured for this session")]
    NoHost,

    /// The session holds no authenticated transport (never logged in,
    /// login rejected, or closed).
    #[error("not authenticated with {host}")]
    NotAuthenticated { host: String },

    /// The login page did not carry a usable challenge token.
    #[error("could not extract login challenge from {url}: {reason}")]
    Challenge { url: String, reason: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The card answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Local file IO failed.
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Interactive password prompt failed.
    #[error("password prompt failed: {0}")]
    Prompt(#[source] std::io::Error),

    // ── Caller input ────────────────────────────────────────────────
    /// A local file needed for an upload does not exist.
    #[error("{scope} configuration file not found: {path}")]
    ResourceNotFound { scope: Scope, path: PathBuf },

    /// An argument named a value the card does not know.
    #[error("invalid {field} '{value}': {reason}")]
    InvalidArgument {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// All four syslog server slots are already taken.
    #[error("all {max} syslog server slots are in use")]
    ServerSlotsFull { max: usize },

    /// A configuration key the operation depends on is absent or malformed.
    #[error("{scope} configuration has no usable value for '{key}'")]
    MissingKey { scope: Scope, key: String },
}

impl Error {
    /// Returns `true` for the expected, non-fatal failures (bad
    /// arguments, missing files, unauthenticated use).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated { .. }
                | Self::NoHost
                | Self::ResourceNotFound { .. }
                | Self::InvalidArgument { .. }
                | Self::ServerSlotsFull { .. }
                | Self::MissingKey { .. }
        )
    }

    /// Returns `true` if this is a transient error worth retrying, e.g.
    /// right after a batch upload while the card restarts its services.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the session must be (re)authenticated.
    pub fn is_auth_required(&self) -> bool {
        matches!(self, Self::NotAuthenticated { .. })
    }

    pub(crate) fn invalid(field: &'static str, value: impl Into<String>, reason: &str) -> Self {
        Self::InvalidArgument {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_kinds() {
        assert!(Error::NoHost.is_recoverable());
        assert!(
            Error::NotAuthenticated {
                host: "ups1".into()
            }
            .is_recoverable()
        );
        assert!(Error::invalid("zone", "GMT+13", "unknown offset").is_recoverable());
        assert!(
            !Error::Status {
                status: 500,
                url: "http://ups1/".into()
            }
            .is_recoverable()
        );
    }

    #[test]
    fn server_errors_are_transient() {
        let err = Error::Status {
            status: 503,
            url: "http://ups1/delta/adm_batch".into(),
        };
        assert!(err.is_transient());
        let err = Error::Status {
            status: 404,
            url: "http://ups1/delta/adm_batch".into(),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn messages_carry_context() {
        let err = Error::ResourceNotFound {
            scope: Scope::System,
            path: PathBuf::from("missing.ini"),
        };
        assert_eq!(
            err.to_string(),
            "system configuration file not found: missing.ini"
        );
    }
}
