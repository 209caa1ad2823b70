//! CLI error types with miette diagnostics.
//!
//! Maps `tlnet_api::Error` and `ConfigError` variants into user-facing
//! errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use tlnet_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to card at {url}")]
    #[diagnostic(
        code(tlnet::connection_failed),
        help(
            "Check that the card is powered and reachable.\n\
             If the web interface only listens on HTTP, retry with --no-tls."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(tlnet::tls_error),
        help(
            "Cards ship with self-signed certificates.\n\
             Use --insecure (-k) to accept them, or configure ca_cert in your profile."
        )
    )]
    TlsError { message: String },

    #[error("Request timed out: {url}")]
    #[diagnostic(
        code(tlnet::timeout),
        help(
            "Increase the timeout with --timeout.\n\
             The card is offline for about 10 seconds after a batch upload."
        )
    )]
    Timeout { url: String },

    #[error("Card returned an unexpected response: {message}")]
    #[diagnostic(code(tlnet::http))]
    Http { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Login to {host} was rejected")]
    #[diagnostic(
        code(tlnet::auth_failed),
        help(
            "Verify the username and password.\n\
             Run: tlnet profiles set-password {profile}"
        )
    )]
    AuthFailed { host: String, profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(tlnet::not_found))]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    #[error("{message}")]
    #[diagnostic(code(tlnet::conflict))]
    Conflict { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tlnet::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(tlnet::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: tlnet profiles add <name> --host <card>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No card configured")]
    #[diagnostic(
        code(tlnet::no_config),
        help(
            "Pass --host, or create a profile with: tlnet profiles add <name> --host <card>\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(tlnet::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(tlnet::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ────────────────────────────────────────────────────────────
    #[error("IO error on {path}: {source}")]
    #[diagnostic(code(tlnet::io))]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => Self::Config(Box::new(other)),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── tlnet_api::Error → CliError mapping ──────────────────────────────

impl From<tlnet_api::Error> for CliError {
    fn from(err: tlnet_api::Error) -> Self {
        use tlnet_api::Error as E;

        match err {
            E::NoHost => Self::NoConfig {
                path: tlnet_config::config_path().display().to_string(),
            },

            E::NotAuthenticated { host } => Self::AuthFailed {
                host,
                profile: "<profile>".into(),
            },

            E::Challenge { url, reason } => Self::Http {
                message: format!("{url}: {reason}"),
            },

            E::Transport(e) => {
                let url = e.url().map(ToString::to_string).unwrap_or_default();
                if e.is_timeout() {
                    Self::Timeout { url }
                } else {
                    Self::ConnectionFailed {
                        url,
                        source: Box::new(e),
                    }
                }
            }

            E::Status { status, url } => Self::Http {
                message: format!("HTTP {status} from {url}"),
            },

            E::InvalidUrl(e) => Self::Validation {
                field: "host".into(),
                reason: e.to_string(),
            },

            E::Tls(message) => Self::TlsError { message },

            E::Io { path, source } => Self::FileIo {
                path: path.display().to_string(),
                source,
            },

            E::Prompt(source) => Self::Io(source),

            E::ResourceNotFound { scope, path } => Self::NotFound {
                resource_type: format!("{scope} configuration file"),
                identifier: path.display().to_string(),
            },

            E::InvalidArgument {
                field,
                value,
                reason,
            } => Self::Validation {
                field: field.into(),
                reason: format!("'{value}': {reason}"),
            },

            E::ServerSlotsFull { max } => Self::Conflict {
                message: format!("all {max} syslog server slots are in use; remove one first"),
            },

            E::MissingKey { scope, key } => Self::NotFound {
                resource_type: format!("{scope} configuration key"),
                identifier: key,
            },
        }
    }
}
