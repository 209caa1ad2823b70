// tlnet-api: Async Rust client for the TLNET Supervisor UPS network card web interface

pub mod admin;
pub mod auth;
pub mod batch;
pub mod cache;
pub mod document;
pub mod error;
pub mod session;
pub mod transport;

pub use auth::{AuthOutcome, PasswordPrompt, TerminalPrompt};
pub use batch::{APPLY_DOWNTIME, BatchConfig, UploadReceipt, UploadSource};
pub use cache::{CacheState, ConfigInvalidator};
pub use document::{ConfigMap, Scope};
pub use error::Error;
pub use session::{Session, SessionConfig};
pub use transport::{TlsMode, TransportConfig};
