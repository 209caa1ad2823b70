//! Clap derive structures for the `tlnet` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only depends on clap so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tlnet -- manage TLNET Supervisor UPS network cards from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "tlnet",
    version,
    about = "Manage TLNET Supervisor UPS network cards from the command line",
    long_about = "Drives the card's web interface: logs in with the challenge-response\n\
        handshake, reads the batch configuration, and submits the\n\
        administration pages (console, FTP, web, syslog, time, TCP/IP, users).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Card profile to use
    #[arg(long, short = 'p', env = "TLNET_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Card hostname or IP address (overrides profile)
    #[arg(long, short = 'H', env = "TLNET_HOST", global = true)]
    pub host: Option<String>,

    /// Login name (overrides profile)
    #[arg(long, short = 'u', env = "TLNET_USER", global = true)]
    pub user: Option<String>,

    /// Web interface port (default 443, or 80 with --no-tls)
    #[arg(long, env = "TLNET_PORT", global = true)]
    pub port: Option<u16>,

    /// Talk plain HTTP instead of HTTPS
    #[arg(long, env = "TLNET_NO_TLS", global = true)]
    pub no_tls: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "TLNET_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "TLNET_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TLNET_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Shared argument types ────────────────────────────────────────────

/// On/off switch for page checkboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    #[value(alias = "enable", alias = "true")]
    On,
    #[value(alias = "disable", alias = "false")]
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Self::On
    }
}

/// Batch configuration scope.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScopeArg {
    System,
    Snmp,
}

/// Local account slot.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    #[value(alias = "administrator")]
    Admin,
    #[value(alias = "device-manager")]
    Device,
    #[value(alias = "read-only-user", alias = "user")]
    ReadOnly,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and report whether the card accepted the credentials
    Login(LoginArgs),

    /// Show the card's batch configuration
    Show(ShowArgs),

    /// Download or upload batch configuration documents
    Batch(BatchArgs),

    /// SSH and Telnet console settings
    Console(ConsoleArgs),

    /// FTP server settings
    Ftp(FtpArgs),

    /// HTTP/HTTPS web interface settings
    Web(WebArgs),

    /// Remote syslog servers
    Syslog(SyslogArgs),

    /// SNTP, daylight saving and clock settings
    Time(TimeArgs),

    /// TCP/IP addressing
    #[command(alias = "tcpip")]
    Ip(IpArgs),

    /// Local accounts and RADIUS authentication
    Users(UsersArgs),

    /// Manage CLI profiles
    Profiles(ProfilesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOGIN / SHOW / BATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Store the password in the system keyring after a successful login
    #[arg(long)]
    pub save_password: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Configuration scope
    #[arg(default_value = "system")]
    pub scope: ScopeArg,

    /// Only show keys containing this text
    #[arg(long, short = 'f')]
    pub filter: Option<String>,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    #[command(subcommand)]
    pub command: BatchCommand,
}

#[derive(Debug, Subcommand)]
pub enum BatchCommand {
    /// Save a configuration document (default: downloads folder)
    #[command(alias = "dl")]
    Download {
        scope: ScopeArg,

        /// Destination file
        #[arg(long, short = 'O')]
        out: Option<PathBuf>,
    },

    /// Apply a configuration document (the card restarts its services)
    #[command(alias = "ul")]
    Upload {
        scope: ScopeArg,

        /// Document to upload
        file: PathBuf,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONSOLE / FTP / WEB
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConsoleArgs {
    #[command(subcommand)]
    pub command: ConsoleCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConsoleCommand {
    /// Show console ports
    Show,
    /// Enable or disable SSH
    Ssh { state: Toggle },
    /// Enable or disable Telnet
    Telnet { state: Toggle },
    /// Set the SSH port (enables SSH)
    SshPort { number: u16 },
    /// Set the Telnet port (enables Telnet)
    TelnetPort { number: u16 },
}

#[derive(Debug, Args)]
pub struct FtpArgs {
    #[command(subcommand)]
    pub command: FtpCommand,
}

#[derive(Debug, Subcommand)]
pub enum FtpCommand {
    /// Show the FTP port
    Show,
    /// Enable or disable the FTP server
    State { state: Toggle },
    /// Set the FTP port (enables FTP)
    Port { number: u16 },
}

#[derive(Debug, Args)]
pub struct WebArgs {
    #[command(subcommand)]
    pub command: WebCommand,
}

#[derive(Debug, Subcommand)]
pub enum WebCommand {
    /// Show web ports and refresh interval
    Show,
    /// Enable or disable HTTP
    Http { state: Toggle },
    /// Enable or disable HTTPS
    Https { state: Toggle },
    /// Set the HTTP port (enables HTTP)
    HttpPort { number: u16 },
    /// Set the HTTPS port (enables HTTPS)
    HttpsPort { number: u16 },
    /// Set the status page refresh interval
    Refresh { seconds: u32 },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SYSLOG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SyslogArgs {
    #[command(subcommand)]
    pub command: SyslogCommand,
}

#[derive(Debug, Subcommand)]
pub enum SyslogCommand {
    /// List configured servers
    #[command(alias = "ls")]
    List,
    /// Enable or disable remote syslog
    State { state: Toggle },
    /// Add a server (up to four)
    Add { server: String },
    /// Remove a server
    #[command(alias = "rm")]
    Remove { server: String },
    /// Remove all servers
    Clear,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TIME
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TimeArgs {
    #[command(subcommand)]
    pub command: TimeCommand,
}

#[derive(Debug, Subcommand)]
pub enum TimeCommand {
    /// Show the SNTP servers
    Show,
    /// Enable SNTP, or disable it in favour of the manual clock
    Sntp { state: Toggle },
    /// Set the primary SNTP server
    Primary { server: String },
    /// Set the secondary SNTP server
    Secondary { server: String },
    /// Set the time zone (e.g. GMT+05:30)
    Zone { zone: String },
    /// List accepted time zones
    Zones,
    /// Enable daylight saving between two MM/DD dates, or disable it
    Dst {
        state: Toggle,
        /// Start date (MM/DD)
        #[arg(long, required_if_eq("state", "on"))]
        start: Option<String>,
        /// End date (MM/DD)
        #[arg(long, required_if_eq("state", "on"))]
        end: Option<String>,
    },
    /// Set the clock manually
    Manual {
        /// Date (MM/DD/YYYY)
        #[arg(long)]
        date: String,
        /// Time (HH:MM:SS)
        #[arg(long)]
        time: String,
    },
    /// Set the clock from this machine's time
    Local,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TCP/IP
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct IpArgs {
    #[command(subcommand)]
    pub command: IpCommand,
}

#[derive(Debug, Subcommand)]
pub enum IpCommand {
    /// Show IPv4 and IPv6 settings
    Show,
    /// Enable or disable IPv4 DHCP
    Dhcp4 { state: Toggle },
    /// Enable or disable IPv6 DHCP
    Dhcp6 { state: Toggle },
    /// Enable or disable link autonegotiation
    Autoneg { state: Toggle },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List the local accounts
    #[command(alias = "ls")]
    List,
    /// Set a local account's name and password (prompts for the password)
    Set {
        role: RoleArg,
        /// Account name
        #[arg(long)]
        name: String,
        /// Allow login from the WAN side
        #[arg(long)]
        wan_access: bool,
    },
    /// Enable or disable RADIUS authentication
    Radius { state: Toggle },
    /// Show the RADIUS server
    RadiusShow,
    /// Set the RADIUS server (prompts for the shared secret)
    RadiusServer {
        server: String,
        /// Authentication port
        #[arg(long = "auth-port", default_value = "1812")]
        auth_port: u16,
    },
    /// Show a role's RADIUS permissions
    Permissions { role: RoleArg },
    /// Replace a role's RADIUS permissions (uploads the system configuration)
    SetPermissions {
        role: RoleArg,
        /// Service types, e.g. "login-user" "administrative"
        permissions: Vec<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROFILES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProfilesArgs {
    #[command(subcommand)]
    pub command: ProfilesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfilesCommand {
    /// List configured profiles
    #[command(alias = "ls")]
    List,
    /// Display the resolved configuration (secrets masked)
    Show,
    /// Create or replace a profile from --host, --user, --port, --no-tls,
    /// --insecure and --timeout
    Add {
        name: String,
        /// PEM CA certificate for the card
        #[arg(long)]
        ca_cert: Option<PathBuf>,
        /// Keep the password in memory across host changes
        #[arg(long)]
        retain_password: bool,
    },
    /// Set the default profile
    Use { name: String },
    /// Delete a profile
    #[command(alias = "rm")]
    Remove { name: String },
    /// Store a profile's password in the system keyring
    SetPassword { name: Option<String> },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
