//! Clap derive structures for the `eventos` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// eventos -- manage events and their sessions from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "eventos",
    version,
    about = "Manage events and sessions from the command line",
    long_about = "A command-line client for the eventos event-management API.\n\n\
        Sign in once with `eventos login`; the session is kept between runs\n\
        and sent as a bearer token with every request.",
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
    /// Config profile to use
    #[arg(long, short = 'p', env = "EVENTOS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API root URL (overrides profile)
    #[arg(long, env = "EVENTOS_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "EVENTOS_OUTPUT",
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

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "EVENTOS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "EVENTOS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Keep the session in memory only (nothing is read or written)
    #[arg(long, global = true)]
    pub ephemeral: bool,
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and keep the session
    Login(LoginArgs),

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Create a new account
    Register(RegisterArgs),

    /// Browse and manage events
    #[command(alias = "ev")]
    Events(EventsArgs),

    /// Browse and manage event sessions
    #[command(alias = "s")]
    Sessions(SessionsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ACCOUNT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (defaults to the profile's email, else prompts)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Password (prefer the keyring or EVENTOS_PASSWORD)
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Account email (prompts when omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Password (prompts when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  EVENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// List events, one page at a time
    #[command(alias = "ls")]
    List(EventListArgs),

    /// Show an event and its sessions
    Show {
        /// Event ID
        id: i64,
    },

    /// Create an event (requires sign-in)
    Create(EventFields),

    /// Update an event; omitted fields keep their current values
    Update {
        /// Event ID
        id: i64,

        #[command(flatten)]
        fields: EventFields,
    },

    /// Delete an event
    Delete {
        /// Event ID
        id: i64,
    },

    /// Register for an event
    Join {
        /// Event ID
        id: i64,
    },

    /// Cancel an event registration
    Leave {
        /// Event ID
        id: i64,
    },

    /// Show the seats left for an event
    Capacity {
        /// Event ID
        id: i64,
    },

    /// Events you are registered for (requires sign-in)
    Mine,

    /// Search events by name
    Search {
        /// Text to look for in event names
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct EventListArgs {
    /// Filter by name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Page number (1-based)
    #[arg(long)]
    pub page: Option<u32>,

    /// Results per page
    #[arg(long, short = 'l')]
    pub per_page: Option<u32>,
}

/// Editable event fields. Values are checked before anything is sent.
#[derive(Debug, Args, Default)]
pub struct EventFields {
    /// Event name
    #[arg(long)]
    pub name: Option<String>,

    /// Event description
    #[arg(long)]
    pub description: Option<String>,

    /// Start, e.g. 2025-06-01T18:00
    #[arg(long, value_name = "DATETIME")]
    pub start: Option<String>,

    /// End, after the start
    #[arg(long, value_name = "DATETIME")]
    pub end: Option<String>,

    /// Maximum attendees
    #[arg(long)]
    pub capacity: Option<String>,

    /// Status (defaults to "activo")
    #[arg(long)]
    pub status: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SESSIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SessionsArgs {
    #[command(subcommand)]
    pub command: SessionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SessionsCommand {
    /// List all sessions
    #[command(alias = "ls")]
    List,

    /// List the sessions of one event
    ForEvent {
        /// Event ID
        event_id: i64,
    },

    /// Show one session
    Show {
        /// Session ID
        id: i64,
    },

    /// Create a session (requires sign-in)
    Create(TalkFields),

    /// Update a session; omitted fields keep their current values
    Update {
        /// Session ID
        id: i64,

        #[command(flatten)]
        fields: TalkFields,
    },

    /// Delete a session
    Delete {
        /// Session ID
        id: i64,
    },

    /// Register for a session
    Join {
        /// Session ID
        id: i64,
    },

    /// Show the seats left for a session
    Capacity {
        /// Session ID
        id: i64,
    },

    /// Who attends which session
    Attendance,

    /// Set the speaker of a session
    AssignSpeaker {
        /// Session ID
        id: i64,

        /// Speaker name
        speaker: String,
    },
}

/// Editable session fields. Values are checked before anything is sent.
#[derive(Debug, Args, Default)]
pub struct TalkFields {
    /// Owning event ID
    #[arg(long, value_name = "ID")]
    pub event: Option<String>,

    /// Session name
    #[arg(long)]
    pub name: Option<String>,

    /// Session description
    #[arg(long)]
    pub description: Option<String>,

    /// Start, e.g. 2025-06-01T18:00
    #[arg(long, value_name = "DATETIME")]
    pub start: Option<String>,

    /// End, after the start
    #[arg(long, value_name = "DATETIME")]
    pub end: Option<String>,

    /// Maximum attendees
    #[arg(long)]
    pub capacity: Option<String>,

    /// Speaker name
    #[arg(long)]
    pub speaker: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key (api_url, email, password_env, insecure, timeout, ca_cert, storage)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile to store the password for (defaults to the active one)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
