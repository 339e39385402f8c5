//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, init, validate, check, health), and their
//! associated argument structs. Every `run` flag has an environment
//! variable equivalent.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::Overrides;

/// Path of the admin health endpoint served by `run`.
pub const HEALTH_PATH: &str = "/_devgate/health";

#[derive(Parser)]
#[command(
    name = "devgate",
    version,
    about = "Development proxy: backend paths to an origin, everything else served locally",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        devgate run                                  Forward graphql/oauth/logout to localhost:8081\n  \
        devgate run --static-dir build               Also serve the built client\n  \
        devgate check /graphql /static/app.js        Show where paths would go\n  \
        devgate init                                 Create a starter config"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the proxy server
    Run(Box<RunArgs>),

    /// Generate a starter config file
    Init(InitArgs),

    /// Validate a config file without starting
    Validate(ValidateArgs),

    /// Print the routing decision for request paths
    Check(CheckArgs),

    /// Check health of a running instance
    Health(HealthArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        devgate run                                         Auto-detect ./devgate.yaml or use defaults\n  \
        devgate run -c devgate.yaml                         Specific config file\n  \
        devgate run --target http://localhost:9000/ -p 8080 Different backend and port")]
pub struct RunArgs {
    /// Config file path (.yaml, .json, .toml)
    #[arg(short, long, env = "DEVGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Backend origin that matching requests are forwarded to
    #[arg(short, long, env = "DEVGATE_TARGET")]
    pub target: Option<String>,

    /// Directory served for requests that stay local
    #[arg(short, long, env = "DEVGATE_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Backend timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", help_heading = "Tuning")]
    pub timeout: Option<u64>,

    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 10 * 1_048_576,
        help_heading = "Tuning"
    )]
    pub max_body: usize,

    /// Config file poll interval in seconds
    #[arg(
        long,
        env = "POLL_INTERVAL_SECS",
        default_value_t = 2,
        help_heading = "Tuning"
    )]
    pub poll_interval: u64,
}

impl RunArgs {
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            target: self.target.clone(),
            timeout: self.timeout,
            static_dir: self.static_dir.clone(),
        }
    }
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        devgate init                          Minimal config (yaml)\n  \
        devgate init --full                   Every option, documented\n  \
        devgate init -f toml -o config.toml   TOML format")]
pub struct InitArgs {
    /// Output format
    #[arg(short, long, default_value = "yaml")]
    pub format: ConfigFormat,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Include full documentation as comments
    #[arg(long)]
    pub full: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(default_value = "devgate.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        devgate check /graphql /oauth/google/start /home\n  \
        devgate check -c devgate.yaml --format json /api/graphql")]
pub struct CheckArgs {
    /// Request paths to evaluate
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Config file whose rules to use (built-in rules when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:3000")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
