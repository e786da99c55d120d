//! Kitbag - keys, hashes, dates and object storage from the shell

mod commands;
mod object_path;

use clap::{Parser, Subcommand, ValueEnum};
use commands::hash::Algorithm;
use commands::CommandContext;
use kitbag_dates::DEFAULT_TIMEZONE;
use kitbag_logger::{init_tracing, Level, Logger, LoggerConfig};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "kitbag")]
#[command(version, about = "Keys, hashes, dates and object storage helpers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print debug messages and debug-level diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress informational output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate random keys (32, 64 and 128 bytes by default)
    Keys {
        /// Key size in bytes, repeatable
        #[arg(short, long = "bytes")]
        bytes: Vec<usize>,
    },

    /// Hash a string, printing hex
    Hash {
        #[arg(value_enum)]
        algorithm: Algorithm,
        input: String,
    },

    /// HMAC a string with a hex key, printing hex
    Hmac {
        #[arg(value_enum)]
        algorithm: Algorithm,
        input: String,

        /// Hex-encoded key
        #[arg(short, long, env = "KITBAG_HMAC_KEY", hide_env_values = true)]
        key: String,
    },

    /// Show a date in all supported representations
    Date {
        /// ISO-8601 timestamp (defaults to now)
        #[arg(long)]
        iso: Option<String>,

        /// Milliseconds since the epoch
        #[arg(long, conflicts_with = "iso")]
        ms: Option<i64>,

        #[arg(long, default_value = "en")]
        locale: String,

        /// IANA zone or UTC offset such as UTC+01:00
        #[arg(long, default_value = DEFAULT_TIMEZONE)]
        zone: String,

        /// Use a 24-hour clock
        #[arg(long = "24h")]
        hour24: bool,
    },

    /// Format a millisecond count as `1h 2m 3s`
    Duration { ms: u64 },

    /// Object storage operations
    S3 {
        #[command(subcommand)]
        command: S3Commands,

        /// Prefix of the endpoint and credential variables
        #[arg(long, global = true, default_value = "STORE_S3", env = "KITBAG_S3_ENV_PREFIX")]
        env_prefix: String,
    },
}

#[derive(Subcommand)]
pub enum S3Commands {
    /// Print an object (s3://bucket/key)
    Get {
        path: String,

        /// Parse and pretty-print as JSON
        #[arg(long)]
        json: bool,

        /// Print nothing instead of failing when the object cannot be fetched
        #[arg(long)]
        allow_missing: bool,
    },

    /// Upload a file or inline data
    Put {
        path: String,

        /// Local file to upload
        #[arg(long, conflicts_with = "data")]
        file: Option<PathBuf>,

        /// Inline data
        #[arg(long)]
        data: Option<String>,

        /// Treat the data as JSON and store it pretty-printed
        #[arg(long)]
        json: bool,
    },

    /// Show object metadata
    Stat { path: String },

    /// List objects under a prefix
    Ls {
        path: String,

        #[arg(short, long)]
        recursive: bool,
    },

    /// Remove an object
    Rm { path: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut logger_config = LoggerConfig::from_env();
    if cli.verbose {
        logger_config.level = Level::Debug;
    }

    // stdout carries command output, so diagnostics go to stderr
    init_tracing(&logger_config, std::io::stderr);

    let ctx = CommandContext {
        logger: Arc::new(Logger::new(logger_config, std::io::stderr())),
        output_format: cli.format,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Keys { bytes } => commands::keys::execute(&ctx, &bytes),
        Commands::Hash { algorithm, input } => commands::hash::hash(&ctx, algorithm, &input),
        Commands::Hmac {
            algorithm,
            input,
            key,
        } => commands::hash::hmac(&ctx, algorithm, &input, &key),
        Commands::Date {
            iso,
            ms,
            locale,
            zone,
            hour24,
        } => commands::date::execute(&ctx, iso.as_deref(), ms, &locale, &zone, hour24),
        Commands::Duration { ms } => commands::date::duration(&ctx, ms),
        Commands::S3 {
            command,
            env_prefix,
        } => commands::s3::execute(&ctx, command, &env_prefix).await,
    }
}
