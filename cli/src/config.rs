//! Runtime configuration from flags, environment and `.env`.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use crate::error::CliError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Options shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Base URL of the booking API, including the `/api` prefix
    #[arg(long, env = "BOOKING_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Where the signed-in user is remembered between runs
    #[arg(long, env = "BOOKING_SESSION_FILE", global = true)]
    pub session_file: Option<PathBuf>,

    /// Give up on a request after this many seconds
    #[arg(long, env = "BOOKING_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Log requests and responses
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub session_file: PathBuf,
    pub timeout: Option<Duration>,
    pub verbose: bool,
}

impl Config {
    pub fn from_args(args: GlobalArgs) -> Result<Self, CliError> {
        let session_file = match args.session_file {
            Some(path) => path,
            None => default_session_file()?,
        };
        Ok(Self {
            api_url: args.api_url,
            session_file,
            timeout: args.timeout_secs.filter(|s| *s > 0).map(Duration::from_secs),
            verbose: args.verbose,
        })
    }

    /// `RUST_LOG` wins; otherwise warnings only, or everything from the
    /// client crates with `--verbose`.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "booking_core=debug,booking=debug"
        } else {
            "warn"
        }
    }
}

pub fn default_session_file() -> Result<PathBuf, CliError> {
    let mut path = dirs::data_dir().ok_or(CliError::NoDataDir)?;
    path.push("smart-appointment");
    path.push("session.json");
    Ok(path)
}
