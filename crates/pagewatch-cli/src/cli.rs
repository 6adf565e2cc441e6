//! Command-line interface definition using clap.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveTime;
use clap::Parser;
use pagewatch_core::config::{self, DEFAULT_PAGES_FILE, STATE_DIR_ENV};
use pagewatch_core::{parse_alert_time, parse_compound_duration, LearningConfig};
use pagewatch_runtime::{MonitorConfig, RelearnPolicy, RuntimeConfig};

fn version_string() -> &'static str {
    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| {
        format!(
            "{} ({}, {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_HASH"),
            env!("BUILD_DATE")
        )
    })
}

fn parse_wait(input: &str) -> Result<Duration, String> {
    parse_compound_duration(input).map_err(|e| e.to_string())
}

fn parse_time(input: &str) -> Result<NaiveTime, String> {
    parse_alert_time(input).map_err(|e| e.to_string())
}

/// Pagewatch - checks a list of web pages and notifies when one of them changes
#[derive(Parser, Debug)]
#[command(name = "pagewatch")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Time to wait between checks, as a compound duration (2h, 1h30m, 90s)
    #[arg(short, long, default_value = "2h", value_name = "XhYmZs", value_parser = parse_wait)]
    pub wait: Duration,

    /// Page list to use instead of config.csv
    #[arg(short, long, default_value = DEFAULT_PAGES_FILE, value_name = "FILE")]
    pub config: PathBuf,

    /// Local time for the daily "still running" notice, 24-hour HH:MM
    #[arg(short, long, default_value = "14:00", value_name = "HH:MM", value_parser = parse_time)]
    pub time: NaiveTime,

    /// Do not send the daily "still running" notice
    #[arg(long)]
    pub no_liveness: bool,

    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Debug logging, same as -v
    #[arg(short, long)]
    pub debug: bool,

    /// Path to state directory
    #[arg(long, env = STATE_DIR_ENV)]
    pub state_dir: Option<PathBuf>,

    /// Seconds between the two learning fetches, unless a page sets its own
    #[arg(long, default_value_t = 5, value_name = "SECS")]
    pub learning_wait: u64,

    /// Learn noise again after this many polls (0 never relearns)
    #[arg(long, default_value_t = 0, value_name = "POLLS")]
    pub relearn_every: u32,

    /// Shortest noise pattern kept while learning, in characters
    #[arg(long, default_value_t = 1, value_name = "CHARS")]
    pub min_pattern_len: usize,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30, value_name = "SECS")]
    pub request_timeout: u64,

    /// Keep snapshots in memory instead of the state directory
    #[arg(long)]
    pub memory: bool,
}

impl Cli {
    /// Returns the state directory to use.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(config::state_dir)
    }

    /// Returns the tracing filter for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        let level = if self.debug {
            self.verbose.max(1)
        } else {
            self.verbose
        };
        match level {
            0 => "info,teloxide=warn,hyper=warn,reqwest=warn",
            1 => "debug,teloxide=info,hyper=info,reqwest=info",
            2 => "trace,teloxide=debug,hyper=info",
            _ => "trace",
        }
    }

    /// Builds the runtime configuration.
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig::new()
            .with_poll_interval(self.wait)
            .with_request_timeout(Duration::from_secs(self.request_timeout.max(1)))
            .with_liveness_time((!self.no_liveness).then_some(self.time))
    }

    /// Builds the configuration shared by all page monitors.
    pub fn monitor_config(&self) -> MonitorConfig {
        let relearn = match self.relearn_every {
            0 => RelearnPolicy::Never,
            n => RelearnPolicy::EveryPolls(n),
        };
        MonitorConfig::new()
            .with_learning_wait(Duration::from_secs(self.learning_wait))
            .with_learning(LearningConfig::new().with_min_pattern_len(self.min_pattern_len))
            .with_relearn(relearn)
    }
}
