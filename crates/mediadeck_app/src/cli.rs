use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use mediadeck_logging::{LevelFilter, LogDestination};

/// Terminal client for a self-hosted video download queue.
#[derive(Debug, Parser)]
#[command(name = "mediadeck", version, about)]
pub struct Cli {
    /// Backend base URL; overrides the config file and MEDIADECK_BASE_URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Config file to read instead of ./mediadeck.ron.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogTarget::File, global = true)]
    pub log: LogTarget,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
    Off,
}

impl LogTarget {
    pub fn destination(self) -> Option<LogDestination> {
        match self {
            LogTarget::File => Some(LogDestination::File),
            LogTarget::Terminal => Some(LogDestination::Terminal),
            LogTarget::Both => Some(LogDestination::Both),
            LogTarget::Off => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CliCommand {
    /// Show the queue and keep it updated until Ctrl-C.
    Watch,
    /// Print the queue once.
    Status,
    /// Show title and available formats for a URL without queueing it.
    Analyze { url: String },
    /// Queue a video or playlist.
    Add {
        url: String,
        /// Format id or quality label passed to the backend.
        #[arg(long, default_value = "best")]
        quality: String,
    },
    /// Pause a pending or downloading job.
    Pause { id: String },
    /// Resume a paused job or retry a failed one.
    Resume { id: String },
    /// Cancel a job and remove it from the queue.
    Cancel { id: String },
    /// Remove all completed jobs.
    ClearCompleted,
}
