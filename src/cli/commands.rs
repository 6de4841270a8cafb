//! CLI commands and argument parsing

use crate::error::{Error, Result};
use crate::types::{parse_key_value, LogLevel};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// Browse a page-numbered JSON API through the page cache
#[derive(Parser, Debug)]
#[command(name = "pagecache")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Resource configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output (same as `--log-level debug`)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level; overrides `--verbose`
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the resource and replay navigation steps
    Browse {
        /// Comma-separated steps: next, prev, jump:N, per-page:N, param:key=value, unparam:key
        #[arg(long, default_value = "")]
        steps: String,

        /// Extra query parameter for the initial request context (key=value)
        #[arg(short, long = "param")]
        params: Vec<String>,
    },

    /// Print pager sections without touching the network
    Pager {
        /// Total number of pages
        #[arg(long)]
        total_pages: u32,

        /// Current page
        #[arg(long, default_value = "1")]
        current: u32,

        /// Pages shown at each edge (defaults to the config, then 2)
        #[arg(long)]
        end_count: Option<u32>,

        /// Pages shown on each side of the current page (defaults to the config, then 2)
        #[arg(long)]
        middle_count: Option<u32>,
    },

    /// Validate the resource configuration
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}

/// One navigation step of `browse`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Move to the next page
    Next,
    /// Move to the previous page
    Previous,
    /// Jump to a page
    Jump(u32),
    /// Change items per page
    PerPage(u32),
    /// Set a request context parameter
    Param(String, String),
    /// Remove a request context parameter
    Unparam(String),
}

impl Cli {
    /// Level the log subscriber filters at
    pub fn log_level(&self) -> LogLevel {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level,
            (None, true) => LogLevel::Debug,
            (None, false) => LogLevel::Info,
        }
    }
}

impl FromStr for Step {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };

        let number = |arg: Option<&str>| -> Result<u32> {
            arg.and_then(|a| a.trim().parse().ok())
                .ok_or_else(|| Error::config(format!("Step '{s}' needs a page number")))
        };

        match name {
            "next" | "n" => Ok(Self::Next),
            "prev" | "previous" | "p" => Ok(Self::Previous),
            "jump" | "j" => Ok(Self::Jump(number(arg)?)),
            "per-page" => Ok(Self::PerPage(number(arg)?)),
            "param" => {
                let (key, value) = arg
                    .and_then(parse_key_value)
                    .ok_or_else(|| Error::config(format!("Step '{s}' needs key=value")))?;
                Ok(Self::Param(key, value))
            }
            "unparam" => match arg.map(str::trim) {
                Some(key) if !key.is_empty() => Ok(Self::Unparam(key.to_string())),
                _ => Err(Error::config(format!("Step '{s}' needs a key"))),
            },
            _ => Err(Error::config(format!("Unknown step '{s}'"))),
        }
    }
}

/// Parse a comma-separated step list; blank entries are skipped
pub fn parse_steps(input: &str) -> Result<Vec<Step>> {
    input
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::parse)
        .collect()
}
