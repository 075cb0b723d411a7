//! CLI arguments and subcommands for netshow.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "netshow",
    about = "Read-only inspection of Linux switch interfaces, bridges, bonds and ASIC ports",
    long_about = "Read-only inspection of Linux switch interfaces, bridges, bonds and ASIC ports.\n\n\
                  Classifies kernel interfaces, maps switch ports to their ASIC names and \
                  boot-time speeds, and reports hardware counters. Never changes network state.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level, logs go to stderr [default: warn]
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Root of the kernel interface tree (default /sys/class/net)
    #[arg(long)]
    pub sysfs_root: Option<PathBuf>,

    /// Vendor port table file
    #[arg(long)]
    pub porttab: Option<PathBuf>,

    /// Vendor boot-time speed configuration file
    #[arg(long)]
    pub bcm_config: Option<PathBuf>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show interfaces and their roles
    Interfaces {
        /// Only show this interface
        name: Option<String>,

        /// Include loopback and sub-interfaces
        #[arg(short = 'a', long)]
        all: bool,
    },

    /// Show hardware counters for switch ports
    Counters {
        /// Only show this interface
        name: Option<String>,
    },

    /// Show detected switching ASIC and its port mapping
    Asic,

    /// Show spanning tree state of a bridge
    Stp {
        /// Bridge name
        bridge: String,
    },

    /// Check which data sources are available on this system
    Check,

    /// Print the default configuration
    Config {
        /// Output file path
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,
    },
}
