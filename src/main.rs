//! netshow - read-only switch inspection CLI.
//!
//! Initializes logging and configuration, then dispatches subcommands.

mod commands;

use clap::{Parser, ValueEnum};
use tracing::{debug, Level};

use commands::{
    command_asic, command_check, command_config, command_counters, command_interfaces,
    command_stp,
};
use netshow::cli::{Args, Commands, LogLevel};
use netshow::config::{render_config, resolve_config, validate_effective_config, Config};
use netshow::Host;

/// Initializes tracing on stderr. CLI level wins over the config file.
fn setup_logging(args: &Args, config: &Config) {
    let level = args.log_level.clone().unwrap_or_else(|| {
        config
            .log_level
            .as_deref()
            .and_then(|l| LogLevel::from_str(l, true).ok())
            .unwrap_or(LogLevel::Warn)
    });

    let log_level = match level {
        LogLevel::Off => return,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;
    setup_logging(&args, &config);

    if args.show_config {
        print!("{}", render_config(&config, &args.config_format)?);
        return Ok(());
    }

    // config generation and the check report work with any config
    match &args.command {
        Some(Commands::Config { output, format }) => {
            return command_config(output.clone(), format.clone());
        }
        Some(Commands::Check) => {
            return command_check(&Host::from_config(&config), &config);
        }
        _ => {}
    }

    validate_effective_config(&config)?;
    let host = Host::from_config(&config);
    debug!("inspecting {:?}", host);

    match args.command {
        Some(Commands::Interfaces { name, all }) => command_interfaces(&host, name, all),
        None => command_interfaces(&host, None, false),
        Some(Commands::Counters { name }) => command_counters(&host, name),
        Some(Commands::Asic) => command_asic(&host),
        Some(Commands::Stp { bridge }) => command_stp(&host, &bridge),
        Some(Commands::Config { .. }) | Some(Commands::Check) => {
            unreachable!("handled above")
        }
    }
}
