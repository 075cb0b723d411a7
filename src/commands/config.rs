//! Config command implementation.
//!
//! Writes the default configuration in various formats.

use std::fs;
use std::path::PathBuf;

use netshow::cli::ConfigFormat;
use netshow::config::{render_config, Config};

/// Prints the default configuration, or writes it to `output`.
pub fn command_config(output: Option<PathBuf>, format: ConfigFormat) -> anyhow::Result<()> {
    let content = render_config(&Config::default(), &format)?;

    match output {
        Some(path) if path.to_string_lossy() != "-" => {
            fs::write(&path, content)?;
            println!("✅ Configuration written to: {}", path.display());
        }
        _ => print!("{}", content),
    }

    Ok(())
}
