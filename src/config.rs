//! Configuration management for netshow.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::asic::{PlatformPaths, DEFAULT_BCM_CONFIG, DEFAULT_PORTTAB};
use crate::cli::{Args, ConfigFormat};
use crate::host::Tools;
use crate::sysfs::DEFAULT_SYSFS_NET;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default config file locations, first existing one wins.
pub const DEFAULT_CONFIG_PATHS: [&str; 4] = [
    "/etc/netshow/netshow.yaml",
    "/etc/netshow/netshow.yml",
    "/etc/netshow/netshow.json",
    "./netshow.yaml",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot serialize config: {0}")]
    Serialize(String),

    #[error("{0}")]
    Invalid(String),
}

/// Data source locations and external tool names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    // Kernel and vendor files
    #[serde(alias = "sysfs-root")]
    pub sysfs_root: Option<PathBuf>,
    pub porttab: Option<PathBuf>,
    #[serde(alias = "bcm-config")]
    pub bcm_config: Option<PathBuf>,

    // External tools
    pub lspci: Option<String>,
    pub ethtool: Option<String>,
    pub mstpctl: Option<String>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sysfs_root: Some(PathBuf::from(DEFAULT_SYSFS_NET)),
            porttab: Some(PathBuf::from(DEFAULT_PORTTAB)),
            bcm_config: Some(PathBuf::from(DEFAULT_BCM_CONFIG)),
            lspci: Some("lspci".into()),
            ethtool: Some("ethtool".into()),
            mstpctl: Some("mstpctl".into()),
            log_level: Some("warn".into()),
        }
    }
}

impl Config {
    pub fn sysfs_root(&self) -> PathBuf {
        self.sysfs_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SYSFS_NET))
    }

    pub fn platform_paths(&self) -> PlatformPaths {
        let defaults = PlatformPaths::default();
        PlatformPaths {
            porttab: self.porttab.clone().unwrap_or(defaults.porttab),
            bcm_config: self.bcm_config.clone().unwrap_or(defaults.bcm_config),
        }
    }

    pub fn tools(&self) -> Tools {
        let defaults = Tools::default();
        Tools {
            lspci: self.lspci.clone().unwrap_or(defaults.lspci),
            ethtool: self.ethtool.clone().unwrap_or(defaults.ethtool),
            mstpctl: self.mstpctl.clone().unwrap_or(defaults.mstpctl),
        }
    }
}

/// Validate effective config (used at startup and by `check`)
pub fn validate_effective_config(cfg: &Config) -> Result<(), ConfigError> {
    let paths = [
        ("sysfs_root", cfg.sysfs_root.as_deref()),
        ("porttab", cfg.porttab.as_deref()),
        ("bcm_config", cfg.bcm_config.as_deref()),
    ];
    for (key, path) in paths {
        if path.is_some_and(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::Invalid(format!("{} must not be empty", key)));
        }
    }

    let tools = [
        ("lspci", cfg.lspci.as_deref()),
        ("ethtool", cfg.ethtool.as_deref()),
        ("mstpctl", cfg.mstpctl.as_deref()),
    ];
    for (key, program) in tools {
        if program.is_some_and(|p| p.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "{} program name must not be empty",
                key
            )));
        }
    }

    if let Some(level) = cfg.log_level.as_deref() {
        match level.to_ascii_lowercase().as_str() {
            "off" | "error" | "warn" | "info" | "debug" | "trace" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "Invalid log_level '{}', expected off/error/warn/info/debug/trace",
                    other
                )));
            }
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, ConfigError> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(root) = &args.sysfs_root {
        config.sysfs_root = Some(root.clone());
    }
    if let Some(porttab) = &args.porttab {
        config.porttab = Some(porttab.clone());
    }
    if let Some(bcm) = &args.bcm_config {
        config.bcm_config = Some(bcm.clone());
    }

    Ok(config)
}

/// Loads a config file, or the first default location that exists.
/// Missing files yield the default configuration.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match DEFAULT_CONFIG_PATHS.iter().find(|p| Path::new(p).exists()) {
            Some(p) => PathBuf::from(p),
            None => return Ok(Config::default()),
        },
    };

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;

    let config = parse_config(&path, &content)?;
    info!("Loaded configuration from: {}", path.display());
    Ok(config)
}

/// Parses config content according to the file extension (YAML by default).
/// Keys absent from the file keep their default values.
pub fn parse_config(path: &Path, content: &str) -> Result<Config, ConfigError> {
    let parsed: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?,
        Some("toml") => toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?,
        _ => serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?,
    };

    Ok(merge_defaults(parsed))
}

fn merge_defaults(cfg: Config) -> Config {
    let d = Config::default();
    Config {
        sysfs_root: cfg.sysfs_root.or(d.sysfs_root),
        porttab: cfg.porttab.or(d.porttab),
        bcm_config: cfg.bcm_config.or(d.bcm_config),
        lspci: cfg.lspci.or(d.lspci),
        ethtool: cfg.ethtool.or(d.ethtool),
        mstpctl: cfg.mstpctl.or(d.mstpctl),
        log_level: cfg.log_level.or(d.log_level),
    }
}

/// Renders configuration in the requested format
pub fn render_config(config: &Config, format: &ConfigFormat) -> Result<String, ConfigError> {
    match format {
        ConfigFormat::Json => {
            serde_json::to_string_pretty(config).map_err(|e| ConfigError::Serialize(e.to_string()))
        }
        ConfigFormat::Toml => {
            toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize(e.to_string()))
        }
        ConfigFormat::Yaml => {
            serde_yaml::to_string(config).map_err(|e| ConfigError::Serialize(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = Config::default();
        assert!(validate_effective_config(&cfg).is_ok());
        assert_eq!(cfg.platform_paths(), PlatformPaths::default());
        assert_eq!(cfg.tools().ethtool, "ethtool");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let cfg = parse_config(
            Path::new("netshow.yaml"),
            "porttab: /tmp/porttab\nethtool: /usr/sbin/ethtool\n",
        )
        .unwrap();
        assert_eq!(cfg.porttab, Some(PathBuf::from("/tmp/porttab")));
        assert_eq!(cfg.ethtool.as_deref(), Some("/usr/sbin/ethtool"));
        assert_eq!(cfg.bcm_config, Some(PathBuf::from(DEFAULT_BCM_CONFIG)));
        assert_eq!(cfg.lspci.as_deref(), Some("lspci"));
    }

    #[test]
    fn test_json_and_toml() {
        let cfg = parse_config(Path::new("n.json"), r#"{"mstpctl": "/sbin/mstpctl"}"#).unwrap();
        assert_eq!(cfg.mstpctl.as_deref(), Some("/sbin/mstpctl"));

        let cfg = parse_config(Path::new("n.toml"), "sysfs_root = \"/tmp/sys\"\n").unwrap();
        assert_eq!(cfg.sysfs_root(), PathBuf::from("/tmp/sys"));
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let err = parse_config(Path::new("n.yaml"), "porttab: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn test_validation_rejects_empty_values() {
        let cfg = Config {
            ethtool: Some("  ".into()),
            ..Config::default()
        };
        assert!(validate_effective_config(&cfg).is_err());

        let cfg = Config {
            porttab: Some(PathBuf::new()),
            ..Config::default()
        };
        assert!(validate_effective_config(&cfg).is_err());

        let cfg = Config {
            log_level: Some("loud".into()),
            ..Config::default()
        };
        assert!(validate_effective_config(&cfg).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "bcm_config: /tmp/config.bcm").unwrap();
        let cfg = load_config(Some(file.path())).unwrap();
        assert_eq!(cfg.bcm_config, Some(PathBuf::from("/tmp/config.bcm")));

        let cfg = load_config(Some(Path::new("/nonexistent/netshow.yaml"))).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_render_round_trips_yaml() {
        let cfg = Config::default();
        let text = render_config(&cfg, &ConfigFormat::Yaml).unwrap();
        let back = parse_config(Path::new("x.yaml"), &text).unwrap();
        assert_eq!(back, cfg);
    }
}
