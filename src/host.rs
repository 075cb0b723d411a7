//! Handles to the data sources of the switch being inspected.

use crate::asic::PlatformPaths;
use crate::config::Config;
use crate::exec::{CommandRunner, SystemRunner};
use crate::sysfs::{AttributeSource, Sysfs};
use std::fmt;
use std::sync::Arc;

/// Names of the external diagnostic programs.
#[derive(Debug, Clone, PartialEq)]
pub struct Tools {
    pub lspci: String,
    pub ethtool: String,
    pub mstpctl: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            lspci: "lspci".into(),
            ethtool: "ethtool".into(),
            mstpctl: "mstpctl".into(),
        }
    }
}

/// Kernel attribute source, command runner, vendor file paths and tool
/// names, bundled so queries can be pointed at a real system or a fixture.
#[derive(Clone)]
pub struct Host {
    pub attrs: Arc<dyn AttributeSource>,
    pub runner: Arc<dyn CommandRunner>,
    pub paths: PlatformPaths,
    pub tools: Tools,
}

impl Host {
    pub fn new(attrs: Arc<dyn AttributeSource>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            attrs,
            runner,
            paths: PlatformPaths::default(),
            tools: Tools::default(),
        }
    }

    pub fn with_paths(mut self, paths: PlatformPaths) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_tools(mut self, tools: Tools) -> Self {
        self.tools = tools;
        self
    }

    /// The local system as described by `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(Sysfs::new(config.sysfs_root())),
            Arc::new(SystemRunner),
        )
        .with_paths(config.platform_paths())
        .with_tools(config.tools())
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("paths", &self.paths)
            .field("tools", &self.tools)
            .finish_non_exhaustive()
    }
}
