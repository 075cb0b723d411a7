//! Broadcom port mapping.
//!
//! Two vendor files are involved:
//! - the port table, one row per front-panel port:
//!   `swp1  xe0  0 ...` (kernel name, chip port, SDK interface index)
//! - the SDK boot configuration, with rows such as
//!   `port_init_speed_xe0=10000` or `port_init_speed_xe1.1=40000`
//!
//! Both are optional. Each is parsed independently and a missing file only
//! removes the data it would have contributed.

use super::{AsicCache, AsicResolver, PlatformPaths, KERNEL_PORT_PREFIX};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

const VENDOR: &str = "broadcom";
const INIT_SPEED_PREFIX: &str = "port_init_speed";

/// Broadcom resolver. Works with chips exposing multiple SDK interfaces
/// per chip port.
#[derive(Debug, Clone)]
pub struct BroadcomAsic {
    porttab: PathBuf,
    bcm_config: PathBuf,
}

impl Default for BroadcomAsic {
    fn default() -> Self {
        Self::from_paths(&PlatformPaths::default())
    }
}

impl BroadcomAsic {
    pub fn new(porttab: impl Into<PathBuf>, bcm_config: impl Into<PathBuf>) -> Self {
        Self {
            porttab: porttab.into(),
            bcm_config: bcm_config.into(),
        }
    }

    pub fn from_paths(paths: &PlatformPaths) -> Self {
        Self::new(&paths.porttab, &paths.bcm_config)
    }

    /// Adds one entry per port table row to `cache`.
    /// Returns the number of rows accepted.
    pub fn parse_ports_file(&self, cache: &mut AsicCache) -> io::Result<usize> {
        let content = fs::read_to_string(&self.porttab)?;
        let mut accepted = 0;

        for (idx, line) in content.lines().enumerate() {
            if !line.starts_with(KERNEL_PORT_PREFIX) {
                continue;
            }
            match parse_porttab_line(line) {
                Some((kernel_name, asic_name)) => {
                    cache.insert_port(kernel_name, asic_name);
                    accepted += 1;
                }
                None => debug!(
                    "{}:{}: skipping malformed port row",
                    self.porttab.display(),
                    idx + 1
                ),
            }
        }

        Ok(accepted)
    }

    /// Attaches boot-time speeds to ports already present in `cache`.
    /// Returns the number of speeds attached.
    pub fn parse_initial_speed_file(&self, cache: &mut AsicCache) -> io::Result<usize> {
        let content = fs::read_to_string(&self.bcm_config)?;
        let mut attached = 0;

        for line in content.lines() {
            if let Some((asic_name, speed)) = parse_speed_line(line) {
                // speed rows may name chip ports with no kernel interface
                if cache.set_initial_speed(&asic_name, speed) {
                    attached += 1;
                }
            }
        }

        Ok(attached)
    }

    /// ASIC name of a single interface, read straight from the port table.
    /// Agrees with [`AsicResolver::build_mapping`] for the same file.
    pub fn lookup_port_name(&self, iface: &str) -> Option<String> {
        let content = read_optional(&self.porttab)?;
        asic_name_of(&content, iface)
    }

    /// Boot-time speed of a single interface without building the whole
    /// mapping. Agrees with [`AsicResolver::build_mapping`] for the same files.
    pub fn lookup_initial_speed(&self, iface: &str) -> Option<String> {
        let porttab = read_optional(&self.porttab)?;
        let asic_name = asic_name_of(&porttab, iface)?;

        // speeds go to whichever kernel port claimed this ASIC port last
        let owner = port_rows(&porttab)
            .filter(|(_, name)| *name == asic_name)
            .last()
            .map(|(kernel_name, _)| kernel_name)?;
        if owner != iface {
            return None;
        }

        let bcm = read_optional(&self.bcm_config)?;
        bcm.lines()
            .filter_map(parse_speed_line)
            .filter(|(name, _)| *name == asic_name)
            .last()
            .map(|(_, speed)| speed.to_string())
    }
}

impl AsicResolver for BroadcomAsic {
    fn vendor(&self) -> &'static str {
        VENDOR
    }

    fn build_mapping(&self) -> AsicCache {
        let mut cache = AsicCache::for_vendor(VENDOR);

        match self.parse_ports_file(&mut cache) {
            Ok(n) => debug!("{}: {} port rows", self.porttab.display(), n),
            Err(e) => debug!("port table {} unavailable: {}", self.porttab.display(), e),
        }

        match self.parse_initial_speed_file(&mut cache) {
            Ok(n) => debug!("{}: {} initial speeds", self.bcm_config.display(), n),
            Err(e) => debug!(
                "speed config {} unavailable: {}",
                self.bcm_config.display(),
                e
            ),
        }

        cache
    }
}

fn read_optional(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            debug!("{} unavailable: {}", path.display(), e);
            None
        }
    }
}

fn port_rows(content: &str) -> impl Iterator<Item = (&str, String)> {
    content
        .lines()
        .filter(|line| line.starts_with(KERNEL_PORT_PREFIX))
        .filter_map(parse_porttab_line)
}

/// ASIC name from the last row for `iface`.
fn asic_name_of(porttab: &str, iface: &str) -> Option<String> {
    port_rows(porttab)
        .filter(|(kernel_name, _)| *kernel_name == iface)
        .last()
        .map(|(_, asic_name)| asic_name)
}

/// `swp1 xe0 0 ...` -> `("swp1", "xe0.0")`
pub(crate) fn parse_porttab_line(line: &str) -> Option<(&str, String)> {
    let mut fields = line.split_whitespace();
    let kernel_name = fields.next()?;
    let chip = fields.next()?;
    let sdk_index = fields.next()?;
    Some((kernel_name, format!("{}.{}", chip, sdk_index)))
}

/// `port_init_speed_xe1.2=40000` -> `("xe1.2", "40000")`,
/// `port_init_speed_xe0=10000` -> `("xe0.0", "10000")`
pub(crate) fn parse_speed_line(line: &str) -> Option<(String, &str)> {
    if !line.starts_with(INIT_SPEED_PREFIX) {
        return None;
    }
    let (ident, value) = line.split_once('=')?;
    if value.contains('=') {
        return None;
    }
    let speed = value.trim();
    let port = ident.trim_end().rsplit('_').next()?;
    let (chip, sdk_index) = port.split_once('.').unwrap_or((port, "0"));
    if chip.is_empty() || sdk_index.is_empty() || sdk_index.contains('.') || speed.is_empty() {
        return None;
    }
    Some((format!("{}.{}", chip, sdk_index), speed))
}
