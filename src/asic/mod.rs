//! Switching ASIC detection and kernel-to-ASIC port mapping.
//!
//! This module provides:
//! - `discovery`: detecting the switching silicon vendor from the PCI bus listing
//! - `broadcom`: port table and boot-time speed parsing for Broadcom platforms
//!
//! The result of a discovery run is an [`AsicCache`], built once per
//! invocation and shared read-only afterwards.

pub mod broadcom;
pub mod discovery;

use crate::host::Host;
use ahash::AHashMap as HashMap;
use std::path::PathBuf;
use tracing::debug;

pub use broadcom::BroadcomAsic;
pub use discovery::{discover_asic, discover_from_listing, VENDOR_REGISTRY};

/// Kernel port name -> ASIC name table.
pub const DEFAULT_PORTTAB: &str = "/var/lib/cumulus/porttab";
/// Broadcom SDK boot configuration with `port_init_speed_*` entries.
pub const DEFAULT_BCM_CONFIG: &str = "/etc/bcm.d/config.bcm";
/// Prefix of front-panel switch port names.
pub const KERNEL_PORT_PREFIX: &str = "swp";

/// Locations of the vendor files read by the resolvers.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformPaths {
    pub porttab: PathBuf,
    pub bcm_config: PathBuf,
}

impl Default for PlatformPaths {
    fn default() -> Self {
        Self {
            porttab: PathBuf::from(DEFAULT_PORTTAB),
            bcm_config: PathBuf::from(DEFAULT_BCM_CONFIG),
        }
    }
}

/// ASIC data for one kernel port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelPort {
    /// `<chip>.<sdk index>`, e.g. `xe11.0`
    pub asic_name: String,
    /// Boot-time speed exactly as written in the vendor file.
    pub initial_speed: Option<String>,
}

/// Bidirectional kernel/ASIC port mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AsicCache {
    vendor: Option<String>,
    kernelports: HashMap<String, KernelPort>,
    asicports: HashMap<String, String>,
}

impl AsicCache {
    /// Empty mapping attributed to `vendor`.
    pub fn for_vendor(vendor: &str) -> Self {
        Self {
            vendor: Some(vendor.to_string()),
            ..Self::default()
        }
    }

    /// Vendor that produced the mapping, `None` when no ASIC was detected.
    pub fn vendor(&self) -> Option<&str> {
        self.vendor.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.kernelports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.kernelports.len()
    }

    pub fn kernel_port(&self, kernel_name: &str) -> Option<&KernelPort> {
        self.kernelports.get(kernel_name)
    }

    pub fn kernel_name(&self, asic_name: &str) -> Option<&str> {
        self.asicports.get(asic_name).map(String::as_str)
    }

    pub fn initial_speed(&self, kernel_name: &str) -> Option<&str> {
        self.kernelports
            .get(kernel_name)
            .and_then(|p| p.initial_speed.as_deref())
    }

    /// Kernel ports sorted by name.
    pub fn kernel_ports(&self) -> Vec<(&str, &KernelPort)> {
        let mut ports: Vec<(&str, &KernelPort)> = self
            .kernelports
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        ports.sort_by(|a, b| natural_cmp(a.0, b.0));
        ports
    }

    /// Records a port table row. A later row for the same kernel port
    /// replaces its entry; a later row reusing an ASIC port takes over the
    /// inverse entry while the earlier kernel port keeps its name.
    pub(crate) fn insert_port(&mut self, kernel_name: &str, asic_name: String) {
        if let Some(old) = self.kernelports.get(kernel_name) {
            if self.asicports.get(&old.asic_name).map(String::as_str) == Some(kernel_name) {
                self.asicports.remove(&old.asic_name);
            }
        }
        self.asicports
            .insert(asic_name.clone(), kernel_name.to_string());
        self.kernelports.insert(
            kernel_name.to_string(),
            KernelPort {
                asic_name,
                initial_speed: None,
            },
        );
    }

    /// Attaches a boot-time speed to the kernel port owning `asic_name`.
    /// Returns false when no kernel port is wired to that ASIC port.
    pub(crate) fn set_initial_speed(&mut self, asic_name: &str, speed: &str) -> bool {
        let Some(kernel_name) = self.asicports.get(asic_name) else {
            return false;
        };
        match self.kernelports.get_mut(kernel_name) {
            Some(port) => {
                port.initial_speed = Some(speed.to_string());
                true
            }
            None => false,
        }
    }
}

/// Produces a kernel/ASIC port mapping for one vendor's silicon.
pub trait AsicResolver: Send + Sync {
    fn vendor(&self) -> &'static str;
    fn build_mapping(&self) -> AsicCache;
}

/// Runs discovery and builds the mapping. Returns an empty cache when no
/// known ASIC is present.
pub fn asic_cacheinfo(host: &Host) -> AsicCache {
    match discover_asic(host) {
        Some(resolver) => {
            let cache = resolver.build_mapping();
            debug!(
                "{} ASIC mapping built with {} kernel ports",
                resolver.vendor(),
                cache.len()
            );
            cache
        }
        None => AsicCache::default(),
    }
}

/// Orders names so that `swp2` sorts before `swp10`.
pub fn natural_cmp(a: &str, b: &str) -> std::cmp::Ordering {
    fn chunks(s: &str) -> Vec<(bool, &str)> {
        let mut out = Vec::new();
        let mut start = 0;
        let bytes = s.as_bytes();
        for i in 1..=bytes.len() {
            if i == bytes.len() || bytes[i].is_ascii_digit() != bytes[start].is_ascii_digit() {
                out.push((bytes[start].is_ascii_digit(), &s[start..i]));
                start = i;
            }
        }
        out
    }

    let (ca, cb) = (chunks(a), chunks(b));
    for ((da, sa), (db, sb)) in ca.iter().zip(cb.iter()) {
        let ord = match (da, db) {
            (true, true) => sa
                .len()
                .cmp(&sb.len())
                .then_with(|| sa.cmp(sb)),
            _ => sa.cmp(sb),
        };
        if ord != std::cmp::Ordering::Equal {
            return ord;
        }
    }
    ca.len().cmp(&cb.len())
}
