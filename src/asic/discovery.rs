//! Switching ASIC discovery from the PCI bus listing.

use super::{AsicResolver, BroadcomAsic, PlatformPaths};
use crate::host::Host;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Builds the resolver for a detected vendor.
pub type ResolverCtor = fn(&PlatformPaths) -> Box<dyn AsicResolver>;

/// One recognised switching silicon vendor.
pub struct VendorEntry {
    pub vendor: &'static str,
    /// Matched against lower-cased `lspci -nn` lines.
    pub pattern: Regex,
    pub build: ResolverCtor,
}

fn broadcom(paths: &PlatformPaths) -> Box<dyn AsicResolver> {
    Box::new(BroadcomAsic::from_paths(paths))
}

/// Known vendors, checked in order.
pub static VENDOR_REGISTRY: Lazy<Vec<VendorEntry>> = Lazy::new(|| {
    vec![VendorEntry {
        vendor: "broadcom",
        pattern: Regex::new(r"(ethernet|network)\s+controller.*broadcom")
            .expect("valid broadcom pattern"),
        build: broadcom,
    }]
});

/// Runs `lspci -nn` and returns the resolver for the first recognised
/// controller. Any failure to run the command means no ASIC.
pub fn discover_asic(host: &Host) -> Option<Box<dyn AsicResolver>> {
    let listing = match host.runner.run(&host.tools.lspci, &["-nn"]) {
        Ok(out) => out,
        Err(e) => {
            debug!("ASIC discovery skipped: {}", e);
            return None;
        }
    };
    discover_from_listing(&listing, &host.paths)
}

/// Scans a bus listing against [`VENDOR_REGISTRY`]. First matching line wins.
pub fn discover_from_listing(
    listing: &str,
    paths: &PlatformPaths,
) -> Option<Box<dyn AsicResolver>> {
    for line in listing.lines() {
        let line = line.to_lowercase();
        if let Some(entry) = VENDOR_REGISTRY.iter().find(|e| e.pattern.is_match(&line)) {
            debug!("detected {} switching ASIC", entry.vendor);
            return Some((entry.build)(paths));
        }
    }
    debug!("no known switching ASIC in bus listing");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const LSPCI_BCM: &str = "\
00:00.0 Host bridge [0600]: Intel Corporation Atom Processor S1200 Internal [8086:0c00] (rev 02)
00:01.0 PCI bridge [0604]: Intel Corporation Atom Processor S1200 PCI Express Root Port 1 [8086:0c01] (rev 02)
01:00.0 Ethernet controller [0200]: Broadcom Corporation BCM56846 Trident+ [14e4:b846] (rev 02)
";

    #[test]
    fn test_broadcom_listing() {
        let resolver = discover_from_listing(LSPCI_BCM, &PlatformPaths::default()).unwrap();
        assert_eq!(resolver.vendor(), "broadcom");
    }

    #[test]
    fn test_network_controller_matches() {
        let listing = "03:00.0 Network controller [0280]: BROADCOM Inc. and subsidiaries BCM56850\n";
        assert!(discover_from_listing(listing, &PlatformPaths::default()).is_some());
    }

    #[test]
    fn test_no_vendor() {
        let listing = "\
00:1f.6 Ethernet controller [0200]: Intel Corporation Ethernet Connection I219-LM [8086:15b7]
04:00.0 SATA controller [0106]: Broadcom / LSI SAS2308 [1000:0087]
05:00.0 Broadcom BCM5720 Ethernet controller
";
        assert!(discover_from_listing(listing, &PlatformPaths::default()).is_none());
        assert!(discover_from_listing("", &PlatformPaths::default()).is_none());
    }
}
