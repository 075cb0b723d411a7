mod common;

use common::{
    data_file, fixture_paths, missing_paths, FakeRunner, SysTree, LSPCI_BROADCOM, LSPCI_NO_ASIC,
};
use netshow::asic::{asic_cacheinfo, discover_asic};
use netshow::{AsicResolver, BroadcomAsic, PlatformPaths};
use std::fs;
use tempfile::TempDir;

fn fixture_resolver() -> BroadcomAsic {
    BroadcomAsic::from_paths(&fixture_paths())
}

#[test]
fn test_mapping_from_fixture_files() {
    let cache = fixture_resolver().build_mapping();

    assert_eq!(cache.vendor(), Some("broadcom"));
    assert_eq!(cache.len(), 5);

    let names: Vec<&str> = cache.kernel_ports().iter().map(|(k, _)| *k).collect();
    assert_eq!(names, vec!["swp1", "swp2", "swp3", "swp49s0", "swp49s1"]);

    assert_eq!(cache.kernel_port("swp1").unwrap().asic_name, "xe0.0");
    assert_eq!(cache.kernel_port("swp49s1").unwrap().asic_name, "xe48.1");
    assert!(cache.kernel_port("swp50").is_none());
}

#[test]
fn test_mapping_is_bidirectional() {
    let cache = fixture_resolver().build_mapping();

    for (kernel_name, port) in cache.kernel_ports() {
        assert_eq!(cache.kernel_name(&port.asic_name), Some(kernel_name));
    }
}

#[test]
fn test_initial_speeds_attached() {
    let cache = fixture_resolver().build_mapping();

    assert_eq!(cache.initial_speed("swp1"), Some("10000"));
    // spaces around '='
    assert_eq!(cache.initial_speed("swp2"), Some("1000"));
    // malformed entry for xe2
    assert_eq!(cache.initial_speed("swp3"), None);
    // bare chip name means SDK index 0
    assert_eq!(cache.initial_speed("swp49s0"), Some("40000"));
    assert_eq!(cache.initial_speed("swp49s1"), Some("10000"));

    // entries for unknown ASIC ports are dropped
    assert!(cache.kernel_name("xe99.0").is_none());
}

#[test]
fn test_missing_porttab_gives_empty_mapping() {
    let resolver = BroadcomAsic::new("/nonexistent/netshow/porttab", data_file("config.bcm"));
    let cache = resolver.build_mapping();

    assert!(cache.is_empty());
    assert_eq!(cache.vendor(), Some("broadcom"));
}

#[test]
fn test_missing_speed_file_keeps_port_names() {
    let resolver = BroadcomAsic::new(data_file("porttab"), "/nonexistent/netshow/config.bcm");
    let cache = resolver.build_mapping();

    assert_eq!(cache.len(), 5);
    assert_eq!(cache.kernel_port("swp2").unwrap().asic_name, "xe1.0");
    assert!(cache
        .kernel_ports()
        .iter()
        .all(|(_, p)| p.initial_speed.is_none()));
}

#[test]
fn test_scoped_lookups_agree_with_full_mapping() {
    let resolver = fixture_resolver();
    let cache = resolver.build_mapping();

    for name in ["swp1", "swp2", "swp3", "swp49s0", "swp49s1", "swp50", "swp7"] {
        assert_eq!(
            resolver.lookup_port_name(name),
            cache.kernel_port(name).map(|p| p.asic_name.clone()),
            "port name of {}",
            name
        );
        assert_eq!(
            resolver.lookup_initial_speed(name).as_deref(),
            cache.initial_speed(name),
            "initial speed of {}",
            name
        );
    }
}

#[test]
fn test_reused_asic_port_speed_goes_to_last_owner() {
    let dir = TempDir::new().unwrap();
    let porttab = dir.path().join("porttab");
    let bcm = dir.path().join("config.bcm");
    fs::write(&porttab, "swp1 xe0 0\nswp2 xe0 0\n").unwrap();
    fs::write(&bcm, "port_init_speed_xe0=25000\n").unwrap();

    let resolver = BroadcomAsic::new(&porttab, &bcm);
    let cache = resolver.build_mapping();

    assert_eq!(cache.kernel_name("xe0.0"), Some("swp2"));
    assert_eq!(cache.kernel_port("swp1").unwrap().asic_name, "xe0.0");
    assert_eq!(cache.initial_speed("swp1"), None);
    assert_eq!(cache.initial_speed("swp2"), Some("25000"));

    for name in ["swp1", "swp2"] {
        assert_eq!(
            resolver.lookup_port_name(name),
            cache.kernel_port(name).map(|p| p.asic_name.clone())
        );
        assert_eq!(
            resolver.lookup_initial_speed(name).as_deref(),
            cache.initial_speed(name)
        );
    }
}

#[test]
fn test_discovery_finds_broadcom() {
    let tree = SysTree::new();
    let host = tree.host(
        FakeRunner::default().with("lspci -nn", LSPCI_BROADCOM),
        fixture_paths(),
    );

    let resolver = discover_asic(&host).unwrap();
    assert_eq!(resolver.vendor(), "broadcom");

    let cache = asic_cacheinfo(&host);
    assert_eq!(cache.initial_speed("swp1"), Some("10000"));
}

#[test]
fn test_discovery_without_known_asic() {
    let tree = SysTree::new();
    let host = tree.host(
        FakeRunner::default().with("lspci -nn", LSPCI_NO_ASIC),
        fixture_paths(),
    );

    assert!(discover_asic(&host).is_none());
    let cache = asic_cacheinfo(&host);
    assert!(cache.is_empty());
    assert_eq!(cache.vendor(), None);
}

#[test]
fn test_discovery_when_lspci_fails() {
    let tree = SysTree::new();
    let host = tree.host(FakeRunner::default(), fixture_paths());

    assert!(discover_asic(&host).is_none());
    assert!(asic_cacheinfo(&host).is_empty());
}

#[test]
fn test_discovery_with_missing_vendor_files() {
    let tree = SysTree::new();
    let host = tree.host(
        FakeRunner::default().with("lspci -nn", LSPCI_BROADCOM),
        missing_paths(),
    );

    let cache = asic_cacheinfo(&host);
    assert!(cache.is_empty());
    assert_eq!(cache.vendor(), Some("broadcom"));
}

#[test]
fn test_default_paths() {
    let paths = PlatformPaths::default();
    assert_eq!(paths.porttab.to_str(), Some("/var/lib/cumulus/porttab"));
    assert_eq!(paths.bcm_config.to_str(), Some("/etc/bcm.d/config.bcm"));
}
