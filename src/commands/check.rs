//! Check command implementation.
//!
//! Reports which data sources are available. Missing sources are not
//! errors: queries still run and leave the affected fields blank.

use nix::unistd::geteuid;
use std::path::Path;

use netshow::asic::discover_asic;
use netshow::config::{validate_effective_config, Config};
use netshow::Host;

pub fn command_check(host: &Host, config: &Config) -> anyhow::Result<()> {
    println!("🔍 netshow - Data Source Check");
    println!("==============================");

    let mut all_ok = true;

    println!("\n👤 Privileges...");
    if geteuid().is_root() {
        println!("   ✅ Running as root");
    } else {
        println!("   ⚠️  Not running as root - ethtool and mstpctl output may be incomplete");
    }

    println!("\n📁 Kernel interface tree...");
    let root = config.sysfs_root();
    let names = host.attrs.interfaces();
    if names.is_empty() {
        println!("   ❌ No interfaces found under {}", root.display());
        all_ok = false;
    } else {
        let ports = names.iter().filter(|n| netshow::iface::is_phy_name(n)).count();
        println!(
            "   ✅ {} interfaces under {} ({} switch ports)",
            names.len(),
            root.display(),
            ports
        );
    }

    println!("\n🔌 Switching ASIC...");
    match discover_asic(host) {
        Some(resolver) => println!("   ✅ {} ASIC detected", resolver.vendor()),
        None => println!("   ⚠️  No supported ASIC detected (or lspci unavailable)"),
    }
    report_file("Port table", &host.paths.porttab);
    report_file("Speed config", &host.paths.bcm_config);

    println!("\n🧰 Diagnostic tools...");
    for (tool, args) in [
        (&host.tools.ethtool, vec!["--version"]),
        (&host.tools.mstpctl, vec!["showall"]),
    ] {
        match host.runner.run(tool, &args) {
            Ok(_) => println!("   ✅ {} available", tool),
            Err(e) => println!("   ⚠️  {}: {}", tool, e),
        }
    }

    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => println!("   ✅ Configuration is valid"),
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ Ready");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        std::process::exit(1);
    }
}

fn report_file(label: &str, path: &Path) {
    if path.exists() {
        println!("   ✅ {}: {}", label, path.display());
    } else {
        println!("   ⚠️  {} not found: {}", label, path.display());
    }
}
