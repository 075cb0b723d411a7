//! ASIC command implementation.
//!
//! Shows the detected switching ASIC and its kernel port mapping.

use netshow::asic::discover_asic;
use netshow::Host;

use super::blank;

pub fn command_asic(host: &Host) -> anyhow::Result<()> {
    let Some(resolver) = discover_asic(host) else {
        println!("No supported switching ASIC detected");
        return Ok(());
    };

    let cache = resolver.build_mapping();
    println!("🔌 Switching ASIC: {}", resolver.vendor());
    println!("   Port table:   {}", host.paths.porttab.display());
    println!("   Speed config: {}", host.paths.bcm_config.display());
    println!();

    if cache.is_empty() {
        println!("No kernel ports mapped");
        return Ok(());
    }

    println!("{:<12} {:<12} {:>14}", "KERNEL", "ASIC", "INITIAL SPEED");
    println!("{}", "─".repeat(40));
    for (kernel_name, port) in cache.kernel_ports() {
        println!(
            "{:<12} {:<12} {:>14}",
            kernel_name,
            port.asic_name,
            blank(port.initial_speed.as_deref())
        );
    }
    println!("\n📋 Total: {} ports", cache.len());

    Ok(())
}
