//! STP command implementation.

use anyhow::bail;
use netshow::asic::natural_cmp;
use netshow::iface::{Bridge, BridgeStp};
use netshow::mstpd::StpBridge;
use netshow::{classify, Host, Interface};

use super::blank;

/// Prints spanning tree details of one bridge.
pub fn command_stp(host: &Host, bridge: &str) -> anyhow::Result<()> {
    let Interface::Bridge(br) = classify(bridge, host, None) else {
        bail!("'{}' is not a bridge", bridge);
    };

    match br.stp() {
        BridgeStp::Disabled => println!("{}: spanning tree disabled", bridge),
        BridgeStp::Kernel => println!("{}: kernel spanning tree", bridge),
        BridgeStp::Mstpd(stp) => {
            println!("{}: mstpd", bridge);
            println!("   Root bridge:     {}", if stp.is_root() { "yes" } else { "no" });
            println!("   Root priority:   {}", blank(stp.root_priority()));
            println!("   Bridge priority: {}", blank(stp.bridge_priority()));
            print_ports(&br, stp);
        }
    }

    Ok(())
}

fn print_ports(br: &Bridge, stp: &StpBridge) {
    let mut ports: Vec<&String> = stp.member_state().keys().collect();
    ports.sort_by(|a, b| natural_cmp(a, b));

    println!();
    println!("{:<12} {:<8} {:<12} {:<12}", "PORT", "ID", "ROLE", "STATE");
    println!("{}", "─".repeat(46));
    for name in ports {
        let port = &stp.member_state()[name];
        println!(
            "{:<12} {:<8} {:<12} {:<12}",
            name,
            blank(port.port_id()),
            blank(port.role()),
            blank(port.state())
        );
    }

    let missing: Vec<&String> = br
        .members()
        .iter()
        .filter(|m| !stp.member_state().contains_key(m.as_str()))
        .collect();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|s| s.as_str()).collect();
        println!("\n⚠️  Members without STP state: {}", names.join(", "));
    }
}
