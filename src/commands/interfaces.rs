//! Interfaces command implementation.
//!
//! Classifies interfaces and prints one line per interface.

use std::sync::Arc;

use anyhow::bail;
use netshow::{classify, iface::classify_all, Host, Interface, SessionCache};
use tracing::debug;

use super::blank;

/// Prints interface roles, link state, speed and ASIC port.
pub fn command_interfaces(host: &Host, name: Option<String>, all: bool) -> anyhow::Result<()> {
    let cache = Arc::new(SessionCache::build(host));
    debug!(
        "ASIC mapping: vendor={:?} ports={}",
        cache.asic.vendor(),
        cache.asic.len()
    );

    let interfaces = match name {
        Some(name) => {
            if !host.attrs.exists(&name, "") {
                bail!("interface '{}' does not exist", name);
            }
            vec![classify(&name, host, Some(Arc::clone(&cache)))]
        }
        None => classify_all(host, Arc::clone(&cache), all),
    };

    println!(
        "{:<14} {:<14} {:<6} {:>7} {:>6} {:<10} {}",
        "NAME", "ROLE", "STATE", "SPEED", "MTU", "ASIC", "SUMMARY"
    );
    println!("{}", "─".repeat(72));

    for interface in &interfaces {
        let iface = interface.iface();
        println!(
            "{:<14} {:<14} {:<6} {:>7} {:>6} {:<10} {}",
            iface.name(),
            interface.kind(),
            iface.link_state(),
            blank(iface.speed().map(format_speed)),
            blank(iface.mtu()),
            blank(iface.asic_port_name()),
            summary(interface)
        );
    }

    Ok(())
}

/// `10000` -> `10G`, `100` -> `100M`.
fn format_speed(mbps: u64) -> String {
    if mbps >= 1000 && mbps % 1000 == 0 {
        format!("{}G", mbps / 1000)
    } else {
        format!("{}M", mbps)
    }
}

fn summary(interface: &Interface) -> String {
    match interface {
        Interface::Bridge(b) => {
            let mut s = format!("members: {}", b.members().join(","));
            if b.vlan_filtering() == 1 {
                s.push_str(" vlan-aware");
            }
            s
        }
        Interface::BridgeMember(m) => {
            let mut s = format!("bridge: {}", blank(m.bridge()));
            let untagged = m.vlan_list("untagged_vlans");
            if !untagged.is_empty() {
                let vlans: Vec<String> = untagged.iter().map(u16::to_string).collect();
                s.push_str(&format!(" untagged: {}", vlans.join(",")));
            }
            s
        }
        Interface::Bond(b) => format!(
            "mode: {} members: {}",
            blank(b.mode()),
            b.members().join(",")
        ),
        Interface::BondMember(m) => format!("master: {}", blank(m.master())),
        Interface::Generic(i) => blank(i.description()),
    }
}
