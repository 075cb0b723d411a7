//! Counters command implementation.

use netshow::asic::natural_cmp;
use netshow::counters::counters_cacheinfo;
use netshow::Host;

use super::blank;

/// Prints rx/tx totals and errors per switch port.
pub fn command_counters(host: &Host, name: Option<String>) -> anyhow::Result<()> {
    let counters = counters_cacheinfo(host, name.as_deref());

    let mut names: Vec<&String> = counters.keys().collect();
    names.sort_by(|a, b| natural_cmp(a, b));

    println!(
        "{:<12} {:>14} {:>14} {:>10}",
        "NAME", "RX PKTS", "TX PKTS", "ERRORS"
    );
    println!("{}", "─".repeat(53));

    for name in names {
        let c = &counters[name];
        println!(
            "{:<12} {:>14} {:>14} {:>10}",
            name,
            blank(c.total_rx()),
            blank(c.total_tx()),
            blank(c.total_err())
        );
    }

    Ok(())
}
