//! Hardware port counters from `ethtool -S`.
//!
//! Switch ports expose per-direction packet and error counters as
//! `HwIfInUcastPkts: 100` style lines. A direction with no such line is
//! reported as unknown (`None`), which is distinct from a known zero.

use crate::exec::run_or_empty;
use crate::host::Host;
use crate::iface::is_phy_name;
use ahash::AHashMap as HashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

static COUNTER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*hwif(in|out)(ucastpkts|mcastpkts|bcastpkts|errors)\s*:\s*(\d+)\s*$")
        .expect("valid counter pattern")
});

/// Counters for one direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirectionCounters {
    pub errors: u64,
    pub unicast: u64,
    pub multicast: u64,
    pub broadcast: u64,
}

impl DirectionCounters {
    /// Packet total, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.unicast
            .saturating_add(self.multicast)
            .saturating_add(self.broadcast)
    }
}

/// Counter snapshot for one interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub rx: Option<DirectionCounters>,
    pub tx: Option<DirectionCounters>,
}

impl Counters {
    pub fn total_rx(&self) -> Option<u64> {
        self.rx.map(|rx| rx.total())
    }

    pub fn total_tx(&self) -> Option<u64> {
        self.tx.map(|tx| tx.total())
    }

    /// Errors of whichever directions are known; `None` only if neither is.
    pub fn total_err(&self) -> Option<u64> {
        match (self.rx, self.tx) {
            (None, None) => None,
            (rx, tx) => {
                let rx_err = rx.map_or(0, |c| c.errors);
                Some(rx_err.saturating_add(tx.map_or(0, |c| c.errors)))
            }
        }
    }
}

/// Parses `ethtool -S` output.
pub fn parse_counters(raw: &str) -> Counters {
    let mut counters = Counters::default();

    for line in raw.lines() {
        let Some(caps) = COUNTER_LINE.captures(line) else {
            continue;
        };
        let Ok(value) = caps[3].parse::<u64>() else {
            debug!("counter value out of range: {}", line.trim());
            continue;
        };

        let side = if caps[1].eq_ignore_ascii_case("in") {
            counters.rx.get_or_insert_with(DirectionCounters::default)
        } else {
            counters.tx.get_or_insert_with(DirectionCounters::default)
        };

        match caps[2].to_ascii_lowercase().as_str() {
            "ucastpkts" => side.unicast = value,
            "mcastpkts" => side.multicast = value,
            "bcastpkts" => side.broadcast = value,
            _ => side.errors = value,
        }
    }

    counters
}

/// Raw `ethtool -S` output for one interface, empty if the tool fails.
pub fn ethtool_output(host: &Host, iface: &str) -> String {
    run_or_empty(host.runner.as_ref(), &host.tools.ethtool, &["-S", iface])
}

/// Counters for one interface.
pub fn interface_counters(host: &Host, iface: &str) -> Counters {
    parse_counters(&ethtool_output(host, iface))
}

/// Counters for `name`, or for every switch port when no name is given.
pub fn counters_cacheinfo(host: &Host, name: Option<&str>) -> HashMap<String, Counters> {
    let names: Vec<String> = match name {
        Some(n) => vec![n.to_string()],
        None => host
            .attrs
            .interfaces()
            .into_iter()
            .filter(|n| is_phy_name(n))
            .collect(),
    };

    names
        .into_iter()
        .map(|n| {
            let counters = interface_counters(host, &n);
            (n, counters)
        })
        .collect()
}
