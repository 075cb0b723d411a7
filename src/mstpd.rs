//! Spanning tree state reported by `mstpctl showall`.
//!
//! The output is a sequence of blocks. A block header is either
//! `<bridge> CIST info` or `<bridge>:<port> CIST info`, followed by indented
//! lines holding one or two fixed-width `key   value` pairs:
//!
//! ```text
//! br0 CIST info
//!   enabled         yes
//!   bridge id       8.000.44:38:39:00:12:9B
//! br0:swp3 CIST info
//!   enabled            yes                     role                 Designated
//!   port id            8.001                   state                forwarding
//! ```
//!
//! Keys are normalized to snake case (`port id` -> `port_id`).

use crate::exec::run_or_empty;
use crate::host::Host;
use ahash::AHashMap as HashMap;
use once_cell::sync::Lazy;
use regex::Regex;

static BLOCK_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S+?)(?::(\S+))?\s+CIST info\s*$").expect("valid mstpctl header pattern")
});

/// Column where the second key starts on two-pair lines.
const BRIDGE_SECOND_COLUMN: usize = 27;
const PORT_SECOND_COLUMN: usize = 45;

/// Key/value record of one STP port.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StpPort {
    fields: HashMap<String, String>,
}

impl StpPort {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn port_id(&self) -> Option<&str> {
        self.get("port_id")
    }

    pub fn role(&self) -> Option<&str> {
        self.get("role")
    }

    pub fn state(&self) -> Option<&str> {
        self.get("state")
    }
}

/// STP state of one bridge and its ports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StpBridge {
    fields: HashMap<String, String>,
    ports: HashMap<String, StpPort>,
}

impl StpBridge {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn bridge_id(&self) -> Option<&str> {
        self.get("bridge_id")
    }

    pub fn designated_root(&self) -> Option<&str> {
        self.get("designated_root")
    }

    /// True when this bridge is the designated root.
    pub fn is_root(&self) -> bool {
        match (self.bridge_id(), self.designated_root()) {
            (Some(id), Some(root)) => id.eq_ignore_ascii_case(root),
            _ => false,
        }
    }

    pub fn root_priority(&self) -> Option<u32> {
        self.designated_root().and_then(priority_from_id)
    }

    pub fn bridge_priority(&self) -> Option<u32> {
        self.bridge_id().and_then(priority_from_id)
    }

    /// Per-port records keyed by port name.
    pub fn member_state(&self) -> &HashMap<String, StpPort> {
        &self.ports
    }

    pub fn port(&self, name: &str) -> Option<&StpPort> {
        self.ports.get(name)
    }
}

/// Bridge ids look like `8.000.44:38:39:00:12:9B`; the leading hex digit is
/// the priority in units of 4096.
pub fn priority_from_id(id: &str) -> Option<u32> {
    let (prio, _) = id.split_once('.')?;
    u32::from_str_radix(prio, 16).ok().map(|p| p * 4096)
}

fn normalize_key(key: &str) -> String {
    key.trim()
        .to_ascii_lowercase()
        .replace([' ', '-'], "_")
}

/// mstpctl pads keys and values to fixed widths, but long values can run
/// into the next key with a single space, so lines are split at the known
/// column rather than on runs of spaces.
fn split_columns(line: &str, at: usize) -> [&str; 2] {
    let bytes = line.as_bytes();
    if line.len() > at && line.is_char_boundary(at) && bytes[at - 1] == b' ' && bytes[at] != b' ' {
        let (left, right) = line.split_at(at);
        [left, right]
    } else {
        [line, ""]
    }
}

fn parse_pairs(line: &str, second_column: usize, into: &mut HashMap<String, String>) {
    for part in split_columns(line, second_column) {
        // values never contain spaces; keys may
        if let Some((key, value)) = part.trim().rsplit_once(char::is_whitespace) {
            into.insert(normalize_key(key), value.to_string());
        }
    }
}

/// Parses the full `mstpctl showall` output, keyed by bridge name.
pub fn parse_showall(text: &str) -> HashMap<String, StpBridge> {
    enum Target {
        None,
        Bridge(String),
        Port(String, String),
    }

    let mut bridges: HashMap<String, StpBridge> = HashMap::new();
    let mut target = Target::None;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(caps) = BLOCK_HEADER.captures(line) {
            let bridge = caps[1].to_string();
            bridges.entry(bridge.clone()).or_default();
            target = match caps.get(2) {
                Some(port) => Target::Port(bridge, port.as_str().to_string()),
                None => Target::Bridge(bridge),
            };
            continue;
        }
        if !line.starts_with(char::is_whitespace) {
            target = Target::None;
            continue;
        }
        match &target {
            Target::Bridge(bridge) => {
                if let Some(b) = bridges.get_mut(bridge) {
                    parse_pairs(line, BRIDGE_SECOND_COLUMN, &mut b.fields);
                }
            }
            Target::Port(bridge, port) => {
                if let Some(b) = bridges.get_mut(bridge) {
                    let entry = b.ports.entry(port.clone()).or_default();
                    parse_pairs(line, PORT_SECOND_COLUMN, &mut entry.fields);
                }
            }
            Target::None => {}
        }
    }

    bridges
}

/// Runs `mstpctl showall`; an unavailable daemon yields an empty map.
pub fn showall(host: &Host) -> HashMap<String, StpBridge> {
    parse_showall(&run_or_empty(
        host.runner.as_ref(),
        &host.tools.mstpctl,
        &["showall"],
    ))
}
