//! Bridges and bridge members.

use super::Iface;
use crate::asic::natural_cmp;
use crate::mstpd::{showall, StpBridge, StpPort};
use once_cell::unsync::OnceCell;

/// Spanning tree implementation running on a bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeStp {
    Disabled,
    /// In-kernel STP (`stp_state` 1).
    Kernel,
    /// Userspace mstpd (`stp_state` 2).
    Mstpd(StpBridge),
}

#[derive(Debug)]
pub struct Bridge {
    iface: Iface,
    members: OnceCell<Vec<String>>,
    stp: OnceCell<BridgeStp>,
}

impl Bridge {
    pub fn new(iface: Iface) -> Self {
        Self {
            iface,
            members: OnceCell::new(),
            stp: OnceCell::new(),
        }
    }

    pub fn iface(&self) -> &Iface {
        &self.iface
    }

    /// Enslaved ports with VLAN sub-interface suffixes removed
    /// (`swp10.22` counts as `swp10`).
    pub fn members(&self) -> &[String] {
        self.members.get_or_init(|| {
            let ports = self
                .iface
                .host()
                .attrs
                .list(self.iface.name(), "brif")
                .unwrap_or_default();
            let mut members: Vec<String> = ports
                .iter()
                .map(|p| p.split('.').next().unwrap_or(p).to_string())
                .collect();
            members.sort_by(|a, b| natural_cmp(a, b));
            members.dedup();
            members
        })
    }

    /// Enslaved ports exactly as the kernel names them.
    pub fn tagged_members(&self) -> Vec<String> {
        let mut ports = self
            .iface
            .host()
            .attrs
            .list(self.iface.name(), "brif")
            .unwrap_or_default();
        ports.retain(|p| p.contains('.'));
        ports.sort_by(|a, b| natural_cmp(a, b));
        ports
    }

    /// 1 when the bridge filters on VLANs, 0 otherwise or when unknown.
    pub fn vlan_filtering(&self) -> u8 {
        self.iface
            .read("bridge/vlan_filtering")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    pub fn stp_state(&self) -> u8 {
        self.iface
            .read("bridge/stp_state")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    pub fn stp(&self) -> &BridgeStp {
        self.stp.get_or_init(|| match self.stp_state() {
            1 => BridgeStp::Kernel,
            2 => {
                let mut bridges = showall(self.iface.host());
                BridgeStp::Mstpd(bridges.remove(self.iface.name()).unwrap_or_default())
            }
            _ => BridgeStp::Disabled,
        })
    }
}

#[derive(Debug)]
pub struct BridgeMember {
    iface: Iface,
    bridge: OnceCell<Option<String>>,
    stp_port: OnceCell<Option<StpPort>>,
}

impl BridgeMember {
    pub fn new(iface: Iface) -> Self {
        Self {
            iface,
            bridge: OnceCell::new(),
            stp_port: OnceCell::new(),
        }
    }

    pub fn iface(&self) -> &Iface {
        &self.iface
    }

    /// Name of the owning bridge.
    pub fn bridge(&self) -> Option<&str> {
        self.bridge
            .get_or_init(|| {
                let attrs = &self.iface.host().attrs;
                attrs
                    .link_name(self.iface.name(), "brport/bridge")
                    .or_else(|| attrs.link_name(self.iface.name(), "master"))
            })
            .as_deref()
    }

    /// VLANs set in the `brport/<attr>` bitmap, e.g. `vlans` or
    /// `untagged_vlans`.
    pub fn vlan_list(&self, attr: &str) -> Vec<u16> {
        self.iface
            .host()
            .attrs
            .read_lines(self.iface.name(), &format!("brport/{}", attr))
            .map(|lines| decode_vlan_bitmap(&lines))
            .unwrap_or_default()
    }

    /// This port's record in the owning bridge's mstpd state.
    pub fn stp_port(&self) -> Option<&StpPort> {
        self.stp_port
            .get_or_init(|| {
                let bridge = self.bridge()?;
                let name = self.iface.name().split('.').next().unwrap_or(self.iface.name());
                let mut bridges = showall(self.iface.host());
                bridges.remove(bridge)?.port(name).cloned()
            })
            .as_ref()
    }
}

/// Decodes a VLAN bitmap: one 32-bit hex word per line, word `i` bit `b`
/// meaning VLAN `32 * i + b`. Unparseable words count as empty.
pub fn decode_vlan_bitmap<S: AsRef<str>>(lines: &[S]) -> Vec<u16> {
    let mut vlans = Vec::new();
    for (word_idx, line) in lines.iter().enumerate() {
        let word = line.as_ref().trim();
        let Ok(bits) = u32::from_str_radix(word.trim_start_matches("0x"), 16) else {
            continue;
        };
        for bit in 0..32u32 {
            if bits & (1 << bit) != 0 {
                if let Ok(vlan) = u16::try_from(word_idx as u32 * 32 + bit) {
                    vlans.push(vlan);
                }
            }
        }
    }
    vlans
}
