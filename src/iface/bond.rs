//! Bonds and bond members.

use super::Iface;
use crate::asic::natural_cmp;
use once_cell::unsync::OnceCell;

#[derive(Debug)]
pub struct Bond {
    iface: Iface,
    members: OnceCell<Vec<String>>,
}

impl Bond {
    pub fn new(iface: Iface) -> Self {
        Self {
            iface,
            members: OnceCell::new(),
        }
    }

    pub fn iface(&self) -> &Iface {
        &self.iface
    }

    pub fn members(&self) -> &[String] {
        self.members.get_or_init(|| {
            let mut members: Vec<String> = self
                .iface
                .read("bonding/slaves")
                .map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default();
            members.sort_by(|a, b| natural_cmp(a, b));
            members
        })
    }

    /// Bonding mode name, e.g. `802.3ad` from `802.3ad 4`.
    pub fn mode(&self) -> Option<String> {
        first_token(self.iface.read("bonding/mode"))
    }

    pub fn min_links(&self) -> Option<u32> {
        self.iface
            .read("bonding/min_links")
            .and_then(|s| s.parse().ok())
    }

    /// LACP rate name, e.g. `fast` from `fast 1`.
    pub fn lacp_rate(&self) -> Option<String> {
        first_token(self.iface.read("bonding/lacp_rate"))
    }

    pub fn xmit_hash_policy(&self) -> Option<String> {
        first_token(self.iface.read("bonding/xmit_hash_policy"))
    }
}

#[derive(Debug)]
pub struct BondMember {
    iface: Iface,
    master: OnceCell<Option<String>>,
}

impl BondMember {
    pub fn new(iface: Iface) -> Self {
        Self {
            iface,
            master: OnceCell::new(),
        }
    }

    pub fn iface(&self) -> &Iface {
        &self.iface
    }

    /// Name of the owning bond.
    pub fn master(&self) -> Option<&str> {
        self.master
            .get_or_init(|| self.iface.host().attrs.link_name(self.iface.name(), "master"))
            .as_deref()
    }

    /// `active` or `backup`.
    pub fn bond_state(&self) -> Option<String> {
        self.iface.read("bonding_slave/state")
    }

    pub fn link_failures(&self) -> Option<u64> {
        self.iface
            .read("bonding_slave/link_failure_count")
            .and_then(|s| s.parse().ok())
    }
}

fn first_token(value: Option<String>) -> Option<String> {
    value.and_then(|v| v.split_whitespace().next().map(str::to_string))
}
