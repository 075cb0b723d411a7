//! Interface classification and per-interface attributes.
//!
//! This module provides:
//! - `Iface`: the generic interface with lazily resolved, memoized attributes
//! - `bridge`: bridges and bridge members
//! - `bond`: bonds and bond members
//! - [`classify`]: picks exactly one specialization per interface name

pub mod bond;
pub mod bridge;

use crate::asic::{asic_cacheinfo, AsicCache, BroadcomAsic};
use crate::cache::SessionCache;
use crate::counters::{interface_counters, Counters};
use crate::host::Host;
use once_cell::sync::Lazy;
use once_cell::unsync::OnceCell;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub use bond::{Bond, BondMember};
pub use bridge::{Bridge, BridgeMember, BridgeStp};

static PHY_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^swp\d+(s\d+)?$").expect("valid port name pattern"));

/// `IFF_UP` in the kernel interface flags.
const IFF_UP: u32 = 0x1;

/// Whether `name` is a front-panel switch port (`swp1`, `swp2s0`).
pub fn is_phy_name(name: &str) -> bool {
    PHY_NAME.is_match(name)
}

/// Set of roles an interface plays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PortType(u32);

impl PortType {
    pub const PHY: PortType = PortType(1 << 0);
    pub const BRIDGE: PortType = PortType(1 << 1);
    pub const BRIDGE_MEMBER: PortType = PortType(1 << 2);
    pub const BOND: PortType = PortType(1 << 3);
    pub const BOND_MEMBER: PortType = PortType(1 << 4);
    pub const LOOPBACK: PortType = PortType(1 << 5);
    pub const SUBINT: PortType = PortType(1 << 6);

    const NAMES: [(PortType, &'static str); 7] = [
        (Self::PHY, "phy"),
        (Self::BRIDGE, "bridge"),
        (Self::BRIDGE_MEMBER, "bridge_member"),
        (Self::BOND, "bond"),
        (Self::BOND_MEMBER, "bond_member"),
        (Self::LOOPBACK, "loopback"),
        (Self::SUBINT, "subint"),
    ];

    pub fn empty() -> Self {
        PortType(0)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: PortType) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: PortType) {
        self.0 |= other.0;
    }

    pub fn set(&mut self, other: PortType, value: bool) {
        if value {
            self.0 |= other.0;
        } else {
            self.0 &= !other.0;
        }
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if names.is_empty() {
            write!(f, "-")
        } else {
            write!(f, "{}", names.join(","))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Up,
    Down,
    AdminDown,
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkState::Up => write!(f, "UP"),
            LinkState::Down => write!(f, "DN"),
            LinkState::AdminDown => write!(f, "ADMDN"),
        }
    }
}

/// A kernel network interface.
///
/// Attributes are read on first access and kept for the object's lifetime.
/// Objects are cheap to build and meant for a single query.
pub struct Iface {
    name: String,
    host: Host,
    cache: Option<Arc<SessionCache>>,
    is_phy: OnceCell<bool>,
    port_type: OnceCell<PortType>,
    link_state: OnceCell<LinkState>,
    live_speed: OnceCell<Option<u64>>,
    speed: OnceCell<Option<u64>>,
    asic: OnceCell<Arc<AsicCache>>,
    counters: OnceCell<Counters>,
}

impl fmt::Debug for Iface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iface").field("name", &self.name).finish()
    }
}

impl Iface {
    pub fn new(name: &str, host: &Host, cache: Option<Arc<SessionCache>>) -> Self {
        Self {
            name: name.to_string(),
            host: host.clone(),
            cache,
            is_phy: OnceCell::new(),
            port_type: OnceCell::new(),
            link_state: OnceCell::new(),
            live_speed: OnceCell::new(),
            speed: OnceCell::new(),
            asic: OnceCell::new(),
            counters: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub(crate) fn read(&self, attr: &str) -> Option<String> {
        self.host.attrs.read(&self.name, attr)
    }

    pub(crate) fn has(&self, attr: &str) -> bool {
        self.host.attrs.exists(&self.name, attr)
    }

    pub fn exists(&self) -> bool {
        self.has("")
    }

    pub fn is_phy(&self) -> bool {
        *self.is_phy.get_or_init(|| is_phy_name(&self.name))
    }

    pub fn is_loopback(&self) -> bool {
        self.name == "lo"
    }

    pub fn is_subint(&self) -> bool {
        self.name.contains('.')
    }

    pub fn is_bridge(&self) -> bool {
        self.has("bridge")
    }

    pub fn is_bridge_member(&self) -> bool {
        self.has("brport")
    }

    pub fn is_bond(&self) -> bool {
        self.has("bonding")
    }

    pub fn is_bond_member(&self) -> bool {
        if self.has("bonding_slave") {
            return true;
        }
        match self.host.attrs.link_name(&self.name, "master") {
            Some(master) => self.host.attrs.exists(&master, "bonding"),
            None => false,
        }
    }

    pub fn port_type(&self) -> PortType {
        *self.port_type.get_or_init(|| {
            let mut pt = PortType::empty();
            pt.set(PortType::PHY, self.is_phy());
            pt.set(PortType::LOOPBACK, self.is_loopback());
            pt.set(PortType::SUBINT, self.is_subint());
            pt.set(PortType::BRIDGE, self.is_bridge());
            pt.set(PortType::BRIDGE_MEMBER, self.is_bridge_member());
            pt.set(PortType::BOND, self.is_bond());
            pt.set(PortType::BOND_MEMBER, self.is_bond_member());
            pt
        })
    }

    pub fn link_state(&self) -> LinkState {
        *self.link_state.get_or_init(|| {
            let flags = self
                .read("flags")
                .and_then(|f| u32::from_str_radix(f.trim_start_matches("0x"), 16).ok());
            if let Some(flags) = flags {
                if flags & IFF_UP == 0 {
                    return LinkState::AdminDown;
                }
            }
            match self.read("operstate").as_deref() {
                Some("up") => LinkState::Up,
                // loopback and many virtual devices never report an oper state
                Some("unknown") if flags.is_some() => LinkState::Up,
                _ => LinkState::Down,
            }
        })
    }

    /// Kernel reported speed in Mb/s. Down links report nothing usable.
    pub fn live_speed(&self) -> Option<u64> {
        *self.live_speed.get_or_init(|| {
            self.read("speed")
                .and_then(|s| s.parse::<i64>().ok())
                .filter(|s| *s > 0)
                .map(|s| s as u64)
        })
    }

    /// Port speed in Mb/s.
    ///
    /// Switch ports whose link is not up fall back to the boot-time speed
    /// from the ASIC configuration, since the kernel reports nothing useful
    /// for them. An up link always reports the live value.
    pub fn speed(&self) -> Option<u64> {
        *self.speed.get_or_init(|| {
            if !self.is_phy() {
                return self.live_speed();
            }
            match self.link_state() {
                LinkState::Up => self.live_speed(),
                LinkState::Down => self.live_speed().or_else(|| self.initial_speed()),
                LinkState::AdminDown => self.initial_speed(),
            }
        })
    }

    fn asic(&self) -> &AsicCache {
        self.asic.get_or_init(|| match &self.cache {
            Some(cache) => Arc::clone(&cache.asic),
            None => Arc::new(asic_cacheinfo(&self.host)),
        })
    }

    /// Boot-time speed in Mb/s from the ASIC mapping. Switch ports only.
    pub fn initial_speed(&self) -> Option<u64> {
        if !self.is_phy() {
            return None;
        }
        let raw = self.asic().initial_speed(&self.name)?;
        match raw.parse::<u64>() {
            Ok(speed) => Some(speed),
            Err(_) => {
                debug!("{}: unusable initial speed '{}'", self.name, raw);
                None
            }
        }
    }

    /// ASIC port name (`xe0.0`). Switch ports only.
    pub fn asic_port_name(&self) -> Option<String> {
        if !self.is_phy() {
            return None;
        }
        match &self.cache {
            Some(cache) => cache
                .asic
                .kernel_port(&self.name)
                .map(|p| p.asic_name.clone()),
            None => BroadcomAsic::from_paths(&self.host.paths).lookup_port_name(&self.name),
        }
    }

    pub fn mtu(&self) -> Option<u32> {
        self.read("mtu").and_then(|s| s.parse().ok())
    }

    pub fn description(&self) -> Option<String> {
        self.read("ifalias").filter(|s| !s.is_empty())
    }

    /// Hardware counters, from the session cache when it has them.
    pub fn counters(&self) -> Counters {
        *self.counters.get_or_init(|| {
            if let Some(c) = self.cache.as_ref().and_then(|c| c.counters.get(&self.name)) {
                return *c;
            }
            if self.is_phy() {
                interface_counters(&self.host, &self.name)
            } else {
                Counters::default()
            }
        })
    }
}

/// Role picked by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    Bridge,
    BridgeMember,
    Bond,
    BondMember,
    Generic,
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InterfaceKind::Bridge => "bridge",
            InterfaceKind::BridgeMember => "bridge_member",
            InterfaceKind::Bond => "bond",
            InterfaceKind::BondMember => "bond_member",
            InterfaceKind::Generic => "interface",
        };
        write!(f, "{}", s)
    }
}

/// A classified interface.
#[derive(Debug)]
pub enum Interface {
    Bridge(Bridge),
    BridgeMember(BridgeMember),
    Bond(Bond),
    BondMember(BondMember),
    Generic(Iface),
}

impl Interface {
    pub fn kind(&self) -> InterfaceKind {
        match self {
            Interface::Bridge(_) => InterfaceKind::Bridge,
            Interface::BridgeMember(_) => InterfaceKind::BridgeMember,
            Interface::Bond(_) => InterfaceKind::Bond,
            Interface::BondMember(_) => InterfaceKind::BondMember,
            Interface::Generic(_) => InterfaceKind::Generic,
        }
    }

    pub fn iface(&self) -> &Iface {
        match self {
            Interface::Bridge(b) => b.iface(),
            Interface::BridgeMember(m) => m.iface(),
            Interface::Bond(b) => b.iface(),
            Interface::BondMember(m) => m.iface(),
            Interface::Generic(i) => i,
        }
    }
}

/// Picks the specialization for `name`.
///
/// Checked in order, first match wins: bridge, bridge member, bond, bond
/// member, generic. Without a session cache, ASIC data is discovered on
/// demand by the returned object.
pub fn classify(name: &str, host: &Host, cache: Option<Arc<SessionCache>>) -> Interface {
    let probe = Iface::new(name, host, cache);

    if probe.is_bridge() {
        Interface::Bridge(Bridge::new(probe))
    } else if probe.is_bridge_member() {
        Interface::BridgeMember(BridgeMember::new(probe))
    } else if probe.is_bond() {
        Interface::Bond(Bond::new(probe))
    } else if probe.is_bond_member() {
        Interface::BondMember(BondMember::new(probe))
    } else {
        Interface::Generic(probe)
    }
}

/// Classifies every interface the kernel knows about. Loopback and
/// sub-interfaces are skipped unless `include_all` is set.
pub fn classify_all(host: &Host, cache: Arc<SessionCache>, include_all: bool) -> Vec<Interface> {
    let mut names = host.attrs.interfaces();
    names.sort_by(|a, b| crate::asic::natural_cmp(a, b));

    names
        .iter()
        .filter(|n| include_all || (n.as_str() != "lo" && !n.contains('.')))
        .map(|n| classify(n, host, Some(Arc::clone(&cache))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phy_names() {
        assert!(is_phy_name("swp1"));
        assert!(is_phy_name("swp2s0"));
        assert!(is_phy_name("swp49s3"));
        assert!(!is_phy_name("swp1.100"));
        assert!(!is_phy_name("swp2s0.10"));
        assert!(!is_phy_name("bond0"));
        assert!(!is_phy_name("eth0"));
        assert!(!is_phy_name("swp"));
        assert!(!is_phy_name("xswp1"));
    }

    #[test]
    fn test_port_type_bits() {
        let mut pt = PortType::empty();
        assert!(!pt.contains(PortType::PHY));
        pt.insert(PortType::PHY);
        pt.insert(PortType::BRIDGE_MEMBER);
        assert!(pt.contains(PortType::PHY));
        assert!(pt.contains(PortType::BRIDGE_MEMBER));
        assert!(!pt.contains(PortType::BOND));
        assert_eq!(pt.to_string(), "phy,bridge_member");

        pt.set(PortType::PHY, false);
        assert_eq!(pt.bits(), PortType::BRIDGE_MEMBER.bits());
        assert_eq!(PortType::empty().to_string(), "-");
    }

    #[test]
    fn test_link_state_display() {
        assert_eq!(LinkState::Up.to_string(), "UP");
        assert_eq!(LinkState::AdminDown.to_string(), "ADMDN");
    }
}
