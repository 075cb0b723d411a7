//! Netshow Switch Inspection Library
//!
//! Read-only queries over the state of a Linux network switch: interface
//! roles, bridge and bond membership, ASIC port names and boot-time speeds,
//! spanning tree state and hardware counters. Data comes from the kernel
//! interface tree, vendor configuration files and diagnostic commands, all
//! of which are optional.
//!
//! # Usage
//!
//! ```rust,no_run
//! use netshow::{classify, Config, Host, Interface, SessionCache};
//! use std::sync::Arc;
//!
//! let host = Host::from_config(&Config::default());
//!
//! // Discover the ASIC once and share the result between queries
//! let cache = Arc::new(SessionCache::build(&host));
//!
//! match classify("swp1", &host, Some(Arc::clone(&cache))) {
//!     Interface::BridgeMember(m) => println!("member of {:?}", m.bridge()),
//!     other => println!("{} speed {:?}", other.kind(), other.iface().speed()),
//! }
//! ```

pub mod asic;
pub mod cache;
pub mod cli;
pub mod config;
pub mod counters;
pub mod exec;
pub mod host;
pub mod iface;
pub mod mstpd;
pub mod sysfs;

// Re-export main types for convenience
pub use asic::{AsicCache, AsicResolver, BroadcomAsic, KernelPort, PlatformPaths};
pub use cache::SessionCache;
pub use config::Config;
pub use counters::{parse_counters, Counters, DirectionCounters};
pub use exec::{CommandRunner, ExecError, SystemRunner};
pub use host::{Host, Tools};
pub use iface::{classify, Iface, Interface, InterfaceKind, LinkState, PortType};
pub use sysfs::{AttributeSource, Sysfs};
