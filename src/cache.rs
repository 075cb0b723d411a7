//! Per-invocation cache shared by interface queries.
//!
//! This module provides the `SessionCache` structure, built once at the start
//! of a query session so that ASIC discovery and counter collection run a
//! single time no matter how many interfaces are inspected.

use crate::asic::{asic_cacheinfo, AsicCache};
use crate::counters::{counters_cacheinfo, Counters};
use crate::host::Host;
use ahash::AHashMap as HashMap;
use std::sync::Arc;
use tracing::debug;

/// Immutable snapshot of expensive-to-collect data.
#[derive(Debug, Clone, Default)]
pub struct SessionCache {
    pub asic: Arc<AsicCache>,
    pub counters: HashMap<String, Counters>,
}

impl SessionCache {
    /// Discovers the ASIC mapping. Counters are left empty.
    pub fn build(host: &Host) -> Self {
        Self {
            asic: Arc::new(asic_cacheinfo(host)),
            counters: HashMap::new(),
        }
    }

    /// Discovers the ASIC mapping and collects counters for every switch port.
    pub fn build_with_counters(host: &Host) -> Self {
        let mut cache = Self::build(host);
        cache.counters = counters_cacheinfo(host, None);
        debug!("collected counters for {} ports", cache.counters.len());
        cache
    }

    pub fn from_asic(asic: AsicCache) -> Self {
        Self {
            asic: Arc::new(asic),
            counters: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_cache_is_shareable_across_threads() {
        assert_send_sync::<SessionCache>();
        assert_send_sync::<AsicCache>();
    }

    #[test]
    fn test_shared_read_only_from_threads() {
        let mut asic = AsicCache::for_vendor("broadcom");
        asic.insert_port("swp1", "xe0.0".into());
        asic.set_initial_speed("xe0.0", "10000");
        let cache = Arc::new(SessionCache::from_asic(asic));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.asic.initial_speed("swp1").map(str::to_string))
            })
            .collect();

        for h in handles {
            assert_eq!(h.join().unwrap().as_deref(), Some("10000"));
        }
    }
}
