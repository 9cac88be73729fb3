//! Service instance caching
//!
//! Instances are listed once through `svcat` and then served from memory.
//! Entries never refresh on their own unless a TTL is configured; callers can
//! force a refresh with [`ServiceInstanceCache::invalidate`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::debug;

use kubebind_types::{Result, ServiceInstance};

use crate::gateway::CommandRunner;
use crate::svcat;

/// One successful listing
#[derive(Debug)]
struct CacheEntry {
    instances: Vec<ServiceInstance>,
    /// Instance name to index in `instances`
    by_name: HashMap<String, usize>,
    fetched_at: Instant,
}

impl CacheEntry {
    fn new(instances: Vec<ServiceInstance>) -> Self {
        let by_name = instances
            .iter()
            .enumerate()
            .map(|(i, instance)| (instance.name.clone(), i))
            .collect();

        Self {
            instances,
            by_name,
            fetched_at: Instant::now(),
        }
    }

    fn is_valid(&self, ttl: Option<Duration>) -> bool {
        // An empty listing is never served from cache
        if self.instances.is_empty() {
            return false;
        }
        match ttl {
            Some(ttl) => self.fetched_at.elapsed() < ttl,
            None => true,
        }
    }
}

/// Cache of service-catalog instances, shared between the registry and the explorer
#[derive(Debug, Default)]
pub struct ServiceInstanceCache {
    entry: RwLock<Option<CacheEntry>>,
    ttl: Option<Duration>,
}

impl ServiceInstanceCache {
    /// Create a cache; `None` keeps entries until invalidated
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl,
        }
    }

    /// List instances, calling `svcat` only when the cache is empty or expired
    pub async fn list<R: CommandRunner + ?Sized>(&self, runner: &R) -> Result<Vec<ServiceInstance>> {
        if let Some(instances) = self.cached() {
            debug!(count = instances.len(), "service instances served from cache");
            return Ok(instances);
        }

        let instances = svcat::get_instances(runner).await?;
        debug!(count = instances.len(), "service instances fetched");
        *self.entry.write() = Some(CacheEntry::new(instances.clone()));

        Ok(instances)
    }

    /// Cached instances if present and still valid
    pub fn cached(&self) -> Option<Vec<ServiceInstance>> {
        self.entry
            .read()
            .as_ref()
            .filter(|e| e.is_valid(self.ttl))
            .map(|e| e.instances.clone())
    }

    /// Cached instance names in listing order
    pub fn names(&self) -> Vec<String> {
        self.entry
            .read()
            .as_ref()
            .map(|e| e.instances.iter().map(|i| i.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Look up a cached instance by name
    pub fn get(&self, name: &str) -> Option<ServiceInstance> {
        let entry = self.entry.read();
        let entry = entry.as_ref()?;
        entry
            .by_name
            .get(name)
            .and_then(|&i| entry.instances.get(i))
            .cloned()
    }

    /// Drop the cached listing so the next `list` goes back to `svcat`
    pub fn invalidate(&self) {
        *self.entry.write() = None;
    }
}
