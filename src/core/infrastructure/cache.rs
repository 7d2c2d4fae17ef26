use std::collections::HashMap;
use tracing::debug;

use crate::core::models::EntityKind;

/// In-memory map from a searched name to the canonical ID it resolved to.
///
/// Lives for one run. Entries are never replaced or evicted, so a name keeps
/// resolving to the same ID until the process exits. Numeric identifiers are
/// already canonical and never stored here.
#[derive(Debug)]
pub struct ResolutionCache {
    kind: EntityKind,
    entries: HashMap<String, u64>,
    lookups: u64,
    hits: u64,
}

#[derive(Debug, Clone)]
pub struct CacheStats {
    pub kind: EntityKind,
    pub total_entries: usize,
    pub lookups: u64,
    pub hits: u64,
    pub hit_rate_percent: f64,
}

impl ResolutionCache {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
            lookups: 0,
            hits: 0,
        }
    }

    pub fn get(&mut self, name: &str) -> Option<u64> {
        self.lookups += 1;
        match self.entries.get(name) {
            Some(&id) => {
                self.hits += 1;
                debug!("Cache hit for {} '{}' -> {}", self.kind, name, id);
                Some(id)
            }
            None => {
                debug!("Cache miss for {} '{}'", self.kind, name);
                None
            }
        }
    }

    /// Record a resolution. The first ID recorded for a name wins.
    pub fn insert(&mut self, name: &str, id: u64) -> u64 {
        let stored = *self.entries.entry(name.to_string()).or_insert(id);
        if stored != id {
            debug!("Keeping cached {} '{}' -> {} (ignored {})", self.kind, name, stored, id);
        }
        stored
    }

    pub fn get_stats(&self) -> CacheStats {
        let hit_rate = if self.lookups > 0 {
            (self.hits as f64 / self.lookups as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            kind: self.kind,
            total_entries: self.entries.len(),
            lookups: self.lookups,
            hits: self.hits,
            hit_rate_percent: hit_rate,
        }
    }
}
