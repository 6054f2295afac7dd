//! Table Cache
//!
//! Evidence and update tables keyed by the parameters that define them.
//! Owned by the caller and handed to each engine, so repeated runs with the
//! same parameters share one computation and runs with different parameters
//! can never read each other's tables.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use crate::error::SimError;
use crate::systems::evidence::EvidenceTables;
use crate::systems::update_table::UpdateTable;

/// Key of an update table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UpdateKey {
    /// Bit pattern of the trust multiplier
    pub m_bits: u64,
    pub n: u32,
    pub granularity: u32,
}

impl UpdateKey {
    pub fn new(m: f64, n: u32, granularity: u32) -> Self {
        Self {
            m_bits: m.to_bits(),
            n,
            granularity,
        }
    }
}

/// Thread-safe get-or-compute store for precomputed tables.
///
/// A table is computed at most once per key: the first request holds the
/// entry while computing, later requests for the same key wait and then
/// share the result. Failed computations leave no entry behind.
#[derive(Debug, Default)]
pub struct TableCache {
    evidence: DashMap<u32, Arc<EvidenceTables>>,
    updates: DashMap<UpdateKey, Arc<UpdateTable>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evidence tables for `n` trials per experiment.
    pub fn evidence(&self, n: u32) -> Result<Arc<EvidenceTables>, SimError> {
        if let Some(found) = self.evidence.get(&n) {
            return Ok(Arc::clone(found.value()));
        }

        match self.evidence.entry(n) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                tracing::debug!(n, "computing evidence tables");
                let tables = Arc::new(EvidenceTables::precompute(n)?);
                entry.insert(Arc::clone(&tables));
                Ok(tables)
            }
        }
    }

    /// Update table for trust multiplier `m`, `n` trials and the given
    /// granularity, computing the evidence tables first if needed.
    pub fn update_table(
        &self,
        m: f64,
        n: u32,
        granularity: u32,
    ) -> Result<Arc<UpdateTable>, SimError> {
        let key = UpdateKey::new(m, n, granularity);
        if let Some(found) = self.updates.get(&key) {
            tracing::debug!(m, n, granularity, "update table cache hit");
            return Ok(Arc::clone(found.value()));
        }

        let evidence = self.evidence(n)?;
        match self.updates.entry(key) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                tracing::info!(m, n, granularity, "computing update table");
                let table = Arc::new(UpdateTable::precompute(m, granularity, &evidence)?);
                entry.insert(Arc::clone(&table));
                Ok(table)
            }
        }
    }

    /// Number of cached evidence and update tables.
    pub fn len(&self) -> (usize, usize) {
        (self.evidence.len(), self.updates.len())
    }

    pub fn is_empty(&self) -> bool {
        self.evidence.is_empty() && self.updates.is_empty()
    }

    /// Drops every cached table. Engines already holding a table keep it.
    pub fn clear(&self) {
        self.evidence.clear();
        self.updates.clear();
    }
}
