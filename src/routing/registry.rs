//! Atomically swappable rule table.
//!
//! Readers grab an `Arc` to the current table and keep using it for the
//! whole request; a concurrent reload publishes a fresh table without
//! blocking them. Requests therefore always see one consistent table, never
//! a half-updated one.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::routing::rules::RuleTable;

pub struct RuleRegistry {
    table: ArcSwap<RuleTable>,
}

impl RuleRegistry {
    pub fn new(table: RuleTable) -> Self {
        Self {
            table: ArcSwap::from_pointee(table),
        }
    }

    /// Current table. The returned Arc stays valid across swaps.
    pub fn table(&self) -> Arc<RuleTable> {
        self.table.load_full()
    }

    /// Publishes a new table. In-flight requests finish on the old one.
    pub fn store(&self, table: RuleTable) {
        self.table.store(Arc::new(table));
    }
}
