// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Scoped query timeout changes

use super::{GraphStore, StoreResult};

/// Raises the store's query timeout and restores it when dropped
///
/// The restore runs on every exit path, including early returns and panics
/// unwinding through the owning scope.
pub struct QueryTimeoutGuard<'a> {
    store: &'a dyn GraphStore,
    restore_ms: u64,
}

impl<'a> QueryTimeoutGuard<'a> {
    pub fn raise(store: &'a dyn GraphStore, raised_ms: u64, restore_ms: u64) -> StoreResult<Self> {
        store.set_query_timeout(raised_ms)?;
        log::debug!("Query timeout raised to {}ms", raised_ms);
        Ok(Self { store, restore_ms })
    }

    pub fn restore_ms(&self) -> u64 {
        self.restore_ms
    }
}

impl Drop for QueryTimeoutGuard<'_> {
    fn drop(&mut self) {
        match self.store.set_query_timeout(self.restore_ms) {
            Ok(()) => log::debug!("Query timeout restored to {}ms", self.restore_ms),
            Err(e) => log::error!(
                "Failed to restore query timeout to {}ms: {}",
                self.restore_ms,
                e
            ),
        }
    }
}
