// src/state.rs
// =============================================================================
// The two pieces of shared mutable state in a run.
//
// - VisitedSet: deduplicates links; `claim` is check-and-insert under one lock
// - DeadLinkCollector: append-only list of failed verifications, frozen once
//   the report is taken
//
// Each has its own mutex. Neither lock is ever held across an .await, so a
// plain std::sync::Mutex is enough.
//
// A poisoned lock is recovered with `into_inner`: a panic elsewhere cannot
// leave a HashSet insert or a Vec push half-done.
// =============================================================================

use crate::error::{CrawlError, Result};
use crate::link::Link;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
pub struct VisitedSet {
    links: Mutex<HashSet<Link>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the link and returns true if nobody claimed it before.
    pub fn claim(&self, link: &Link) -> bool {
        lock(&self.links).insert(link.clone())
    }

    pub fn len(&self) -> usize {
        lock(&self.links).len()
    }
}

/// A link whose verification did not yield HTTP 200.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadLink {
    pub link: Link,
    /// Response status, or 0 when the request never got a response
    pub status: u16,
    /// Transport error description, or the literal "None" for a plain bad status
    pub error: String,
}

#[derive(Debug, Default)]
struct CollectorInner {
    entries: Vec<DeadLink>,
    frozen: bool,
}

#[derive(Debug, Default)]
pub struct DeadLinkCollector {
    inner: Mutex<CollectorInner>,
}

impl DeadLinkCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a dead link. Fails once `freeze` has been called.
    pub fn record(&self, dead: DeadLink) -> Result<()> {
        let mut inner = lock(&self.inner);
        if inner.frozen {
            return Err(CrawlError::CollectorFrozen);
        }
        inner.entries.push(dead);
        Ok(())
    }

    /// Stops accepting entries and returns a copy of everything recorded.
    ///
    /// Called after the pool has drained; entries keep insertion order.
    pub fn freeze(&self) -> Vec<DeadLink> {
        let mut inner = lock(&self.inner);
        inner.frozen = true;
        inner.entries.clone()
    }
}
