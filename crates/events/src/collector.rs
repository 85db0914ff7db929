//! Unit-of-work registry of aggregates with pending events.

use std::sync::{Arc, Mutex};

use crate::aggregate::EventBearer;

/// Shared handle to a concrete aggregate instance.
///
/// The mutex exists because the dispatcher must clear event buffers after
/// delivery; within one unit of work all access is single-threaded, so the
/// lock is uncontended. Fan-out across threads requires external
/// synchronization (see crate docs).
pub type SharedAggregate<A> = Arc<Mutex<A>>;

/// Type-erased shared handle, as held by the collector.
pub type TrackedAggregate = Arc<Mutex<dyn EventBearer>>;

/// Wrap an aggregate instance for tracking.
pub fn share<A>(aggregate: A) -> SharedAggregate<A> {
    Arc::new(Mutex::new(aggregate))
}

/// Registry of aggregate instances pending dispatch.
///
/// Created fresh per logical unit of work (e.g. per incoming command) and
/// passed explicitly through call chains — never a process-wide singleton,
/// which would leak events across requests. The set is keyed by **instance
/// identity**, not by `Id` value: two distinct instances may represent the
/// same logical entity at different points of a unit of work, each carrying
/// distinct pending events.
#[derive(Default)]
pub struct EventCollector {
    tracked: Vec<TrackedAggregate>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an aggregate instance for later dispatch.
    ///
    /// Duplicate registration of the same instance is a silent no-op, so
    /// enumeration yields each instance exactly once and the dispatcher needs
    /// no deduplication of its own. First-registration order is preserved.
    pub fn track_aggregate(&mut self, aggregate: TrackedAggregate) {
        if self.tracked.iter().any(|t| Arc::ptr_eq(t, &aggregate)) {
            tracing::trace!("aggregate instance already tracked, skipping");
            return;
        }

        self.tracked.push(aggregate);
        tracing::debug!(tracked = self.tracked.len(), "aggregate tracked for dispatch");
    }

    /// Enumerate tracked aggregates, in first-registration order.
    pub fn tracked_aggregates(&self) -> &[TrackedAggregate] {
        &self.tracked
    }

    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Empty the tracked set.
    ///
    /// Invoked only after the dispatcher confirms successful delivery of every
    /// tracked aggregate's events.
    pub fn clear_collected_events(&mut self) {
        self.tracked.clear();
    }
}

impl core::fmt::Debug for EventCollector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventCollector")
            .field("tracked", &self.tracked.len())
            .finish()
    }
}
