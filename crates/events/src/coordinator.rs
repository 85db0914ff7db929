//! Immutable-update coordination for copy-on-write aggregate flows.

use domainkit_core::{DomainError, DomainResult};

use crate::aggregate::EventBearer;
use crate::collector::{EventCollector, SharedAggregate, TrackedAggregate};

/// Tie together event carry-over and collector tracking for one update.
///
/// A business operation on instance `original` produced the new instance held
/// by `modified`. This function:
///
/// 1. copies `original`'s pending events onto `modified` (prepended, since
///    they causally precede anything the operation raised);
/// 2. registers `modified` with the collector for later dispatch;
/// 3. returns `modified` for fluent chaining.
///
/// This is the single choke point for copy-on-write updates: callers cannot
/// preserve event history without also being tracked, or vice versa. Null
/// arguments are impossible by construction; the only runtime failure is a
/// poisoned handle lock, surfaced as [`DomainError::LockPoisoned`] before any
/// state is mutated.
pub fn coordinate_update<A>(
    modified: SharedAggregate<A>,
    original: &A,
    collector: &mut EventCollector,
) -> DomainResult<SharedAggregate<A>>
where
    A: EventBearer + 'static,
{
    {
        let mut guard = modified.lock().map_err(|_| DomainError::LockPoisoned)?;
        guard.copy_events_from(original);
        tracing::debug!(
            pending = guard.domain_events().len(),
            "events carried across copy-on-write update"
        );
    }

    let tracked: TrackedAggregate = modified.clone();
    collector.track_aggregate(tracked);

    Ok(modified)
}
