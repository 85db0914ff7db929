//! Reference dispatch helper: drain the collector onto an event bus.
//!
//! Runs after persistence succeeds. Aggregates are visited in registration
//! order and each aggregate's events are published in buffer (causal) order.
//! Buffers and the tracked set are cleared only once **every** event has been
//! delivered, so a mid-stream publish failure leaves all state intact and a
//! retry re-dispatches from the start (at-least-once; subscribers must be
//! idempotent). Partial-failure recovery policy beyond that belongs to the
//! caller.

use std::sync::Arc;

use thiserror::Error;

use crate::bus::EventBus;
use crate::collector::EventCollector;
use crate::event::DomainEvent;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// The bus rejected an event; nothing was cleared.
    #[error("publish failed: {0}")]
    Publish(String),

    /// A tracked aggregate's lock was poisoned.
    #[error("aggregate lock poisoned")]
    LockPoisoned,
}

/// Delivers collected events to a bus, then clears buffers and the collector.
#[derive(Debug)]
pub struct EventDispatcher<B> {
    bus: B,
}

impl<B> EventDispatcher<B>
where
    B: EventBus<Arc<dyn DomainEvent>>,
{
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Publish every tracked aggregate's pending events, then clear.
    ///
    /// Returns the number of events published.
    pub fn dispatch_and_clear(
        &self,
        collector: &mut EventCollector,
    ) -> Result<usize, DispatchError> {
        let mut published = 0usize;

        for tracked in collector.tracked_aggregates() {
            // Snapshot under the lock; publish outside it.
            let events: Vec<Arc<dyn DomainEvent>> = {
                let guard = tracked.lock().map_err(|_| DispatchError::LockPoisoned)?;
                guard.domain_events().to_vec()
            };

            for event in events {
                tracing::trace!(event_type = event.event_type(), "dispatching event");
                self.bus
                    .publish(event)
                    .map_err(|e| DispatchError::Publish(format!("{e:?}")))?;
                published += 1;
            }
        }

        // Every event delivered: release the buffers, then the tracked set.
        for tracked in collector.tracked_aggregates() {
            let mut guard = tracked.lock().map_err(|_| DispatchError::LockPoisoned)?;
            guard.clear_domain_events();
        }
        collector.clear_collected_events();

        tracing::debug!(published, "unit-of-work events dispatched");
        Ok(published)
    }
}
