//! Aggregate-root contract: an entity that accumulates domain events.

use std::sync::Arc;

use domainkit_core::Entity;

use crate::buffer::EventBuffer;
use crate::event::DomainEvent;

/// Capability of owning a pending-event buffer.
///
/// Object-safe so the collector can track aggregates of different concrete
/// types behind `dyn EventBearer`. Implementors wire the two `event_buffer`
/// accessors to a composed [`EventBuffer`] field; everything else is provided.
/// Callers interact only through the provided operations — the buffer is the
/// one place an otherwise-immutable-by-convention aggregate mutates internal
/// bookkeeping state.
pub trait EventBearer: Send {
    /// The composed buffer (implementation hook).
    fn event_buffer(&self) -> &EventBuffer;

    /// Mutable access to the composed buffer (implementation hook).
    fn event_buffer_mut(&mut self) -> &mut EventBuffer;

    /// Read-only view of pending events, in insertion (causal) order.
    fn domain_events(&self) -> &[Arc<dyn DomainEvent>] {
        self.event_buffer().as_slice()
    }

    /// Raise an event: append it at the end of the sequence.
    ///
    /// Intended for the aggregate's own business logic, which decides *what*
    /// to raise; this contract only guarantees *where* it lands.
    fn record_event(&mut self, event: Arc<dyn DomainEvent>) {
        self.event_buffer_mut().record_shared(event);
    }

    /// Empty the pending-event sequence. Idempotent.
    fn clear_domain_events(&mut self) {
        self.event_buffer_mut().clear();
    }

    /// Carry `source`'s events onto this instance.
    ///
    /// Bridges copy-on-write updates: when an operation on instance A produces
    /// a new instance B, events raised by the operation already live on B, but
    /// events from earlier operations live on A and would be lost once A is
    /// discarded. Source events are prepended (see [`EventBuffer::copy_from`]);
    /// the source is unchanged.
    fn copy_events_from(&mut self, source: &dyn EventBearer) {
        let source_buffer = source.event_buffer();
        self.event_buffer_mut().copy_from(source_buffer);
    }
}

/// The sole externally-addressable entity of an aggregate: identity plus the
/// event-bearing capability. Blanket-implemented, nothing to write by hand.
pub trait AggregateRoot: Entity + EventBearer {}

impl<T> AggregateRoot for T where T: Entity + EventBearer {}
