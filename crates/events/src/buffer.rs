//! Ordered, append-only buffer of pending domain events.
//!
//! Aggregates own one of these by composition: event accumulation is
//! infrastructure bookkeeping, kept distinct from business-visible fields so
//! the aggregate's value-equality semantics are unaffected by it.

use std::sync::Arc;

use crate::event::DomainEvent;

/// The pending-event sequence of one aggregate instance.
///
/// Insertion order is significant: it reflects the causal order of operations
/// performed on the aggregate within one in-memory lifetime. Events are held
/// as `Arc<dyn DomainEvent>`, so cloning the buffer (for a copy-on-write
/// aggregate update) shares the same immutable event instances instead of
/// duplicating them.
#[derive(Debug, Default, Clone)]
pub struct EventBuffer {
    events: Vec<Arc<dyn DomainEvent>>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a newly raised event at the end of the sequence.
    pub fn record<E: DomainEvent>(&mut self, event: E) {
        self.events.push(Arc::new(event));
    }

    /// Append an already-shared event at the end of the sequence.
    pub fn record_shared(&mut self, event: Arc<dyn DomainEvent>) {
        self.events.push(event);
    }

    /// Read-only view of the pending events, in insertion order.
    pub fn as_slice(&self) -> &[Arc<dyn DomainEvent>] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn DomainEvent>> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Empty the sequence. Idempotent: clearing an empty buffer is a no-op.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Carry `source`'s events onto this buffer.
    ///
    /// The source's events are **prepended** before this buffer's own: they
    /// were raised by earlier operations on the conceptual entity, so they
    /// causally precede anything the new instance raised during construction.
    /// Relative order within each side is preserved. The source is unchanged.
    pub fn copy_from(&mut self, source: &EventBuffer) {
        if source.is_empty() {
            return;
        }

        let mut merged = Vec::with_capacity(source.len() + self.events.len());
        merged.extend(source.events.iter().cloned());
        merged.append(&mut self.events);
        self.events = merged;
    }
}
