//! Domain event model: immutable facts with construction-time metadata.

use core::any::Any;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domainkit_core::{AggregateId, CausationId, CorrelationId, EventId, ValueObject};

use crate::clock::{Clock, SystemClock};

/// Metadata every domain event carries.
///
/// Populated once at construction and immutable afterward. Equality is
/// structural, so two events built from the same metadata compare equal while
/// two independent constructions differ (each generates a fresh `EventId`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    pub event_id: EventId,
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    /// New metadata with a generated `EventId` and a timestamp from `clock`.
    pub fn new(clock: &dyn Clock) -> Self {
        Self {
            event_id: EventId::new(),
            occurred_at: clock.now(),
        }
    }

    /// New metadata stamped with the system clock.
    pub fn now() -> Self {
        Self::new(&SystemClock)
    }
}

impl ValueObject for EventMetadata {}

/// Extended metadata for events participating in cross-aggregate workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichEventMetadata {
    #[serde(flatten)]
    pub base: EventMetadata,

    /// Groups events raised by one logical operation.
    pub correlation_id: CorrelationId,
    /// The event/command that triggered this one.
    pub causation_id: CausationId,
    /// The emitting aggregate. Not necessarily the same type as the entity's
    /// own identifier; this is the stream-level identity.
    pub aggregate_id: AggregateId,
    /// Aggregate version *after* this event applied (optimistic concurrency,
    /// event ordering).
    pub aggregate_version: u64,
    /// Schema version for future upcasting.
    pub event_version: u32,
}

impl RichEventMetadata {
    pub const DEFAULT_EVENT_VERSION: u32 = 1;

    pub fn new(
        clock: &dyn Clock,
        correlation_id: CorrelationId,
        causation_id: CausationId,
        aggregate_id: AggregateId,
        aggregate_version: u64,
    ) -> Self {
        Self {
            base: EventMetadata::new(clock),
            correlation_id,
            causation_id,
            aggregate_id,
            aggregate_version,
            event_version: Self::DEFAULT_EVENT_VERSION,
        }
    }

    pub fn now(
        correlation_id: CorrelationId,
        causation_id: CausationId,
        aggregate_id: AggregateId,
        aggregate_version: u64,
    ) -> Self {
        Self::new(
            &SystemClock,
            correlation_id,
            causation_id,
            aggregate_id,
            aggregate_version,
        )
    }

    pub fn with_event_version(mut self, event_version: u32) -> Self {
        self.event_version = event_version;
        self
    }
}

impl ValueObject for RichEventMetadata {}

/// An immutable record of a fact that already happened in the domain.
///
/// Object-safe on purpose: event buffers and the dispatcher handle events as
/// `Arc<dyn DomainEvent>`, so aggregates of different types can share one
/// collector. Events never mutate after construction, which is what makes it
/// safe to share the same instance across aggregate copies.
pub trait DomainEvent: core::fmt::Debug + Send + Sync + 'static {
    /// Construction-time metadata.
    fn metadata(&self) -> &EventMetadata;

    /// Stable event name/type identifier (e.g. "order.placed").
    fn event_type(&self) -> &'static str;

    /// Downcasting hook for handlers and tests.
    fn as_any(&self) -> &dyn Any;

    fn event_id(&self) -> EventId {
        self.metadata().event_id
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.metadata().occurred_at
    }
}

/// A domain event carrying [`RichEventMetadata`].
pub trait RichDomainEvent: DomainEvent {
    fn rich_metadata(&self) -> &RichEventMetadata;

    fn correlation_id(&self) -> CorrelationId {
        self.rich_metadata().correlation_id
    }

    fn causation_id(&self) -> CausationId {
        self.rich_metadata().causation_id
    }

    fn aggregate_id(&self) -> AggregateId {
        self.rich_metadata().aggregate_id
    }

    fn aggregate_version(&self) -> u64 {
        self.rich_metadata().aggregate_version
    }

    fn event_version(&self) -> u32 {
        self.rich_metadata().event_version
    }
}
