//! `domainkit-events` — the domain-event lifecycle.
//!
//! Aggregates raise immutable [`DomainEvent`]s as a side effect of state
//! transitions. Because aggregates are modeled as copy-on-write values (a
//! business operation returns a *new* instance), raised events must be carried
//! across updates until an external dispatcher delivers them:
//!
//! ```text
//! load A → operation produces B (new events on B)
//!        → coordinate_update(B, &A, collector)   // copy A's events onto B, track B
//!        → persist B
//!        → dispatcher drains collector: publish events, clear buffers, clear set
//! ```
//!
//! The [`coordinate_update`] choke point guarantees every copy-on-write update
//! both preserves event history and is tracked for dispatch.

pub mod aggregate;
pub mod buffer;
pub mod bus;
pub mod clock;
pub mod collector;
pub mod coordinator;
pub mod dispatch;
pub mod event;
pub mod in_memory_bus;

pub use aggregate::{AggregateRoot, EventBearer};
pub use buffer::EventBuffer;
pub use bus::{EventBus, Subscription};
pub use clock::{Clock, FixedClock, SystemClock};
pub use collector::{EventCollector, SharedAggregate, TrackedAggregate, share};
pub use coordinator::coordinate_update;
pub use dispatch::{DispatchError, EventDispatcher};
pub use event::{DomainEvent, EventMetadata, RichDomainEvent, RichEventMetadata};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
