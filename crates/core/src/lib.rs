//! `domainkit-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identity contracts, strongly-typed identifiers, and the domain error model.
//! The event layer (`domainkit-events`) builds on top of these.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::{Entity, HasId};
pub use error::{DomainError, DomainResult};
pub use id::{AggregateId, CausationId, CorrelationId, EventId};
pub use value_object::ValueObject;
