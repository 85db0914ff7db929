//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value** — two value
/// objects with the same attribute values are equal; identity doesn't exist
/// for them. To "modify" one, construct a new one.
///
/// Contrast with [`crate::Entity`], where identity is the identifier and
/// other attributes don't participate in domain equality.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
