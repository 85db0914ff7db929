//! Entity contracts: identity + continuity across state changes.
//!
//! `HasId` is deliberately separate from `Entity`: generic repository and
//! collection-processing code only needs "something with an identifier" and can
//! require that capability structurally, without runtime type inspection and
//! without pulling in the entity/aggregate hierarchy.

/// Identifier-accessor capability.
pub trait HasId {
    /// Strongly-typed identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the identifier.
    fn id(&self) -> &Self::Id;
}

/// Domain entity: an object whose identity is its identifier.
///
/// Two entities are "the same entity" (in the domain sense, not the reference
/// sense) iff their `Id` values compare equal, regardless of any other
/// attribute differences. The identifier is fixed for the entity's lifetime.
pub trait Entity: HasId {
    /// Domain identity equality: compares identifiers only.
    fn same_entity_as(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
