//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Entities are compared by identity, never by their attribute values. A
/// transient entity (not yet accepted by a store) has no identity.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier, or `None` while the entity is transient.
    fn id(&self) -> Option<Self::Id>;

    /// Identity equality: same identifier, regardless of field values.
    fn same_identity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
