//! Domain events

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainEvent {
    Variant(VariantEvent),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VariantEvent {
    /// A variant type row was added, edited or removed.
    TypesChanged { types: usize },
    Regenerated { combinations: usize },
    /// Rows dropped because a variant type is incomplete.
    Cleared,
    Added { index: usize },
    Removed { index: usize },
    Disabled,
}
