//! Keyed documents.

/// A document keyed by its store identifier.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}

/// First document in `documents` whose key is `id`.
///
/// Snapshots are small and unordered, so this is a linear scan.
pub fn find_by_id<'a, E, I>(documents: I, id: &E::Id) -> Option<&'a E>
where
    E: Entity + 'a,
    I: IntoIterator<Item = &'a E>,
{
    documents.into_iter().find(|doc| doc.id() == id)
}
