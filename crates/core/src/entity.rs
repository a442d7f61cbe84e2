//! Entity trait: records with a stable identity.

/// Anything addressed by a typed id rather than by its contents.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> Self::Id;
}

/// Index of the entity with `id`, if present.
pub fn position_of<E: Entity>(items: &[E], id: E::Id) -> Option<usize> {
    items.iter().position(|e| e.id() == id)
}

pub fn find_mut<E: Entity>(items: &mut [E], id: E::Id) -> Option<&mut E> {
    items.iter_mut().find(|e| e.id() == id)
}
