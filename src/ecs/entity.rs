//! Entity identifiers and their allocator
//!
//! Entities are plain 64-bit keys. They own nothing; every piece of state lives
//! in a component pool keyed by the entity id.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::error::EcsError;

/// Opaque entity handle.
///
/// Id `0` is reserved and never issued by [`EntityManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// The reserved, never-issued id.
    pub const NULL: Self = Self(0);

    /// Wrap a raw id value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw id value.
    #[must_use]
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Whether this is the reserved null id.
    #[must_use]
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Index into a sparse array.
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues and recycles entity ids.
///
/// Released ids are handed out again in FIFO order before any new id is minted.
#[derive(Debug)]
pub struct EntityManager {
    /// Next never-issued id
    next: u64,
    /// Released ids, oldest first
    released: VecDeque<EntityId>,
    /// Mirror of `released` for O(1) validity checks
    released_set: FxHashSet<EntityId>,
}

impl EntityManager {
    /// Create an allocator whose first id is 1
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: 1,
            released: VecDeque::new(),
            released_set: FxHashSet::default(),
        }
    }

    /// Allocate an id, preferring the oldest released one.
    ///
    /// # Panics
    ///
    /// Panics if the 64-bit id space is exhausted.
    pub fn create(&mut self) -> EntityId {
        if let Some(entity) = self.released.pop_front() {
            self.released_set.remove(&entity);
            return entity;
        }

        let entity = EntityId(self.next);
        self.next = self
            .next
            .checked_add(1)
            .expect("entity id space exhausted");
        entity
    }

    /// Return an id to the free list.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ReservedEntity`] for id 0 and
    /// [`EcsError::InvalidEntity`] if the id is not currently allocated,
    /// which includes releasing the same id twice.
    pub fn release(&mut self, entity: EntityId) -> Result<(), EcsError> {
        if entity.is_null() {
            return Err(EcsError::ReservedEntity);
        }
        if !self.valid(entity) {
            return Err(EcsError::InvalidEntity(entity));
        }

        self.released.push_back(entity);
        self.released_set.insert(entity);
        Ok(())
    }

    /// Whether the id is currently allocated
    #[must_use]
    pub fn valid(&self, entity: EntityId) -> bool {
        !entity.is_null() && entity.0 < self.next && !self.released_set.contains(&entity)
    }

    /// Number of live entities
    #[must_use]
    pub fn len(&self) -> usize {
        (self.next - 1) as usize - self.released.len()
    }

    /// Whether no entity is alive
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_start_above_zero() {
        let mut manager = EntityManager::new();

        let first = manager.create();
        assert_eq!(first.raw(), 1);
        assert!(!first.is_null());
        assert!(!manager.valid(EntityId::NULL));
    }

    #[test]
    fn test_released_id_is_reused_first() {
        let mut manager = EntityManager::new();
        let a = manager.create();
        let _b = manager.create();

        manager.release(a).unwrap();
        assert!(!manager.valid(a));

        // The released id comes back before a fresh one is minted
        assert_eq!(manager.create(), a);
        assert_eq!(manager.create().raw(), 3);
    }

    #[test]
    fn test_recycling_is_fifo() {
        let mut manager = EntityManager::new();
        let a = manager.create();
        let b = manager.create();
        let c = manager.create();

        manager.release(c).unwrap();
        manager.release(a).unwrap();
        manager.release(b).unwrap();

        assert_eq!(manager.create(), c);
        assert_eq!(manager.create(), a);
        assert_eq!(manager.create(), b);
    }

    #[test]
    fn test_double_release_is_rejected() {
        let mut manager = EntityManager::new();
        let a = manager.create();

        manager.release(a).unwrap();
        assert_eq!(manager.release(a), Err(EcsError::InvalidEntity(a)));
        assert_eq!(manager.release(EntityId::NULL), Err(EcsError::ReservedEntity));
        assert_eq!(
            manager.release(EntityId::from_raw(99)),
            Err(EcsError::InvalidEntity(EntityId::from_raw(99)))
        );
    }

    #[test]
    fn test_len_tracks_live_entities() {
        let mut manager = EntityManager::new();
        assert!(manager.is_empty());

        let a = manager.create();
        manager.create();
        assert_eq!(manager.len(), 2);

        manager.release(a).unwrap();
        assert_eq!(manager.len(), 1);
    }
}
