//! Sparse-Set Component Pools
//!
//! One pool exists per component type. A pool maps entity ids to component
//! values with O(1) insert, lookup and removal, while keeping the values packed
//! in a dense array for cache-friendly iteration.
//!
//! # Layout
//!
//! - `sparse[entity]` → index into the dense arrays (or `NONE`)
//! - `entities[i]`    → entity owning dense slot `i`
//! - `components[i]`  → the component value of that entity
//!
//! Removal swaps the last dense slot into the hole and pops, so the dense
//! arrays never have gaps. Iteration order is therefore only stable between
//! structural mutations.

use std::any::Any;

use super::entity::EntityId;
use super::error::EcsError;

// ============================================================================
// Type-Erased Pool
// ============================================================================

/// Operations every pool supports regardless of its component type.
///
/// The component manager stores pools behind this trait and recovers the
/// concrete [`SparseSet`] through `as_any` downcasts.
pub trait ErasedPool: Any {
    /// Whether the entity has a component in this pool
    fn contains(&self, entity: EntityId) -> bool;

    /// Remove the entity's component, returning whether one existed
    fn erase(&mut self, entity: EntityId) -> bool;

    /// Number of stored components
    fn len(&self) -> usize;

    /// Entities in dense order
    fn entities(&self) -> &[EntityId];

    /// Name of the stored component type
    fn component_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ============================================================================
// Sparse Set
// ============================================================================

/// Dense storage for all components of type `T`.
///
/// # Performance Characteristics
///
/// | Operation  | Time Complexity |
/// |------------|-----------------|
/// | `emplace`  | O(1) amortized  |
/// | `get`      | O(1)            |
/// | `contains` | O(1)            |
/// | `erase`    | O(1)            |
/// | `iter`     | O(n)            |
///
/// The sparse array grows to cover the largest entity id ever inserted.
#[derive(Debug)]
pub struct SparseSet<T> {
    /// Entity id → dense index
    sparse: Vec<usize>,
    /// Dense index → owning entity
    entities: Vec<EntityId>,
    /// Dense index → component value
    components: Vec<T>,
}

impl<T> SparseSet<T> {
    /// Sentinel for "entity not present".
    const NONE: usize = usize::MAX;

    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            entities: Vec::new(),
            components: Vec::new(),
        }
    }

    /// Insert the component for `entity`, overwriting any existing value.
    ///
    /// Returns the previous value when one was overwritten. A pool never holds
    /// two entries for the same entity.
    pub fn emplace(&mut self, entity: EntityId, value: T) -> Option<T> {
        let index = entity.index();
        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, Self::NONE);
        }

        let slot = self.sparse[index];
        if slot != Self::NONE {
            return Some(std::mem::replace(&mut self.components[slot], value));
        }

        self.sparse[index] = self.entities.len();
        self.entities.push(entity);
        self.components.push(value);
        None
    }

    /// Dense slot of the entity, if present.
    #[inline]
    fn slot(&self, entity: EntityId) -> Option<usize> {
        let slot = *self.sparse.get(entity.index())?;
        (slot != Self::NONE && self.entities.get(slot) == Some(&entity)).then_some(slot)
    }

    /// Whether the entity has a component in this pool
    #[must_use]
    #[inline]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.slot(entity).is_some()
    }

    /// Get the component of `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if the entity has no component
    /// in this pool.
    pub fn get(&self, entity: EntityId) -> Result<&T, EcsError> {
        match self.slot(entity) {
            Some(slot) => Ok(&self.components[slot]),
            None => Err(Self::missing(entity)),
        }
    }

    /// Get the component of `entity` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if the entity has no component
    /// in this pool.
    pub fn get_mut(&mut self, entity: EntityId) -> Result<&mut T, EcsError> {
        match self.slot(entity) {
            Some(slot) => Ok(&mut self.components[slot]),
            None => Err(Self::missing(entity)),
        }
    }

    /// Remove the component of `entity` by swap-and-pop.
    ///
    /// Returns the removed value, or `None` if the entity was not present.
    pub fn erase(&mut self, entity: EntityId) -> Option<T> {
        let slot = self.slot(entity)?;

        self.entities.swap_remove(slot);
        let value = self.components.swap_remove(slot);

        // The former last element now lives at `slot`
        if let Some(&moved) = self.entities.get(slot) {
            self.sparse[moved.index()] = slot;
        }
        self.sparse[entity.index()] = Self::NONE;

        Some(value)
    }

    /// Number of stored components
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the pool is empty
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in dense order
    #[must_use]
    #[inline]
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Iterate over `(entity, &component)` in dense order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.entities.iter().copied().zip(self.components.iter())
    }

    /// Iterate over `(entity, &mut component)` in dense order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.entities.iter().copied().zip(self.components.iter_mut())
    }

    fn missing(entity: EntityId) -> EcsError {
        EcsError::MissingComponent {
            entity,
            component: std::any::type_name::<T>(),
        }
    }
}

impl<T> Default for SparseSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> ErasedPool for SparseSet<T> {
    fn contains(&self, entity: EntityId) -> bool {
        SparseSet::contains(self, entity)
    }

    fn erase(&mut self, entity: EntityId) -> bool {
        SparseSet::erase(self, entity).is_some()
    }

    fn len(&self) -> usize {
        SparseSet::len(self)
    }

    fn entities(&self) -> &[EntityId] {
        SparseSet::entities(self)
    }

    fn component_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
