//! Component type registry and pool ownership
//!
//! Every distinct component type gets a [`ComponentId`] the first time it is
//! requested. Ids come from a monotonic counter and are never reused, so they
//! stay stable for the lifetime of the manager.

use std::any::TypeId;

use rustc_hash::FxHashMap;

use super::entity::EntityId;
use super::pool::{ErasedPool, SparseSet};

/// Marker for types that can be stored as components.
pub trait Component: 'static {}

impl<T: 'static> Component for T {}

/// Stable per-type component identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u32);

impl ComponentId {
    /// Get the raw id value
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Owns one pool per component type and the structural-change epoch.
///
/// The epoch is bumped on every structural change (insert, overwrite, removal)
/// made through this manager. View caches compare against it to detect
/// staleness.
pub struct ComponentManager {
    /// Type → assigned id
    ids: FxHashMap<TypeId, ComponentId>,
    /// Pools indexed by component id
    pools: Vec<Box<dyn ErasedPool>>,
    /// Structural-change counter
    epoch: u64,
}

impl ComponentManager {
    /// Create an empty manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            ids: FxHashMap::default(),
            pools: Vec::new(),
            epoch: 0,
        }
    }

    /// Id of `T`, registering the type (and creating its pool) on first request.
    pub fn register<T: Component>(&mut self) -> ComponentId {
        if let Some(&id) = self.ids.get(&TypeId::of::<T>()) {
            return id;
        }

        let id = ComponentId(self.pools.len() as u32);
        self.ids.insert(TypeId::of::<T>(), id);
        self.pools.push(Box::new(SparseSet::<T>::new()));
        log::trace!("Registered component {} as {}", std::any::type_name::<T>(), id.0);
        id
    }

    /// Id of `T` if it has been registered
    #[must_use]
    pub fn id_of<T: Component>(&self) -> Option<ComponentId> {
        self.ids.get(&TypeId::of::<T>()).copied()
    }

    /// Typed pool for `T`, if the type has been registered
    #[must_use]
    pub fn pool<T: Component>(&self) -> Option<&SparseSet<T>> {
        let id = self.id_of::<T>()?;
        self.pools[id.0 as usize]
            .as_any()
            .downcast_ref::<SparseSet<T>>()
    }

    /// Typed pool for `T`, created on first call.
    ///
    /// Crate-private: structural changes must go through [`Self::emplace`] and
    /// [`Self::remove`] so the epoch is maintained.
    pub(crate) fn pool_mut<T: Component>(&mut self) -> &mut SparseSet<T> {
        let id = self.register::<T>();
        match self.pools[id.0 as usize]
            .as_any_mut()
            .downcast_mut::<SparseSet<T>>()
        {
            Some(pool) => pool,
            None => unreachable!("component id {} is bound to another type", id.0),
        }
    }

    /// Type-erased pool by id
    #[must_use]
    pub fn erased(&self, id: ComponentId) -> Option<&dyn ErasedPool> {
        self.pools.get(id.0 as usize).map(|pool| pool.as_ref())
    }

    /// Insert or overwrite the component of `entity`.
    pub fn emplace<T: Component>(&mut self, entity: EntityId, value: T) -> Option<T> {
        let previous = self.pool_mut::<T>().emplace(entity, value);
        if previous.is_some() {
            log::warn!(
                "Entity {entity} already had component {}; overwriting",
                std::any::type_name::<T>()
            );
        }
        self.bump();
        previous
    }

    /// Remove the `T` component of `entity`, if present.
    pub fn remove<T: Component>(&mut self, entity: EntityId) -> Option<T> {
        let removed = self.pool_mut::<T>().erase(entity);
        if removed.is_some() {
            self.bump();
        }
        removed
    }

    /// Whether `entity` has a `T` component
    #[must_use]
    pub fn contains<T: Component>(&self, entity: EntityId) -> bool {
        self.pool::<T>().is_some_and(|pool| pool.contains(entity))
    }

    /// Erase `entity` from every pool.
    ///
    /// Costs O(number of component types). Returns how many components were
    /// removed.
    pub fn erase_entity(&mut self, entity: EntityId) -> usize {
        let removed = self
            .pools
            .iter_mut()
            .filter_map(|pool| pool.erase(entity).then_some(()))
            .count();
        self.bump();
        removed
    }

    /// Current structural-change epoch
    #[must_use]
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Mark every cached view stale
    #[inline]
    pub fn bump(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Number of registered component types
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.pools.len()
    }
}

impl Default for ComponentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ComponentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_map();
        for pool in &self.pools {
            list.entry(&pool.component_name(), &pool.len());
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(u32);

    #[derive(Debug, PartialEq)]
    struct Speed(f32);

    fn id(raw: u64) -> EntityId {
        EntityId::from_raw(raw)
    }

    #[test]
    fn test_ids_are_first_request_wins() {
        let mut manager = ComponentManager::new();

        let speed = manager.register::<Speed>();
        let health = manager.register::<Health>();

        assert_eq!(speed.raw(), 0);
        assert_eq!(health.raw(), 1);
        assert_eq!(manager.register::<Speed>(), speed);
        assert_eq!(manager.id_of::<Health>(), Some(health));
        assert_eq!(manager.type_count(), 2);
    }

    #[test]
    fn test_emplace_and_typed_access() {
        let mut manager = ComponentManager::new();

        manager.emplace(id(1), Health(10));
        manager.emplace(id(1), Speed(2.0));

        assert_eq!(manager.pool::<Health>().unwrap().get(id(1)), Ok(&Health(10)));
        assert!(manager.contains::<Speed>(id(1)));
        assert!(!manager.contains::<Speed>(id(2)));
        assert!(manager.pool::<u64>().is_none());
    }

    #[test]
    fn test_structural_changes_bump_epoch() {
        let mut manager = ComponentManager::new();
        let start = manager.epoch();

        manager.emplace(id(1), Health(1));
        assert!(manager.epoch() > start);

        let before_remove = manager.epoch();
        assert_eq!(manager.remove::<Health>(id(1)), Some(Health(1)));
        assert!(manager.epoch() > before_remove);

        // Removing something absent changes nothing
        let idle = manager.epoch();
        assert_eq!(manager.remove::<Health>(id(1)), None);
        assert_eq!(manager.epoch(), idle);
    }

    #[test]
    fn test_erase_entity_clears_every_pool() {
        let mut manager = ComponentManager::new();
        manager.emplace(id(5), Health(3));
        manager.emplace(id(5), Speed(1.0));
        manager.emplace(id(6), Speed(4.0));

        assert_eq!(manager.erase_entity(id(5)), 2);

        assert!(!manager.contains::<Health>(id(5)));
        assert!(!manager.contains::<Speed>(id(5)));
        assert!(manager.contains::<Speed>(id(6)));
    }
}
