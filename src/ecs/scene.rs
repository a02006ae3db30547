//! Scene: entities, components, cached views and signals
//!
//! The scene is the single owner of the ECS state. Every structural change goes
//! through it so that the component epoch, and with it every cached view, stays
//! consistent.

use rustc_hash::FxHashMap;

use super::component::{Component, ComponentManager};
use super::entity::{EntityId, EntityManager};
use super::error::EcsError;
use super::signal::SignalId;
use super::view::{Query, View, ViewCache};
use crate::world::HeldItem;

/// Game scene containing all entities and components
#[derive(Debug, Default)]
pub struct Scene {
    entities: EntityManager,
    components: ComponentManager,
    views: ViewCache,
    /// Transient per-frame flags and counters
    signals: FxHashMap<SignalId, i64>,
    /// Drag-and-drop cursor payload shared by inventory screens
    pub held: HeldItem,
}

impl Scene {
    /// Create a new empty scene
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Entity lifecycle
    // ========================================================================

    /// Allocate a new entity.
    ///
    /// Marks every cached view stale even though no pool changed yet; a fresh
    /// entity is almost always followed by component inserts.
    pub fn new_entity(&mut self) -> EntityId {
        let entity = self.entities.create();
        self.components.bump();
        entity
    }

    /// Destroy an entity and every component it owns.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ReservedEntity`] for id 0 and
    /// [`EcsError::InvalidEntity`] if the entity is not alive.
    pub fn erase(&mut self, entity: EntityId) -> Result<(), EcsError> {
        if entity.is_null() {
            return Err(EcsError::ReservedEntity);
        }
        if !self.entities.valid(entity) {
            return Err(EcsError::InvalidEntity(entity));
        }

        self.components.erase_entity(entity);
        self.entities.release(entity)?;
        self.components.bump();
        Ok(())
    }

    /// Whether the entity is currently alive
    #[must_use]
    pub fn valid(&self, entity: EntityId) -> bool {
        self.entities.valid(entity)
    }

    /// Number of live entities
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // ========================================================================
    // Components
    // ========================================================================

    /// Insert or overwrite a component, returning the replaced value.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidEntity`] (or [`EcsError::ReservedEntity`])
    /// if the entity is not alive.
    pub fn emplace<T: Component>(&mut self, entity: EntityId, value: T) -> Result<Option<T>, EcsError> {
        self.check(entity)?;
        Ok(self.components.emplace(entity, value))
    }

    /// Remove a component, returning it if the entity had one
    pub fn remove<T: Component>(&mut self, entity: EntityId) -> Option<T> {
        self.components.remove::<T>(entity)
    }

    /// Borrow a component.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if the entity has no `T`.
    pub fn get<T: Component>(&self, entity: EntityId) -> Result<&T, EcsError> {
        match self.components.pool::<T>() {
            Some(pool) => pool.get(entity),
            None => Err(EcsError::MissingComponent {
                entity,
                component: std::any::type_name::<T>(),
            }),
        }
    }

    /// Borrow a component mutably.
    ///
    /// Value mutation is not structural, so views stay current.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if the entity has no `T`.
    pub fn get_mut<T: Component>(&mut self, entity: EntityId) -> Result<&mut T, EcsError> {
        if !self.components.contains::<T>(entity) {
            return Err(EcsError::MissingComponent {
                entity,
                component: std::any::type_name::<T>(),
            });
        }
        self.components.pool_mut::<T>().get_mut(entity)
    }

    /// Whether the entity has a `T` component
    #[must_use]
    pub fn contains<T: Component>(&self, entity: EntityId) -> bool {
        self.components.contains::<T>(entity)
    }

    /// Read-only access to the component manager
    #[must_use]
    pub fn components(&self) -> &ComponentManager {
        &self.components
    }

    fn check(&self, entity: EntityId) -> Result<(), EcsError> {
        if entity.is_null() {
            Err(EcsError::ReservedEntity)
        } else if !self.entities.valid(entity) {
            Err(EcsError::InvalidEntity(entity))
        } else {
            Ok(())
        }
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Entities having every component in `Q`, from cache when still current.
    ///
    /// ```ignore
    /// for entity in scene.view::<(Position, Velocity)>().iter() { .. }
    /// ```
    pub fn view<Q: Query>(&mut self) -> View<Q> {
        let key = Q::key(&mut self.components);
        let (entities, epoch) = self.views.resolve(key, &self.components);
        View::new(entities, epoch)
    }

    /// Current structural-change epoch
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.components.epoch()
    }

    /// Number of view recomputations so far
    #[must_use]
    pub fn view_rebuilds(&self) -> u64 {
        self.views.rebuilds()
    }

    // ========================================================================
    // Signals
    // ========================================================================

    /// Current value of a signal; unseen signals read as 0.
    #[must_use]
    pub fn signal(&self, id: SignalId) -> i64 {
        self.signals.get(&id).copied().unwrap_or(0)
    }

    /// Whether a signal is raised (non-zero)
    #[must_use]
    pub fn is_signaled(&self, id: SignalId) -> bool {
        self.signal(id) != 0
    }

    /// Get-or-insert a signal slot, defaulting to 0.
    ///
    /// This inserts on miss; use [`Self::signal`] for a pure read.
    pub fn signal_mut(&mut self, id: SignalId) -> &mut i64 {
        self.signals.entry(id).or_insert(0)
    }

    /// Set a signal value
    pub fn set_signal(&mut self, id: SignalId, value: i64) {
        self.signals.insert(id, value);
    }

    /// Read a signal and clear it, consuming the event
    pub fn take_signal(&mut self, id: SignalId) -> i64 {
        self.signals.remove(&id).unwrap_or(0)
    }

    /// Reset every signal. Called once per frame by the game loop.
    pub fn clear_signals(&mut self) {
        self.signals.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::signal::{LEFT_CLICK_DOWN, PHYSICS_DIRTY};

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Health(u32);

    #[test]
    fn test_scene_component_roundtrip() {
        let mut scene = Scene::new();
        let entity = scene.new_entity();

        assert_eq!(scene.emplace(entity, Health(5)).unwrap(), None);
        assert_eq!(*scene.get::<Health>(entity).unwrap(), Health(5));

        scene.get_mut::<Health>(entity).unwrap().0 = 7;
        assert_eq!(scene.remove::<Health>(entity), Some(Health(7)));
        assert!(!scene.contains::<Health>(entity));
    }

    #[test]
    fn test_missing_component_is_an_error() {
        let mut scene = Scene::new();
        let entity = scene.new_entity();

        assert!(matches!(
            scene.get::<Health>(entity),
            Err(EcsError::MissingComponent { .. })
        ));
        assert!(scene.get_mut::<Health>(entity).is_err());
    }

    #[test]
    fn test_emplace_overwrites() {
        let mut scene = Scene::new();
        let entity = scene.new_entity();

        scene.emplace(entity, Health(1)).unwrap();
        assert_eq!(scene.emplace(entity, Health(2)).unwrap(), Some(Health(1)));
        assert_eq!(scene.view::<(Health,)>().len(), 1);
    }

    #[test]
    fn test_erase_releases_and_clears() {
        let mut scene = Scene::new();
        let a = scene.new_entity();
        scene.emplace(a, Health(1)).unwrap();

        scene.erase(a).unwrap();
        assert!(!scene.valid(a));
        assert!(!scene.contains::<Health>(a));
        assert_eq!(scene.entity_count(), 0);

        // The id is recycled without its old components
        let b = scene.new_entity();
        assert_eq!(a, b);
        assert!(!scene.contains::<Health>(b));
    }

    #[test]
    fn test_erase_rejects_reserved_and_dead_ids() {
        let mut scene = Scene::new();
        let a = scene.new_entity();

        assert_eq!(scene.erase(EntityId::NULL), Err(EcsError::ReservedEntity));
        scene.erase(a).unwrap();
        assert_eq!(scene.erase(a), Err(EcsError::InvalidEntity(a)));
        assert_eq!(scene.emplace(a, Health(1)), Err(EcsError::InvalidEntity(a)));
    }

    #[test]
    fn test_new_entity_bumps_epoch() {
        let mut scene = Scene::new();
        let before = scene.epoch();
        scene.new_entity();
        assert!(scene.epoch() > before);
    }

    #[test]
    fn test_signals_default_to_zero() {
        let mut scene = Scene::new();

        assert_eq!(scene.signal(LEFT_CLICK_DOWN), 0);
        assert!(!scene.is_signaled(LEFT_CLICK_DOWN));

        *scene.signal_mut(PHYSICS_DIRTY) += 1;
        scene.set_signal(LEFT_CLICK_DOWN, 1200);

        assert_eq!(scene.take_signal(LEFT_CLICK_DOWN), 1200);
        assert_eq!(scene.signal(LEFT_CLICK_DOWN), 0);
        assert_eq!(scene.signal(PHYSICS_DIRTY), 1);

        scene.clear_signals();
        assert_eq!(scene.signal(PHYSICS_DIRTY), 0);
    }
}
