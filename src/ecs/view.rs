//! Cached Multi-Component Views
//!
//! A view is the set of entities that have every component of a given type
//! set. Views are expensive to compute relative to a frame, so the result is
//! cached per type set and only recomputed when the component epoch moved.
//!
//! # Design Principles
//!
//! - **Lazy Evaluation**: The intersection is only rebuilt when a view is requested
//! - **Global Invalidation**: Any structural change to any pool stales every view
//! - **Order-Free Keys**: `(A, B)` and `(B, A)` share one cache slot
//! - **Smallest Pool First**: A rebuild walks the smallest pool and filters by the others
//!
//! # Example
//!
//! ```ignore
//! let movers = scene.view::<(Position, Velocity)>();
//! for entity in movers.iter() {
//!     scene.get_mut::<Position>(entity)?.0 += velocity * delta;
//! }
//! ```

use std::marker::PhantomData;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::component::{Component, ComponentId, ComponentManager};
use super::entity::EntityId;
use super::scene::Scene;

// ============================================================================
// Query
// ============================================================================

/// Cache key: the sorted, de-duplicated component ids of a view.
pub type ViewKey = SmallVec<[ComponentId; 4]>;

/// A tuple of component types that can be viewed together.
///
/// Implemented for tuples of one to four component types.
pub trait Query: 'static {
    /// Borrowed components yielded for one entity
    type Item<'a>;

    /// Register every component type and return the cache key
    fn key(components: &mut ComponentManager) -> ViewKey;

    /// Fetch the components of `entity`, or `None` if any is missing
    fn fetch(components: &ComponentManager, entity: EntityId) -> Option<Self::Item<'_>>;
}

macro_rules! impl_query {
    ($($name:ident),+) => {
        impl<$($name: Component),+> Query for ($($name,)+) {
            type Item<'a> = ($(&'a $name,)+);

            fn key(components: &mut ComponentManager) -> ViewKey {
                let mut key: ViewKey = SmallVec::new();
                $(key.push(components.register::<$name>());)+
                key.sort_unstable();
                key.dedup();
                key
            }

            fn fetch(components: &ComponentManager, entity: EntityId) -> Option<Self::Item<'_>> {
                Some(($(components.pool::<$name>()?.get(entity).ok()?,)+))
            }
        }
    };
}

impl_query!(A);
impl_query!(A, B);
impl_query!(A, B, C);
impl_query!(A, B, C, D);

// ============================================================================
// View Cache
// ============================================================================

/// A cached intersection and the epoch it was computed at.
#[derive(Debug, Clone)]
struct CachedView {
    epoch: u64,
    entities: Rc<[EntityId]>,
}

/// Per-type-set cache of view membership.
#[derive(Debug, Default)]
pub struct ViewCache {
    entries: FxHashMap<ViewKey, CachedView>,
    /// Number of recomputations performed
    rebuilds: u64,
}

impl ViewCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Membership for `key`, recomputed if the epoch moved since last time.
    pub(crate) fn resolve(&mut self, key: ViewKey, components: &ComponentManager) -> (Rc<[EntityId]>, u64) {
        let epoch = components.epoch();

        if let Some(cached) = self.entries.get(&key)
            && cached.epoch == epoch
        {
            return (Rc::clone(&cached.entities), epoch);
        }

        let entities = Self::intersect(&key, components);
        log::trace!("Rebuilt view {:?}: {} entities", key, entities.len());
        self.rebuilds += 1;

        let cached = CachedView { epoch, entities };
        let result = (Rc::clone(&cached.entities), epoch);
        self.entries.insert(key, cached);
        result
    }

    /// Walk the smallest pool and keep entities present in all others.
    fn intersect(key: &ViewKey, components: &ComponentManager) -> Rc<[EntityId]> {
        let pools: SmallVec<[_; 4]> = key.iter().filter_map(|&id| components.erased(id)).collect();
        if pools.len() != key.len() {
            return Rc::from([]);
        }

        let Some(smallest) = pools.iter().min_by_key(|pool| pool.len()) else {
            return Rc::from([]);
        };

        smallest
            .entities()
            .iter()
            .copied()
            .filter(|&entity| pools.iter().all(|pool| pool.contains(entity)))
            .collect()
    }

    /// Number of recomputations performed so far
    #[must_use]
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Number of distinct type sets cached
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// View
// ============================================================================

/// Snapshot of the entities matching query `Q`.
///
/// A view is valid for the epoch it was acquired at. After any structural
/// change to the scene the snapshot may name entities that lost components
/// (or miss new ones), so callers must re-acquire it with [`Scene::view`].
/// Mutating component *values* while walking [`View::iter`] is fine.
pub struct View<Q: Query> {
    entities: Rc<[EntityId]>,
    epoch: u64,
    _marker: PhantomData<fn() -> Q>,
}

impl<Q: Query> View<Q> {
    pub(crate) fn new(entities: Rc<[EntityId]>, epoch: u64) -> Self {
        Self {
            entities,
            epoch,
            _marker: PhantomData,
        }
    }

    /// Iterate the matching entity ids
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().copied()
    }

    /// Matching entity ids as a slice
    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Number of matching entities
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entity matches
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Whether `entity` is part of this snapshot
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains(&entity)
    }

    /// Epoch this snapshot was taken at
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether the scene has not been structurally changed since acquisition
    #[must_use]
    pub fn is_current(&self, scene: &Scene) -> bool {
        self.epoch == scene.epoch()
    }

    /// Call `f` with every entity and its borrowed components.
    ///
    /// The scene is borrowed immutably for the whole walk, so it cannot be
    /// structurally changed from inside `f`.
    pub fn each<F>(&self, scene: &Scene, mut f: F)
    where
        F: FnMut(EntityId, Q::Item<'_>),
    {
        debug_assert!(
            self.is_current(scene),
            "view used after a structural change; re-acquire it"
        );

        for &entity in self.entities.iter() {
            if let Some(item) = Q::fetch(scene.components(), entity) {
                f(entity, item);
            }
        }
    }

    /// Borrow the components of one matching entity
    #[must_use]
    pub fn get<'s>(&self, scene: &'s Scene, entity: EntityId) -> Option<Q::Item<'s>> {
        Q::fetch(scene.components(), entity)
    }
}

impl<Q: Query> Clone for View<Q> {
    fn clone(&self) -> Self {
        Self::new(Rc::clone(&self.entities), self.epoch)
    }
}

impl<Q: Query> std::fmt::Debug for View<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("epoch", &self.epoch)
            .field("entities", &self.entities)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
