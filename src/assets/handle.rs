//! Named, shared asset handles

use std::fmt;
use std::sync::Arc;

struct Loaded<T> {
    name: Box<str>,
    value: T,
}

/// A cheap, clonable reference to an asset loaded under a name.
///
/// Handles compare by load, not by content: clones of one handle are equal,
/// while reloading the same name after it was evicted yields a new, unequal
/// handle.
pub struct AssetHandle<T> {
    inner: Arc<Loaded<T>>,
}

impl<T> AssetHandle<T> {
    #[must_use]
    pub fn new(name: impl Into<Box<str>>, value: T) -> Self {
        Self {
            inner: Arc::new(Loaded {
                name: name.into(),
                value,
            }),
        }
    }

    /// Name the asset was requested under
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[must_use]
    pub fn get(&self) -> &T {
        &self.inner.value
    }

    /// Whether both handles came from the same load
    #[must_use]
    pub fn same_load(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Live handles to this load, the cache's own entry included
    #[must_use]
    pub fn users(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for AssetHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_load(other)
    }
}

impl<T> Eq for AssetHandle<T> {}

impl<T> std::ops::Deref for AssetHandle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner.value
    }
}

impl<T: fmt::Debug> fmt::Debug for AssetHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetHandle")
            .field("name", &self.name())
            .field("value", self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_is_same_load() {
        let stone = AssetHandle::new("blocks/stone.png", 7_u32);
        let copy = stone.clone();

        assert_eq!(stone, copy);
        assert_eq!(copy.name(), "blocks/stone.png");
        assert_eq!(*copy, 7);
        assert_eq!(stone.users(), 2);
    }

    #[test]
    fn test_reload_is_distinct() {
        let first = AssetHandle::new("dirt", 1_u8);
        let second = AssetHandle::new("dirt", 1_u8);

        assert_ne!(first, second);
        assert!(!first.same_load(&second));
    }
}
