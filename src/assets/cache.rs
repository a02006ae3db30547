//! Name-keyed asset caches
//!
//! Every asset is loaded at most once per name; later requests return a clone
//! of the first handle.

use rustc_hash::FxHashMap;

use super::error::AssetError;
use super::handle::AssetHandle;

/// Memoizing store for assets of one type
#[derive(Debug)]
pub struct AssetCache<T> {
    entries: FxHashMap<String, AssetHandle<T>>,
}

impl<T> AssetCache<T> {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Return the cached asset for `name`, loading it on first request.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error; failed loads are not cached.
    pub fn get_or_load<F>(&mut self, name: &str, load: F) -> Result<AssetHandle<T>, AssetError>
    where
        F: FnOnce(&str) -> Result<T, AssetError>,
    {
        if let Some(handle) = self.entries.get(name) {
            return Ok(handle.clone());
        }

        log::debug!("Asset cache miss: {name}");
        let handle = AssetHandle::new(name, load(name)?);
        self.entries.insert(name.to_owned(), handle.clone());
        Ok(handle)
    }

    /// Cached asset for `name`, without loading
    #[must_use]
    pub fn get(&self, name: &str) -> Option<AssetHandle<T>> {
        self.entries.get(name).cloned()
    }

    /// Whether `name` is cached
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of cached assets
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

impl<T> Default for AssetCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_once_per_name() {
        let mut cache = AssetCache::new();
        let mut loads = 0;

        let first = cache
            .get_or_load("a", |name| {
                loads += 1;
                Ok(name.len())
            })
            .unwrap();
        let second = cache.get_or_load("a", |_| unreachable!()).unwrap();

        assert_eq!(first, second);
        assert_eq!(loads, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let mut cache: AssetCache<u32> = AssetCache::new();

        let err = cache
            .get_or_load("missing", |name| Err(AssetError::NotFound(name.to_owned())))
            .unwrap_err();

        assert_eq!(err, AssetError::NotFound("missing".into()));
        assert!(!cache.contains("missing"));
    }
}
