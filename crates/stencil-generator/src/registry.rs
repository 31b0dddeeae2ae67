//! The module registry: an explicit in-process cache of loaded template
//! modules, keyed by resolved path.
//!
//! Owned by the template loader rather than living in ambient global
//! state, so invalidation can never touch unrelated code's modules.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Cache of loaded modules keyed by resolved path.
#[derive(Debug)]
pub struct ModuleRegistry<V> {
    entries: HashMap<PathBuf, V>,
}

impl<V> Default for ModuleRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ModuleRegistry<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Look up a cached module.
    pub fn get(&self, key: &Path) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert or replace a module.
    pub fn insert(&mut self, key: impl Into<PathBuf>, value: V) {
        self.entries.insert(key.into(), value);
    }

    /// Return the cached module for `key`, loading it with `load` on a
    /// cache miss.
    pub fn get_or_try_insert<E>(
        &mut self,
        key: &Path,
        load: impl FnOnce(&Path) -> Result<V, E>,
    ) -> Result<&V, E> {
        match self.entries.entry(key.to_path_buf()) {
            Entry::Occupied(slot) => Ok(slot.into_mut()),
            Entry::Vacant(slot) => {
                let value = load(key)?;
                Ok(slot.insert(value))
            }
        }
    }

    /// Delete every entry whose key satisfies the predicate.
    ///
    /// Keys are snapshotted before deletion, so the predicate observes a
    /// stable view of the registry.
    pub fn invalidate(&mut self, mut pred: impl FnMut(&Path) -> bool) {
        let doomed: Vec<PathBuf> = self
            .entries
            .keys()
            .filter(|key| pred(key))
            .cloned()
            .collect();

        for key in doomed {
            self.entries.remove(&key);
        }
    }

    /// Delete every entry rooted under `prefix`, leaving everything
    /// outside that tree untouched.
    pub fn invalidate_below(&mut self, prefix: &Path) {
        self.invalidate(|key| key.starts_with(prefix));
    }

    pub fn contains(&self, key: &Path) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(entries: &[(&str, &str)]) -> ModuleRegistry<String> {
        let mut registry = ModuleRegistry::new();
        for (key, value) in entries {
            registry.insert(PathBuf::from(key), (*value).to_string());
        }
        registry
    }

    #[test]
    fn test_invalidate_removes_only_matching_keys() {
        let mut registry = registry_with(&[
            ("/site/templates/index.md", "index"),
            ("/site/templates/about.md", "about"),
            ("/opt/stencil/runtime.rs", "runtime"),
        ]);

        registry.invalidate(|key| key.starts_with("/site/templates"));

        // No surviving key satisfies the predicate.
        assert!(!registry.contains(Path::new("/site/templates/index.md")));
        assert!(!registry.contains(Path::new("/site/templates/about.md")));

        // Non-matching entries keep their original values.
        assert_eq!(
            registry.get(Path::new("/opt/stencil/runtime.rs")),
            Some(&"runtime".to_string())
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invalidate_with_always_false_predicate_keeps_everything() {
        let mut registry = registry_with(&[("/a", "1"), ("/b", "2")]);

        registry.invalidate(|_| false);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(Path::new("/a")), Some(&"1".to_string()));
        assert_eq!(registry.get(Path::new("/b")), Some(&"2".to_string()));
    }

    #[test]
    fn test_invalidate_below_protects_entries_outside_prefix() {
        let mut registry = registry_with(&[
            ("/site/templates/site.toml", "manifest"),
            ("/site/templates/posts/one.md", "one"),
            ("/site/shared/base.css", "base"),
        ]);

        registry.invalidate_below(Path::new("/site/templates"));

        assert!(!registry.contains(Path::new("/site/templates/site.toml")));
        assert_eq!(
            registry.get(Path::new("/site/shared/base.css")),
            Some(&"base".to_string())
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_or_try_insert_caches_first_load() {
        let mut registry: ModuleRegistry<String> = ModuleRegistry::new();
        let key = Path::new("/site/templates/index.md");

        let loaded = registry
            .get_or_try_insert(key, |_| Ok::<_, ()>("first".to_string()))
            .expect("load");
        assert_eq!(loaded, "first");

        // Second lookup hits the cache; the loader must not run.
        let cached = registry
            .get_or_try_insert(key, |_| -> Result<String, ()> {
                panic!("loader ran on cache hit")
            })
            .expect("cached");
        assert_eq!(cached, "first");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_or_try_insert_propagates_load_errors() {
        let mut registry: ModuleRegistry<String> = ModuleRegistry::new();
        let key = Path::new("/site/templates/broken.md");

        let result = registry.get_or_try_insert(key, |_| Err("boom"));
        assert_eq!(result, Err("boom"));
        assert!(!registry.contains(key));
    }
}
