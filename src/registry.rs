//! Concurrency-safe keyed entity store.
//!
//! A [`Registry`] is the shared primitive behind the icon, fence and layout
//! collections. Entries live in a sharded [`DashMap`], so operations on
//! distinct keys proceed without contending on one lock, and each operation on
//! a single key completes in one locked step (readers always see a whole value).

use std::fmt::Display;
use std::hash::Hash;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{EngineError, EngineResult, EntityKind};

/// Keyed CRUD store for one entity kind.
#[derive(Debug)]
pub struct Registry<K, V>
where
    K: Eq + Hash,
{
    kind: EntityKind,
    entries: DashMap<K, V>,
}

impl<K, V> Registry<K, V>
where
    K: Eq + Hash + Clone + Display,
    V: Clone,
{
    /// Creates an empty registry for the given entity kind.
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            entries: DashMap::new(),
        }
    }

    /// Entity kind reported in errors.
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Inserts a new entity.
    ///
    /// Fails with `DuplicateKey` if the key exists; the existing value is left untouched.
    pub fn add(&self, key: K, value: V) -> EngineResult<()> {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => Err(EngineError::duplicate(self.kind, entry.key())),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(())
            }
        }
    }

    /// Returns a copy of the entity stored under `key`.
    pub fn get(&self, key: &K) -> EngineResult<V> {
        self.entries
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| self.not_found(key))
    }

    /// Replaces the entity stored under `key` as a whole.
    pub fn update(&self, key: &K, value: V) -> EngineResult<()> {
        match self.entries.get_mut(key) {
            Some(mut entry) => {
                *entry = value;
                Ok(())
            }
            None => Err(self.not_found(key)),
        }
    }

    /// Applies `f` to the stored entity while holding its entry lock.
    ///
    /// `f` must not call back into this registry.
    pub fn modify<R>(&self, key: &K, f: impl FnOnce(&mut V) -> R) -> EngineResult<R> {
        match self.entries.get_mut(key) {
            Some(mut entry) => Ok(f(entry.value_mut())),
            None => Err(self.not_found(key)),
        }
    }

    /// Deletes the entity stored under `key` and returns it.
    pub fn remove(&self, key: &K) -> EngineResult<V> {
        self.entries
            .remove(key)
            .map(|(_, value)| value)
            .ok_or_else(|| self.not_found(key))
    }

    /// Returns true if an entity is stored under `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of stored entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the registry holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Point-in-time copy of every stored entity.
    ///
    /// The returned vector is detached from the registry: later writes are not
    /// reflected, and it can be iterated any number of times.
    pub fn list_all(&self) -> Vec<V> {
        self.entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Point-in-time copy of every stored key.
    pub fn keys(&self) -> Vec<K> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Removes every entity.
    pub fn clear(&self) {
        self.entries.clear();
    }

    fn not_found(&self, key: &K) -> EngineError {
        EngineError::not_found(self.kind, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn registry() -> Registry<String, u32> {
        Registry::new(EntityKind::Icon)
    }

    #[test]
    fn test_add_and_get() {
        let reg = registry();
        reg.add("a".to_string(), 1).unwrap();
        assert_eq!(reg.get(&"a".to_string()).unwrap(), 1);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_add_duplicate_keeps_existing() {
        let reg = registry();
        reg.add("a".to_string(), 1).unwrap();

        let err = reg.add("a".to_string(), 2).unwrap_err();
        assert_eq!(err, EngineError::duplicate(EntityKind::Icon, "a"));
        assert_eq!(reg.get(&"a".to_string()).unwrap(), 1);
    }

    #[test]
    fn test_missing_key_operations() {
        let reg = registry();
        let key = "missing".to_string();
        assert!(reg.get(&key).unwrap_err().is_not_found());
        assert!(reg.update(&key, 3).unwrap_err().is_not_found());
        assert!(reg.remove(&key).unwrap_err().is_not_found());
        assert!(reg.modify(&key, |v| *v += 1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_and_remove() {
        let reg = registry();
        let key = "a".to_string();
        reg.add(key.clone(), 1).unwrap();
        reg.update(&key, 5).unwrap();
        assert_eq!(reg.get(&key).unwrap(), 5);

        assert_eq!(reg.remove(&key).unwrap(), 5);
        assert!(!reg.contains(&key));
        assert!(reg.is_empty());
    }

    #[test]
    fn test_list_all_is_a_snapshot() {
        let reg = registry();
        reg.add("a".to_string(), 1).unwrap();
        reg.add("b".to_string(), 2).unwrap();

        let snapshot = reg.list_all();
        reg.add("c".to_string(), 3).unwrap();
        reg.clear();

        let mut values = snapshot.clone();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2]);
        // Iterating again yields the same values
        assert_eq!(snapshot.iter().sum::<u32>(), 3);
    }

    #[test]
    fn test_concurrent_modify_same_key_loses_nothing() {
        let reg = Arc::new(registry());
        let key = "counter".to_string();
        reg.add(key.clone(), 0).unwrap();

        thread::scope(|scope| {
            for _ in 0..8 {
                let reg = Arc::clone(&reg);
                let key = key.clone();
                scope.spawn(move || {
                    for _ in 0..100 {
                        reg.modify(&key, |v| *v += 1).unwrap();
                    }
                });
            }
        });

        assert_eq!(reg.get(&key).unwrap(), 800);
    }

    #[test]
    fn test_concurrent_adds_distinct_keys() {
        let reg = Arc::new(registry());

        thread::scope(|scope| {
            for t in 0..4u32 {
                let reg = Arc::clone(&reg);
                scope.spawn(move || {
                    for i in 0..50u32 {
                        reg.add(format!("{t}-{i}"), i).unwrap();
                    }
                });
            }
        });

        assert_eq!(reg.len(), 200);
    }
}
