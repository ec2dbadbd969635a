use std::collections::HashMap;

use super::Handle;

/// Append-only store handing out typed handles. Entries may also be
/// reachable by name; a later named insert rebinds the name.
pub struct AssetCache<T> {
    items: Vec<T>,
    names: HashMap<String, Handle<T>>,
}

impl<T> AssetCache<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            names: HashMap::new(),
        }
    }

    pub fn insert(&mut self, item: T) -> Handle<T> {
        let index = self.items.len();
        self.items.push(item);
        Handle::new(index)
    }

    pub fn insert_named(&mut self, name: &str, item: T) -> Handle<T> {
        let handle = self.insert(item);
        if let Some(previous) = self.names.insert(name.to_string(), handle) {
            log::debug!("'{}' rebound from {:?} to {:?}", name, previous, handle);
        }
        handle
    }

    pub fn find(&self, name: &str) -> Option<Handle<T>> {
        self.names.get(name).copied()
    }

    pub fn contains(&self, handle: Handle<T>) -> bool {
        handle.index() < self.items.len()
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.items.get(handle.index())
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.items.get_mut(handle.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (Handle::new(i), item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
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
    fn insert_returns_sequential_handles() {
        let mut cache = AssetCache::new();
        let a = cache.insert("a");
        let b = cache.insert("b");
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(cache.get(b), Some(&"b"));
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(Handle::new(9)));
        assert!(cache.get(Handle::new(9)).is_none());
    }

    #[test]
    fn names_resolve_to_latest_insert() {
        let mut cache = AssetCache::new();
        assert_eq!(cache.find("solid"), None);
        let first = cache.insert_named("solid", 1);
        assert_eq!(cache.find("solid"), Some(first));

        let second = cache.insert_named("solid", 2);
        assert_eq!(cache.find("solid"), Some(second));
        assert_eq!(cache.get(first), Some(&1));
        assert_eq!(
            cache.iter().map(|(h, v)| (h.index(), *v)).collect::<Vec<_>>(),
            vec![(0, 1), (1, 2)]
        );
    }
}
