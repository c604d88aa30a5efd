//! Owned mapping from a platform widget handle to its view controller.
//!
//! Platform callbacks only carry the handle of the widget they fired on;
//! the controller is looked up here on every callback.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::{debug, warn};

#[derive(Debug)]
pub struct ViewRegistry<K, V> {
    views: HashMap<K, V>,
}

impl<K, V> Default for ViewRegistry<K, V> {
    fn default() -> Self {
        Self {
            views: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + std::fmt::Debug, V> ViewRegistry<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `view` to `handle`, returning the controller it replaced.
    pub fn register(&mut self, handle: K, view: V) -> Option<V> {
        debug!(?handle, "View registered");
        let previous = self.views.insert(handle, view);
        if previous.is_some() {
            warn!("Handle was already bound to a view, replaced");
        }
        previous
    }

    pub fn get(&self, handle: &K) -> Option<&V> {
        self.views.get(handle)
    }

    pub fn get_mut(&mut self, handle: &K) -> Option<&mut V> {
        self.views.get_mut(handle)
    }

    pub fn remove(&mut self, handle: &K) -> Option<V> {
        let view = self.views.remove(handle);
        if view.is_some() {
            debug!(?handle, "View unregistered");
        }
        view
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ViewRegistry::new();
        assert!(registry.register(1u64, "first").is_none());
        registry.register(2, "second");
        assert_eq!(registry.get(&1), Some(&"first"));
        assert_eq!(registry.get(&2), Some(&"second"));
        assert_eq!(registry.get(&3), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = ViewRegistry::new();
        registry.register("win", 1);
        assert_eq!(registry.register("win", 2), Some(1));
        assert_eq!(registry.get(&"win"), Some(&2));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_mut_and_remove() {
        let mut registry = ViewRegistry::new();
        registry.register(7u32, vec![1]);
        registry.get_mut(&7).unwrap().push(2);
        assert_eq!(registry.remove(&7), Some(vec![1, 2]));
        assert!(registry.remove(&7).is_none());
        assert!(registry.is_empty());
    }
}
