//! # Reactive Primitives
//!
//! Version-tracked inputs and a memo cache keyed on the versions it read.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   Versioned<query>  v3 ──┐                                              │
//! │   Versioned<filter> v1 ──┼──► key (3, 1, 7) ──► Memo ──► Arc<[R]>       │
//! │   Versioned<items>  v7 ──┘         │                                    │
//! │                                    └── same key as last time?           │
//! │                                        yes → return cached Arc          │
//! │                                        no  → recompute, store, return   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Setting a value equal to the current one does not bump the version, so
//! nothing downstream recomputes.

/// A value plus a counter bumped on every effective change.
#[derive(Debug, Clone, Default)]
pub struct Versioned<T> {
    value: T,
    version: u64,
}

impl<T> Versioned<T> {
    pub fn new(value: T) -> Self {
        Versioned { value, version: 0 }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Mutates in place and always bumps the version.
    pub fn modify<U>(&mut self, f: impl FnOnce(&mut T) -> U) -> U {
        let out = f(&mut self.value);
        self.version += 1;
        out
    }
}

impl<T: PartialEq> Versioned<T> {
    /// Replaces the value. Returns false, leaving the version alone, when
    /// the new value equals the current one.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.version += 1;
        true
    }
}

/// Single-entry cache: remembers the last key and the value computed for it.
#[derive(Debug)]
pub struct Memo<K, V> {
    cached: Option<(K, V)>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Memo { cached: None }
    }
}

impl<K: PartialEq, V: Clone> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value if `key` matches, else computes and caches.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some((cached_key, value)) = &self.cached {
            if *cached_key == key {
                return value.clone();
            }
        }
        let value = compute();
        self.cached = Some((key, value.clone()));
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_equal_set_is_noop() {
        let mut v = Versioned::new(String::from("a"));
        assert!(!v.set("a".to_string()));
        assert_eq!(v.version(), 0);
        assert!(v.set("b".to_string()));
        assert_eq!(v.version(), 1);
        assert_eq!(v.get(), "b");
    }

    #[test]
    fn test_modify_always_bumps() {
        let mut v = Versioned::new(vec![1]);
        v.modify(|items| items.push(2));
        assert_eq!(v.version(), 1);
        assert_eq!(v.get(), &vec![1, 2]);
    }

    #[test]
    fn test_memo_reuses_value_for_same_key() {
        let mut memo: Memo<u64, Arc<[i32]>> = Memo::new();
        let a = memo.get_or_compute(1, || Arc::from(vec![1, 2]));
        let b = memo.get_or_compute(1, || Arc::from(vec![9]));
        assert!(Arc::ptr_eq(&a, &b));

        let c = memo.get_or_compute(2, || Arc::from(vec![1, 2]));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_memo_computes_once_per_key() {
        let mut runs = 0;
        let mut memo: Memo<(u64, u64), usize> = Memo::new();
        for _ in 0..3 {
            memo.get_or_compute((1, 1), || {
                runs += 1;
                7
            });
        }
        assert_eq!(runs, 1);

        let value = memo.get_or_compute((2, 1), || {
            runs += 1;
            8
        });
        assert_eq!((value, runs), (8, 2));
    }
}
