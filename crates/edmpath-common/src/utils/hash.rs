//! Hash map aliases used for name lookups.
//!
//! Lookup tables are never iterated in an order-sensitive way, so they use
//! `ahash` for speed. Ordered collections use `indexmap` instead.

/// A `HashMap` using ahash.
pub type FastHashMap<K, V> = hashbrown::HashMap<K, V, ahash::RandomState>;

/// A `HashSet` using ahash.
pub type FastHashSet<T> = hashbrown::HashSet<T, ahash::RandomState>;
