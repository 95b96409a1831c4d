//! Standard collection type aliases for Strata.
//!
//! Use these instead of direct HashMap/HashSet to keep hashing consistent
//! across the codebase and leave room for future swaps.

use rustc_hash::FxBuildHasher;

/// Standard HashMap with FxHash (fast, non-cryptographic).
///
/// FxHash is optimized for the small integer and string keys this engine
/// uses everywhere: chunk ids, column names, pos-list pointers.
pub type StrataMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// Standard HashSet with FxHash.
pub type StrataSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

/// Create a new empty [`StrataMap`].
#[inline]
#[must_use]
pub fn strata_map<K, V>() -> StrataMap<K, V> {
    StrataMap::with_hasher(FxBuildHasher)
}

/// Create a new [`StrataMap`] with the specified capacity.
#[inline]
#[must_use]
pub fn strata_map_with_capacity<K, V>(capacity: usize) -> StrataMap<K, V> {
    StrataMap::with_capacity_and_hasher(capacity, FxBuildHasher)
}

/// Create a new empty [`StrataSet`].
#[inline]
#[must_use]
pub fn strata_set<T>() -> StrataSet<T> {
    StrataSet::with_hasher(FxBuildHasher)
}

/// Create a new [`StrataSet`] with the specified capacity.
#[inline]
#[must_use]
pub fn strata_set_with_capacity<T>(capacity: usize) -> StrataSet<T> {
    StrataSet::with_capacity_and_hasher(capacity, FxBuildHasher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strata_map() {
        let mut map = strata_map::<String, i32>();
        map.insert("key".to_string(), 42);
        assert_eq!(map.get("key"), Some(&42));
    }

    #[test]
    fn test_strata_set() {
        let mut set = strata_set_with_capacity::<u32>(4);
        set.insert(1);
        assert!(set.contains(&1));
        assert!(!set.contains(&2));
    }
}
