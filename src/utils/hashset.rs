//! A hash-set that behaves deterministically when the
//! `enhanced-determinism` feature is enabled.

/// Deterministic hashset using [`indexmap::IndexSet`]
#[cfg(feature = "enhanced-determinism")]
pub type FxHashSet64<K> =
    indexmap::IndexSet<K, core::hash::BuildHasherDefault<super::fx_hasher::FxHasher64>>;
#[cfg(feature = "enhanced-determinism")]
pub use self::FxHashSet64 as HashSet;

/// Hashset using [`hashbrown::HashSet`]
#[cfg(not(feature = "enhanced-determinism"))]
pub type HashSet<K> = hashbrown::HashSet<K>;
