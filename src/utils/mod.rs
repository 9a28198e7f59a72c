//! Various unsorted utility types shared across the crate.

pub use self::fx_hasher::FxHasher64;
pub use self::sorted_pair::SortedPair;

mod fx_hasher;
pub mod hashmap;
pub mod hashset;
mod sorted_pair;
