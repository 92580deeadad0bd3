//! Pure normalization over fetched results: deduplication, grouping and
//! canonical record ordering. Nothing here performs I/O.

pub mod canonical;
pub mod dedup;
pub mod grouping;

pub use canonical::{canonical_string, canonicalize, Record};
pub use dedup::{unique_by, HasProperties};
pub use grouping::{group_by_collection, group_by_layer, group_locations, GroupingKey, LocationGroups};
