//! Shared test utilities for the EDR client workspace.
//!
//! This crate provides JSON fixtures shaped like real EDR server responses:
//! - Location features and feature pages with `next` links
//! - Point-series coverages and coverage collections
//! - Collection metadata with temporal extents
//! - Multi-page scripts for walking paged queries
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, paged_locations};
//! ```

pub mod fixtures;
pub mod pages;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use pages::*;
pub use serde_json;

/// Macro asserting the `id` members of a list of JSON features.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_feature_ids;
///
/// assert_feature_ids!(page["features"], [1, 2, "KJFK"]);
/// ```
#[macro_export]
macro_rules! assert_feature_ids {
    ($features:expr, [$($id:expr),* $(,)?]) => {{
        let actual: Vec<$crate::serde_json::Value> = $features
            .as_array()
            .expect("features must be an array")
            .iter()
            .map(|f| f["id"].clone())
            .collect();
        let expected: Vec<$crate::serde_json::Value> = vec![$($crate::serde_json::json!($id)),*];
        assert_eq!(actual, expected, "feature ids differ");
    }};
}
