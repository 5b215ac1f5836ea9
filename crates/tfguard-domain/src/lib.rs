//! Pure schema coverage evaluation (no IO).
//!
//! Input: raw configuration bodies and a decoded provider schema, both produced elsewhere.
//! Output: findings + verdict + summary data.

#![forbid(unsafe_code)]

pub mod build;
pub mod model;
pub mod policy;
pub mod report;
pub mod schema;
pub mod validate;

mod engine;
mod fingerprint;

pub use build::{build_tree, merge};
pub use engine::evaluate;
pub use fingerprint::fingerprint_for_gap;
pub use validate::{validate, validate_resource};

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;
