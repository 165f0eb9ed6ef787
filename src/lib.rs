//! A constraint-propagation-and-search engine with explanation-based,
//! conflict-directed backjumping.
//!
//! The engine maintains variable domains (integer, set, directed graph),
//! narrows them through pluggable propagators until a fixpoint, explores a
//! decision tree when propagation alone cannot decide a variable, and recovers
//! from failures by jumping back to the deepest decision implicated by the
//! failure's explanation.

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
pub mod basic_types;
pub mod engine;
pub mod propagators;
pub(crate) mod quince_asserts;
