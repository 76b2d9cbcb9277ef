//! # DirStore Testkit
//!
//! Test utilities for DirStore.
//!
//! This crate provides:
//! - Canned tables, indexes and cursor data
//! - Property-based walk generators using proptest
//! - A master-plus-index harness for cross-crate integration tests
//!
//! ## Usage
//!
//! ```rust
//! use dirstore_testkit::prelude::*;
//! use dirstore_core::Table;
//!
//! let table = people_table();
//! assert_eq!(table.count().unwrap(), 4);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
