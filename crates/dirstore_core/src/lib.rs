//! # DirStore Core
//!
//! Storage abstractions for DirStore partitions.
//!
//! This crate provides:
//! - [`Table`] - the key/value mapping contract, with duplicate-key support
//! - [`MasterTable`] - the primary entry table with id sequencing and
//!   administrative properties
//! - [`Index`] - two-direction secondary indexes with regex scanning
//! - [`Browser`] / [`BrowserCursor`] - the seam between sorted storage and
//!   the cursor protocol
//! - [`IndexEnumeration`] - a pull-style adapter for legacy consumers
//!
//! Everything a caller traverses comes back as a [`dirstore_cursor::Cursor`];
//! tables and indexes never materialize whole result sets eagerly.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod browser;
mod cursor;
mod enumeration;
mod error;
mod index;
mod master;
mod table;
mod tuple;

pub use browser::{Browser, BrowserFactory, MemBrowserFactory};
pub use cursor::{BrowserCursor, KeyValuesCursor};
pub use enumeration::IndexEnumeration;
pub use error::{StoreError, StoreResult};
pub use index::{
    Attribute, Index, IndexConfig, IndexRecord, IndexValue, MemIndex, Normalizer, RegexCursor,
    DEFAULT_INDEX_CACHE_SIZE,
};
pub use master::{EntryId, MasterTable, MemMasterTable, SEQUENCE_PROPERTY};
pub use table::{Direction, MemTable, Renderer, Table, TableConfig};
pub use tuple::Tuple;
