//! # DirStore Cursor
//!
//! Bidirectional cursor protocol for DirStore.
//!
//! This crate provides the traversal contract every higher layer of the
//! directory store (search evaluation, replication consumers, partition
//! backends) depends on:
//!
//! - [`Cursor`] - the bidirectional traversal trait
//! - [`ClosureMonitor`] - open/closed lifecycle tracking with a failure cause
//! - [`EmptyCursor`], [`SingletonCursor`], [`ListCursor`] - in-memory cursors
//!   implementing the exact boundary algebra
//!
//! ## Design Principles
//!
//! - A cursor is confined to a single logical traversal; stepping takes
//!   `&mut self` and cursors are not `Sync`
//! - `get()` borrows the current element until the next advance; callers
//!   that need to retain a value across an advance use `get_owned()`
//! - Closing is one-way and idempotent, and every later access reports the
//!   original close cause
//!
//! ## Example
//!
//! ```rust
//! use dirstore_cursor::{Cursor, ListCursor};
//!
//! let mut cursor = ListCursor::new(vec!['a', 'b', 'c']).unwrap();
//! assert!(cursor.next().unwrap());
//! assert_eq!(*cursor.get().unwrap(), 'a');
//! assert!(cursor.last().unwrap());
//! assert_eq!(*cursor.get().unwrap(), 'c');
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cursor;
mod empty;
mod error;
mod list;
mod monitor;
mod singleton;

pub use cursor::{natural, Comparator, Cursor};
pub use empty::EmptyCursor;
pub use error::{CursorError, CursorResult};
pub use list::ListCursor;
pub use monitor::ClosureMonitor;
pub use singleton::SingletonCursor;
