//! Cursors backed by browsers and duplicate-value arrays.

mod key;
mod values;

pub use key::BrowserCursor;
pub use values::KeyValuesCursor;
