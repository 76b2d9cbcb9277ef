//! The bidirectional cursor protocol.

use crate::error::CursorResult;
use std::cmp::Ordering;
use std::sync::Arc;

/// A total-order comparator over `T`.
///
/// Cursors and tables that support sorted positioning take one of these at
/// construction. Use [`natural`] for types that are already `Ord`.
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Returns the natural-order comparator for an `Ord` type.
#[must_use]
pub fn natural<T: Ord>() -> Comparator<T> {
    Arc::new(|a: &T, b: &T| a.cmp(b))
}

/// A bidirectional, stateful traversal handle over an ordered data set.
///
/// A cursor is in exactly one of these positions: just-opened, before-first,
/// after-last, on an element, or closed. Positioning calls and single steps
/// are the only transitions. `get` is valid only while on an element.
///
/// # Stepping contract
///
/// - From just-opened or before-first, `next` moves to the first element.
/// - From just-opened or after-last, `previous` moves to the last element.
/// - Stepping past either boundary returns `false` and parks the cursor
///   just beyond it; the cursor remains steppable back the other way.
/// - `next` immediately followed by `previous` (when both succeed) returns
///   the cursor to the element it was on before the `next`.
///
/// # Element borrowing
///
/// `get` borrows the current element until the next `&mut self` call. An
/// implementation may reuse one record buffer across advances, so a caller
/// that needs to retain a value across an advance must take it via
/// [`Cursor::get_owned`] first. The borrow checker enforces this.
///
/// # Threading
///
/// A cursor is confined to a single logical traversal. All stepping takes
/// `&mut self`; independent cursors over the same table may run
/// concurrently.
pub trait Cursor {
    /// The element type produced by this cursor.
    type Item;

    /// Positions the cursor so the next `next()` lands on the first element
    /// not less than `element`, which need not exist in the data set.
    ///
    /// # Errors
    ///
    /// Fails with `Unsupported` if no comparator was supplied, and with
    /// `Closed` if the cursor was closed.
    fn before(&mut self, element: &Self::Item) -> CursorResult<()>;

    /// Positions the cursor so the next `next()` lands on the first element
    /// greater than `element`, which need not exist in the data set.
    ///
    /// # Errors
    ///
    /// Fails with `Unsupported` if no comparator was supplied, and with
    /// `Closed` if the cursor was closed.
    fn after(&mut self, element: &Self::Item) -> CursorResult<()>;

    /// Repositions before the first element. Idempotent.
    fn before_first(&mut self) -> CursorResult<()>;

    /// Repositions after the last element. Idempotent.
    fn after_last(&mut self) -> CursorResult<()>;

    /// Positions on the first element if one exists.
    ///
    /// Returns `false` (leaving the cursor parked before-first) when the
    /// data set is empty.
    fn first(&mut self) -> CursorResult<bool>;

    /// Positions on the last element if one exists.
    ///
    /// Returns `false` (leaving the cursor parked after-last) when the
    /// data set is empty.
    fn last(&mut self) -> CursorResult<bool>;

    /// Advances to the next element, returning whether one was reached.
    fn next(&mut self) -> CursorResult<bool>;

    /// Steps back to the previous element, returning whether one was reached.
    fn previous(&mut self) -> CursorResult<bool>;

    /// Returns true iff `get` would currently succeed.
    fn available(&self) -> bool;

    /// Returns the element at the current position.
    ///
    /// The borrow is valid until the next `&mut self` call; the backing
    /// record may be reused by the following advance.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidPosition` when not positioned on an element.
    fn get(&self) -> CursorResult<&Self::Item>;

    /// Returns an owned copy of the current element.
    ///
    /// Use this to retain a value across a subsequent advance.
    fn get_owned(&self) -> CursorResult<Self::Item>
    where
        Self::Item: Clone,
    {
        self.get().cloned()
    }

    /// Whether this cursor can seek relative to an arbitrary key.
    ///
    /// Browser-backed cursors over minimal engines may not implement
    /// `before`/`after`; callers can branch here instead of catching the
    /// `Unsupported` error.
    fn supports_seek(&self) -> bool {
        false
    }

    /// Returns true once the cursor has been closed.
    fn is_closed(&self) -> bool;

    /// Releases the cursor's resources. Idempotent.
    fn close(&mut self) -> CursorResult<()>;

    /// Releases the cursor's resources, recording `cause` for any later
    /// access attempt. Idempotent; the first recorded cause is kept.
    fn close_with_cause(&mut self, cause: &str) -> CursorResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_orders_like_ord() {
        let cmp = natural::<i32>();
        assert_eq!(cmp(&1, &2), Ordering::Less);
        assert_eq!(cmp(&2, &2), Ordering::Equal);
        assert_eq!(cmp(&3, &2), Ordering::Greater);
    }
}
