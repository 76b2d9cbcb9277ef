//! The browser seam between tables and a sorted-storage engine.
//!
//! A browser is the minimal positioning primitive an underlying sorted
//! storage engine must expose: park before-first, after-last, or relative
//! to a key, and step one element at a time in either direction. Tables
//! interpret everything above that; the engine stays an opaque byte- or
//! page-oriented store.

use crate::tuple::Tuple;
use dirstore_cursor::{CursorError, CursorResult};
use std::sync::Arc;

/// Single-step access to an engine's sorted key/value pairs.
///
/// # Invariants
///
/// - Step semantics are on-element: after a successful `next`, an immediate
///   `previous` returns the same element the browser was on before the
///   `next` (and vice versa). Gap-style stepping breaks the cursor
///   symmetry property and must be adapted before implementing this trait.
/// - A step past either boundary returns `false`, parks just beyond it, and
///   leaves the browser steppable back the other way.
/// - Key seeks are optional. An engine that cannot position relative to an
///   arbitrary key keeps the `Unsupported` defaults and reports
///   `supports_seek() == false`; it must never silently mis-position.
pub trait Browser<K, V>: Send {
    /// Parks the browser before the first pair.
    fn before_first(&mut self) -> CursorResult<()>;

    /// Parks the browser after the last pair.
    fn after_last(&mut self) -> CursorResult<()>;

    /// Parks the browser so the next `next` lands on the first pair whose
    /// key is not less than `key`. The key need not exist.
    fn before_key(&mut self, key: &K) -> CursorResult<()> {
        let _ = key;
        Err(CursorError::Unsupported {
            operation: "before_key",
        })
    }

    /// Parks the browser so the next `next` lands on the first pair whose
    /// key is greater than `key`. The key need not exist.
    fn after_key(&mut self, key: &K) -> CursorResult<()> {
        let _ = key;
        Err(CursorError::Unsupported {
            operation: "after_key",
        })
    }

    /// Whether `before_key`/`after_key` are implemented.
    fn supports_seek(&self) -> bool {
        false
    }

    /// Steps forward, filling `tuple` with the reached pair.
    ///
    /// Returns `false` when there is no next pair; `tuple` is left
    /// untouched in that case.
    fn next(&mut self, tuple: &mut Option<Tuple<K, V>>) -> CursorResult<bool>;

    /// Steps backward, filling `tuple` with the reached pair.
    ///
    /// Returns `false` when there is no previous pair; `tuple` is left
    /// untouched in that case.
    fn previous(&mut self, tuple: &mut Option<Tuple<K, V>>) -> CursorResult<bool>;
}

/// Creates browsers over one table's sorted pairs.
///
/// This is the narrow interface a partition backend must supply: the pair
/// count plus browser creation; all positioning happens on the [`Browser`].
pub trait BrowserFactory<K, V> {
    /// Number of pairs visible to browsers from this factory.
    fn count(&self) -> CursorResult<usize>;

    /// Creates a browser parked before the first pair.
    fn browser(&self) -> CursorResult<Box<dyn Browser<K, V>>>;
}

/// A browser factory over a sorted in-memory snapshot.
///
/// Used by the in-memory table and by tests. Browsers share the snapshot
/// through an `Arc`; mutations to the originating table after the snapshot
/// was taken are not visible to them.
pub struct MemBrowserFactory<K, V> {
    pairs: Arc<Vec<(K, V)>>,
}

impl<K, V> MemBrowserFactory<K, V> {
    /// Creates a factory over pairs already sorted by key.
    #[must_use]
    pub fn new(pairs: Vec<(K, V)>) -> Self {
        Self {
            pairs: Arc::new(pairs),
        }
    }
}

impl<K, V> BrowserFactory<K, V> for MemBrowserFactory<K, V>
where
    K: Ord + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn count(&self) -> CursorResult<usize> {
        Ok(self.pairs.len())
    }

    fn browser(&self) -> CursorResult<Box<dyn Browser<K, V>>> {
        Ok(Box::new(MemBrowser {
            pairs: Arc::clone(&self.pairs),
            pos: -1,
            between: false,
        }))
    }
}

/// Browser over a shared sorted snapshot.
///
/// Position is a single integer: `-1` before-first, `len` after-last,
/// otherwise on the pair at that index. `between` marks the seek-created
/// gap just after `pos`.
struct MemBrowser<K, V> {
    pairs: Arc<Vec<(K, V)>>,
    pos: isize,
    between: bool,
}

impl<K: Clone, V: Clone> MemBrowser<K, V> {
    fn len(&self) -> isize {
        self.pairs.len() as isize
    }

    fn fill(&self, tuple: &mut Option<Tuple<K, V>>) {
        let (key, value) = &self.pairs[self.pos as usize];
        match tuple {
            Some(t) => t.set(key.clone(), value.clone()),
            None => *tuple = Some(Tuple::new(key.clone(), value.clone())),
        }
    }

    fn park_at_gap(&mut self, insertion: usize) {
        self.between = false;
        if insertion == 0 {
            self.pos = -1;
        } else if insertion as isize == self.len() {
            self.pos = self.len();
        } else {
            self.pos = insertion as isize - 1;
            self.between = true;
        }
    }
}

impl<K, V> Browser<K, V> for MemBrowser<K, V>
where
    K: Ord + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn before_first(&mut self) -> CursorResult<()> {
        self.pos = -1;
        self.between = false;
        Ok(())
    }

    fn after_last(&mut self) -> CursorResult<()> {
        self.pos = self.len();
        self.between = false;
        Ok(())
    }

    fn before_key(&mut self, key: &K) -> CursorResult<()> {
        let insertion = self.pairs.partition_point(|(k, _)| k < key);
        self.park_at_gap(insertion);
        Ok(())
    }

    fn after_key(&mut self, key: &K) -> CursorResult<()> {
        let insertion = self.pairs.partition_point(|(k, _)| k <= key);
        self.park_at_gap(insertion);
        Ok(())
    }

    fn supports_seek(&self) -> bool {
        true
    }

    fn next(&mut self, tuple: &mut Option<Tuple<K, V>>) -> CursorResult<bool> {
        self.between = false;
        if self.pos + 1 < self.len() {
            self.pos += 1;
            self.fill(tuple);
            return Ok(true);
        }
        self.pos = self.len();
        Ok(false)
    }

    fn previous(&mut self, tuple: &mut Option<Tuple<K, V>>) -> CursorResult<bool> {
        if self.between {
            // the pair just below the seek gap is at `pos`
            self.between = false;
            if self.pos >= 0 {
                self.fill(tuple);
                return Ok(true);
            }
            self.pos = -1;
            return Ok(false);
        }
        if self.pos >= self.len() {
            if self.pairs.is_empty() {
                self.pos = -1;
                return Ok(false);
            }
            self.pos = self.len() - 1;
            self.fill(tuple);
            return Ok(true);
        }
        if self.pos > 0 {
            self.pos -= 1;
            self.fill(tuple);
            return Ok(true);
        }
        self.pos = -1;
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> MemBrowserFactory<u32, char> {
        MemBrowserFactory::new(vec![(1, 'a'), (3, 'b'), (5, 'c')])
    }

    #[test]
    fn browser_walks_forward_and_back() {
        let factory = factory();
        assert_eq!(factory.count().unwrap(), 3);

        let mut browser = factory.browser().unwrap();
        let mut tuple = None;

        assert!(browser.next(&mut tuple).unwrap());
        assert_eq!(*tuple.as_ref().unwrap().key(), 1);
        assert!(browser.next(&mut tuple).unwrap());
        assert!(browser.next(&mut tuple).unwrap());
        assert_eq!(*tuple.as_ref().unwrap().value(), 'c');

        assert!(!browser.next(&mut tuple).unwrap());
        // parked after-last; stepping back yields the last pair again
        assert!(browser.previous(&mut tuple).unwrap());
        assert_eq!(*tuple.as_ref().unwrap().key(), 5);
    }

    #[test]
    fn browser_steps_are_symmetric() {
        let factory = factory();
        let mut browser = factory.browser().unwrap();
        let mut tuple = None;

        assert!(browser.next(&mut tuple).unwrap());
        assert!(browser.next(&mut tuple).unwrap());
        assert_eq!(*tuple.as_ref().unwrap().key(), 3);

        assert!(browser.next(&mut tuple).unwrap());
        assert!(browser.previous(&mut tuple).unwrap());
        assert_eq!(*tuple.as_ref().unwrap().key(), 3);
    }

    #[test]
    fn browser_before_key_on_absent_key() {
        let factory = factory();
        let mut browser = factory.browser().unwrap();
        let mut tuple = None;

        browser.before_key(&4).unwrap();
        assert!(browser.next(&mut tuple).unwrap());
        assert_eq!(*tuple.as_ref().unwrap().key(), 5);

        browser.before_key(&4).unwrap();
        assert!(browser.previous(&mut tuple).unwrap());
        assert_eq!(*tuple.as_ref().unwrap().key(), 3);
    }

    #[test]
    fn browser_after_key_skips_equal_keys() {
        let factory = factory();
        let mut browser = factory.browser().unwrap();
        let mut tuple = None;

        browser.after_key(&3).unwrap();
        assert!(browser.next(&mut tuple).unwrap());
        assert_eq!(*tuple.as_ref().unwrap().key(), 5);

        browser.after_key(&3).unwrap();
        assert!(browser.previous(&mut tuple).unwrap());
        assert_eq!(*tuple.as_ref().unwrap().key(), 3);
    }

    #[test]
    fn browser_over_empty_snapshot() {
        let factory: MemBrowserFactory<u32, char> = MemBrowserFactory::new(Vec::new());
        let mut browser = factory.browser().unwrap();
        let mut tuple = None;

        assert!(!browser.next(&mut tuple).unwrap());
        assert!(!browser.previous(&mut tuple).unwrap());
        assert!(tuple.is_none());
    }

    #[test]
    fn seek_defaults_fail_loudly() {
        // a minimal engine that cannot seek
        struct Minimal;
        impl Browser<u32, char> for Minimal {
            fn before_first(&mut self) -> CursorResult<()> {
                Ok(())
            }
            fn after_last(&mut self) -> CursorResult<()> {
                Ok(())
            }
            fn next(&mut self, _: &mut Option<Tuple<u32, char>>) -> CursorResult<bool> {
                Ok(false)
            }
            fn previous(&mut self, _: &mut Option<Tuple<u32, char>>) -> CursorResult<bool> {
                Ok(false)
            }
        }

        let mut minimal = Minimal;
        assert!(!minimal.supports_seek());
        assert!(matches!(
            minimal.before_key(&1),
            Err(CursorError::Unsupported { .. })
        ));
        assert!(matches!(
            minimal.after_key(&1),
            Err(CursorError::Unsupported { .. })
        ));
    }
}
