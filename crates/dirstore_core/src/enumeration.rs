//! Pull-style enumeration adapter over index scans.

use crate::error::{StoreError, StoreResult};
use crate::index::{IndexRecord, IndexValue};
use crate::master::EntryId;
use crate::tuple::Tuple;
use dirstore_cursor::Cursor;
use regex::Regex;

/// The wrapped scan, in either tuple orientation.
enum Source<V> {
    /// Forward index tuples: indexed value to entry id.
    Forward(Box<dyn Cursor<Item = Tuple<V, EntryId>>>),
    /// Reverse index tuples: entry id to indexed value.
    Reverse(Box<dyn Cursor<Item = Tuple<EntryId, V>>>),
}

/// A pull-style view of an index scan for callers that consume records
/// through `has_more`/`next_record` instead of driving a cursor.
///
/// Prefetch is strictly one-ahead: the underlying scan is advanced only
/// when a call needs the answer, so wrapping a scan costs nothing until
/// the first `has_more`. An optional regex filter drops records whose
/// rendered value does not match.
///
/// Either tuple orientation can be wrapped; the adapter swaps key and
/// value roles as needed so consumers always see [`IndexRecord`]s.
pub struct IndexEnumeration<V> {
    source: Source<V>,
    filter: Option<Regex>,
    prefetched: Option<IndexRecord<V>>,
    done: bool,
}

impl<V: IndexValue> IndexEnumeration<V> {
    /// Wraps a forward scan producing value-to-id tuples.
    #[must_use]
    pub fn forward(cursor: Box<dyn Cursor<Item = Tuple<V, EntryId>>>) -> Self {
        Self {
            source: Source::Forward(cursor),
            filter: None,
            prefetched: None,
            done: false,
        }
    }

    /// Wraps a reverse scan producing id-to-value tuples.
    #[must_use]
    pub fn reverse(cursor: Box<dyn Cursor<Item = Tuple<EntryId, V>>>) -> Self {
        Self {
            source: Source::Reverse(cursor),
            filter: None,
            prefetched: None,
            done: false,
        }
    }

    /// Drops records whose rendered value does not match `pattern`.
    #[must_use]
    pub fn with_filter(mut self, pattern: Regex) -> Self {
        self.filter = Some(pattern);
        self
    }

    /// Advances the wrapped scan one step, normalizing the orientation.
    fn pull(&mut self) -> StoreResult<Option<IndexRecord<V>>> {
        match &mut self.source {
            Source::Forward(cursor) => {
                if !cursor.next()? {
                    return Ok(None);
                }
                let tuple = cursor.get()?;
                Ok(Some(IndexRecord::new(tuple.key().clone(), *tuple.value())))
            }
            Source::Reverse(cursor) => {
                if !cursor.next()? {
                    return Ok(None);
                }
                let tuple = cursor.get()?;
                Ok(Some(IndexRecord::new(tuple.value().clone(), *tuple.key())))
            }
        }
    }

    /// Whether another record is available, prefetching it if needed.
    pub fn has_more(&mut self) -> StoreResult<bool> {
        if self.prefetched.is_some() {
            return Ok(true);
        }
        if self.done {
            return Ok(false);
        }
        while let Some(record) = self.pull()? {
            let keep = match &self.filter {
                Some(pattern) => pattern.is_match(&record.value().to_text()),
                None => true,
            };
            if keep {
                self.prefetched = Some(record);
                return Ok(true);
            }
        }
        self.done = true;
        Ok(false)
    }

    /// Takes the next record.
    ///
    /// # Errors
    ///
    /// Fails with an invalid-state error when the enumeration is
    /// exhausted; call [`Self::has_more`] first.
    pub fn next_record(&mut self) -> StoreResult<IndexRecord<V>> {
        self.has_more()?;
        self.prefetched.take().ok_or_else(|| {
            StoreError::invalid_state("enumeration exhausted; no record to take")
        })
    }
}

impl<V: IndexValue> Iterator for IndexEnumeration<V> {
    type Item = StoreResult<IndexRecord<V>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.has_more() {
            Err(e) => Some(Err(e)),
            Ok(false) => None,
            Ok(true) => Some(self.next_record()),
        }
    }
}
