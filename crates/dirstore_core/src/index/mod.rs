//! Secondary indexes over attribute values.

mod matching;
mod mem;

pub use matching::RegexCursor;
pub use mem::MemIndex;

use crate::error::StoreResult;
use crate::master::EntryId;
use crate::table::Direction;
use dirstore_cursor::Cursor;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Default number of index pages kept hot by a backing cache.
pub const DEFAULT_INDEX_CACHE_SIZE: usize = 100;

/// An attribute value that can live in an index.
///
/// `to_text` renders the comparison form used by regex matching; for
/// string attributes this is the value itself.
pub trait IndexValue: Clone + Ord + Send + Sync + 'static {
    /// Renders the value's comparison form.
    fn to_text(&self) -> String;
}

impl IndexValue for String {
    fn to_text(&self) -> String {
        self.clone()
    }
}

impl IndexValue for u64 {
    fn to_text(&self) -> String {
        self.to_string()
    }
}

impl IndexValue for i64 {
    fn to_text(&self) -> String {
        self.to_string()
    }
}

/// One forward index pairing: an indexed value and the entry that holds it.
///
/// Records order by value first, then by entry id, which is the order
/// forward scans produce.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct IndexRecord<V> {
    value: V,
    id: EntryId,
}

impl<V> IndexRecord<V> {
    /// Creates a record pairing `value` with `id`.
    #[must_use]
    pub fn new(value: V, id: EntryId) -> Self {
        Self { value, id }
    }

    /// The indexed value.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// The entry holding the value.
    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }
}

impl<V: fmt::Display> fmt::Display for IndexRecord<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} @ {})", self.value, self.id)
    }
}

/// A multi-valued attribute of one entry, as handed to `add_attribute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<V> {
    id: String,
    values: Vec<V>,
}

impl<V> Attribute<V> {
    /// Creates an attribute named `id` holding `values`.
    #[must_use]
    pub fn new(id: impl Into<String>, values: Vec<V>) -> Self {
        Self {
            id: id.into(),
            values,
        }
    }

    /// The attribute name.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The attribute's values.
    #[must_use]
    pub fn values(&self) -> &[V] {
        &self.values
    }
}

/// Projection of a raw attribute value to its comparison form.
pub type Normalizer<V> = Arc<dyn Fn(&V) -> V + Send + Sync>;

/// Configuration for an index.
#[derive(Clone)]
pub struct IndexConfig<V> {
    attribute: String,
    cache_size: usize,
    normalizer: Option<Normalizer<V>>,
}

impl<V> IndexConfig<V> {
    /// Creates a configuration for an index over `attribute`, with the
    /// default cache size and identity normalization.
    #[must_use]
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            cache_size: DEFAULT_INDEX_CACHE_SIZE,
            normalizer: None,
        }
    }

    /// Sets the backing cache size.
    #[must_use]
    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.cache_size = cache_size;
        self
    }

    /// Installs a normalizer applied to every value before storage and
    /// lookup. String indexes typically case-fold here.
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: Normalizer<V>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// The indexed attribute name.
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The backing cache size.
    #[must_use]
    pub fn cache_size(&self) -> usize {
        self.cache_size
    }

    /// The normalizer, if one is installed.
    #[must_use]
    pub fn normalizer(&self) -> Option<&Normalizer<V>> {
        self.normalizer.as_ref()
    }
}

/// A two-direction index over one attribute.
///
/// The forward direction maps an attribute value to the ids of the entries
/// holding it; the reverse direction maps an entry id back to its values.
/// Every mutation keeps both directions consistent. All lookups normalize
/// the supplied value first, so callers pass raw attribute values.
pub trait Index<V: IndexValue> {
    /// The indexed attribute name.
    fn attribute(&self) -> &str;

    /// The backing cache size the index was configured with.
    fn cache_size(&self) -> usize;

    /// Projects a raw value to its comparison form.
    fn normalize(&self, value: &V) -> V;

    /// Exact number of value/id pairings in the index.
    fn count(&self) -> StoreResult<usize>;

    /// Exact number of entries holding `value`.
    fn count_of(&self, value: &V) -> StoreResult<usize>;

    /// Exact number of pairings at or beyond `value` per `direction`.
    fn count_from(&self, value: &V, direction: Direction) -> StoreResult<usize>;

    /// The first entry id holding `value`, if any.
    fn forward_lookup(&self, value: &V) -> StoreResult<Option<EntryId>>;

    /// The first value held by entry `id`, if any.
    fn reverse_lookup(&self, id: EntryId) -> StoreResult<Option<V>>;

    /// Records that entry `id` holds `value`.
    fn add(&mut self, value: V, id: EntryId) -> StoreResult<()>;

    /// Records every value of `attribute` against entry `id`.
    fn add_attribute(&mut self, attribute: &Attribute<V>, id: EntryId) -> StoreResult<()> {
        for value in attribute.values() {
            self.add(value.clone(), id)?;
        }
        Ok(())
    }

    /// Removes the pairing of `value` with entry `id`.
    fn drop_value(&mut self, value: &V, id: EntryId) -> StoreResult<()>;

    /// Removes every pairing of entry `id`, in both directions.
    fn drop_id(&mut self, id: EntryId) -> StoreResult<()>;

    /// Cursor over the values held by entry `id`, in value order.
    fn list_reverse(&self, id: EntryId) -> StoreResult<Box<dyn Cursor<Item = V>>>;

    /// Cursor over every forward record, ordered by value then id.
    fn list_forward(&self) -> StoreResult<Box<dyn Cursor<Item = IndexRecord<V>>>>;

    /// Cursor over the forward records of exactly `value`.
    fn list_forward_of(&self, value: &V) -> StoreResult<Box<dyn Cursor<Item = IndexRecord<V>>>>;

    /// Cursor parked relative to `value` per `direction`, over all records.
    fn list_forward_from(
        &self,
        value: &V,
        direction: Direction,
    ) -> StoreResult<Box<dyn Cursor<Item = IndexRecord<V>>>>;

    /// Cursor over the records whose rendered value matches `pattern`,
    /// filtered lazily as the cursor advances. With a prefix only values
    /// whose rendered form starts with it are considered.
    fn list_forward_matching(
        &self,
        pattern: &Regex,
        prefix: Option<&str>,
    ) -> StoreResult<Box<dyn Cursor<Item = IndexRecord<V>>>>;

    /// Whether entry `id` holds `value`.
    fn has_value(&self, value: &V, id: EntryId) -> StoreResult<bool>;

    /// Whether entry `id` appears under `value` at or beyond `id` per
    /// `direction`, within that value's id set.
    fn has_value_from(&self, value: &V, id: EntryId, direction: Direction) -> StoreResult<bool>;

    /// Whether any value of entry `id` matches `pattern`.
    fn has_value_matching(&self, pattern: &Regex, id: EntryId) -> StoreResult<bool>;

    /// Flushes buffered index state to the backing store.
    fn sync(&mut self) -> StoreResult<()>;

    /// Returns true once the index has been closed.
    fn is_closed(&self) -> bool;

    /// Releases both index directions. Idempotent.
    fn close(&mut self) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_order_by_value_then_id() {
        let mut records = vec![
            IndexRecord::new("b".to_string(), EntryId(1)),
            IndexRecord::new("a".to_string(), EntryId(9)),
            IndexRecord::new("a".to_string(), EntryId(2)),
        ];
        records.sort();
        assert_eq!(records[0].id(), EntryId(2));
        assert_eq!(records[1].id(), EntryId(9));
        assert_eq!(records[2].value(), "b");
    }

    #[test]
    fn config_defaults() {
        let config: IndexConfig<String> = IndexConfig::new("cn");
        assert_eq!(config.attribute(), "cn");
        assert_eq!(config.cache_size(), DEFAULT_INDEX_CACHE_SIZE);
        assert!(config.normalizer().is_none());
    }
}
