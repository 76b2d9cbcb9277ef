//! In-memory two-direction index.

use crate::error::StoreResult;
use crate::index::{Index, IndexConfig, IndexRecord, IndexValue, RegexCursor};
use crate::master::EntryId;
use crate::table::{Direction, MemTable, Table, TableConfig};
use crate::tuple::Tuple;
use dirstore_cursor::{natural, Cursor, ListCursor};
use regex::Regex;
use tracing::debug;

/// An index backed by two in-memory tables.
///
/// The forward table maps normalized value to entry ids (duplicates sorted
/// by id); the reverse table maps entry id to normalized values (duplicates
/// sorted by value). Mutations touch both tables before returning, so a
/// caller never observes one direction without the other.
pub struct MemIndex<V> {
    config: IndexConfig<V>,
    forward: MemTable<V, EntryId>,
    reverse: MemTable<EntryId, V>,
}

impl<V: IndexValue> MemIndex<V> {
    /// Creates an empty index with the given configuration.
    #[must_use]
    pub fn new(config: IndexConfig<V>) -> Self {
        let attribute = config.attribute();
        let forward = MemTable::new(
            TableConfig::new(format!("{attribute}_forward"))
                .with_duplicates()
                .with_value_comparator(natural::<EntryId>()),
        );
        let reverse = MemTable::new(
            TableConfig::new(format!("{attribute}_reverse"))
                .with_duplicates()
                .with_value_comparator(natural::<V>()),
        );
        Self {
            config,
            forward,
            reverse,
        }
    }

    /// Tuple cursor over the forward direction, as enumeration adapters
    /// consume it.
    pub fn forward_tuples(&self) -> StoreResult<Box<dyn Cursor<Item = Tuple<V, EntryId>>>> {
        self.forward.tuples()
    }

    /// Tuple cursor over the reverse direction.
    pub fn reverse_tuples(&self) -> StoreResult<Box<dyn Cursor<Item = Tuple<EntryId, V>>>> {
        self.reverse.tuples()
    }

    /// Snapshot of every forward record, ordered by value then id.
    fn record_snapshot(&self) -> StoreResult<Vec<IndexRecord<V>>> {
        let mut records = Vec::new();
        let mut tuples = self.forward.tuples()?;
        while tuples.next()? {
            let tuple = tuples.get()?;
            records.push(IndexRecord::new(tuple.key().clone(), *tuple.value()));
        }
        Ok(records)
    }
}

impl<V: IndexValue> Index<V> for MemIndex<V> {
    fn attribute(&self) -> &str {
        self.config.attribute()
    }

    fn cache_size(&self) -> usize {
        self.config.cache_size()
    }

    fn normalize(&self, value: &V) -> V {
        match self.config.normalizer() {
            Some(normalizer) => normalizer(value),
            None => value.clone(),
        }
    }

    fn count(&self) -> StoreResult<usize> {
        self.forward.count()
    }

    fn count_of(&self, value: &V) -> StoreResult<usize> {
        self.forward.count_of(&self.normalize(value))
    }

    fn count_from(&self, value: &V, direction: Direction) -> StoreResult<usize> {
        self.forward.count_from(&self.normalize(value), direction)
    }

    fn forward_lookup(&self, value: &V) -> StoreResult<Option<EntryId>> {
        self.forward.get(&self.normalize(value))
    }

    fn reverse_lookup(&self, id: EntryId) -> StoreResult<Option<V>> {
        self.reverse.get(&id)
    }

    fn add(&mut self, value: V, id: EntryId) -> StoreResult<()> {
        let normalized = self.normalize(&value);
        self.forward.put(normalized.clone(), id)?;
        self.reverse.put(id, normalized)?;
        Ok(())
    }

    fn drop_value(&mut self, value: &V, id: EntryId) -> StoreResult<()> {
        let normalized = self.normalize(value);
        self.forward.remove_value(&normalized, &id)?;
        self.reverse.remove_value(&id, &normalized)?;
        Ok(())
    }

    fn drop_id(&mut self, id: EntryId) -> StoreResult<()> {
        let mut values = Vec::new();
        let mut cursor = self.reverse.values(&id)?;
        while cursor.next()? {
            values.push(cursor.get_owned()?);
        }
        for value in &values {
            self.forward.remove_value(value, &id)?;
        }
        self.reverse.remove(&id)?;
        debug!(
            attribute = self.attribute(),
            id = %id,
            dropped = values.len(),
            "dropped entry from index"
        );
        Ok(())
    }

    fn list_reverse(&self, id: EntryId) -> StoreResult<Box<dyn Cursor<Item = V>>> {
        self.reverse.values(&id)
    }

    fn list_forward(&self) -> StoreResult<Box<dyn Cursor<Item = IndexRecord<V>>>> {
        let records = self.record_snapshot()?;
        Ok(Box::new(ListCursor::sorted(records, natural())?))
    }

    fn list_forward_of(&self, value: &V) -> StoreResult<Box<dyn Cursor<Item = IndexRecord<V>>>> {
        let normalized = self.normalize(value);
        let mut records = Vec::new();
        let mut ids = self.forward.values(&normalized)?;
        while ids.next()? {
            records.push(IndexRecord::new(normalized.clone(), *ids.get()?));
        }
        Ok(Box::new(ListCursor::sorted(records, natural())?))
    }

    fn list_forward_from(
        &self,
        value: &V,
        direction: Direction,
    ) -> StoreResult<Box<dyn Cursor<Item = IndexRecord<V>>>> {
        let normalized = self.normalize(value);
        let records = self.record_snapshot()?;
        let mut cursor = ListCursor::sorted(records, natural())?;
        // sentinel ids make the seek land at the value boundary
        match direction {
            Direction::GreaterOrEqual => {
                cursor.before(&IndexRecord::new(normalized, EntryId::MIN))?;
            }
            Direction::LessOrEqual => {
                cursor.after(&IndexRecord::new(normalized, EntryId::MAX))?;
            }
        }
        Ok(Box::new(cursor))
    }

    fn list_forward_matching(
        &self,
        pattern: &Regex,
        prefix: Option<&str>,
    ) -> StoreResult<Box<dyn Cursor<Item = IndexRecord<V>>>> {
        Ok(Box::new(RegexCursor::new(
            self.list_forward()?,
            pattern.clone(),
            prefix,
        )))
    }

    fn has_value(&self, value: &V, id: EntryId) -> StoreResult<bool> {
        self.forward.has_value(&self.normalize(value), &id)
    }

    fn has_value_from(&self, value: &V, id: EntryId, direction: Direction) -> StoreResult<bool> {
        self.forward
            .has_value_from(&self.normalize(value), &id, direction)
    }

    fn has_value_matching(&self, pattern: &Regex, id: EntryId) -> StoreResult<bool> {
        let mut values = self.reverse.values(&id)?;
        while values.next()? {
            if pattern.is_match(&values.get()?.to_text()) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn sync(&mut self) -> StoreResult<()> {
        // nothing buffered in memory
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.forward.is_closed()
    }

    fn close(&mut self) -> StoreResult<()> {
        if !self.forward.is_closed() {
            debug!(attribute = self.attribute(), "closing index");
        }
        self.forward.close()?;
        self.reverse.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use std::sync::Arc;

    fn cn_index() -> MemIndex<String> {
        let mut index = MemIndex::new(IndexConfig::new("cn"));
        index.add("alice".into(), EntryId(1)).unwrap();
        index.add("bob".into(), EntryId(2)).unwrap();
        index.add("alice".into(), EntryId(3)).unwrap();
        index
    }

    #[test]
    fn lookups_cross_both_directions() {
        let index = cn_index();
        assert_eq!(index.forward_lookup(&"alice".into()).unwrap(), Some(EntryId(1)));
        assert_eq!(index.forward_lookup(&"carol".into()).unwrap(), None);
        assert_eq!(index.reverse_lookup(EntryId(2)).unwrap(), Some("bob".into()));
        assert_eq!(index.reverse_lookup(EntryId(9)).unwrap(), None);
    }

    #[test]
    fn counts_are_exact() {
        let index = cn_index();
        assert_eq!(index.count().unwrap(), 3);
        assert_eq!(index.count_of(&"alice".into()).unwrap(), 2);
        assert_eq!(index.count_of(&"carol".into()).unwrap(), 0);
        assert_eq!(
            index.count_from(&"b".into(), Direction::GreaterOrEqual).unwrap(),
            1
        );
        assert_eq!(
            index.count_from(&"b".into(), Direction::LessOrEqual).unwrap(),
            2
        );
    }

    #[test]
    fn drop_value_keeps_directions_consistent() {
        let mut index = cn_index();
        index.drop_value(&"alice".into(), EntryId(1)).unwrap();
        assert_eq!(index.forward_lookup(&"alice".into()).unwrap(), Some(EntryId(3)));
        assert_eq!(index.reverse_lookup(EntryId(1)).unwrap(), None);
        assert_eq!(index.count().unwrap(), 2);
    }

    #[test]
    fn drop_id_removes_every_pair() {
        let mut index = cn_index();
        index.add("smith".into(), EntryId(1)).unwrap();
        index.drop_id(EntryId(1)).unwrap();

        assert!(!index.has_value(&"alice".into(), EntryId(1)).unwrap());
        assert!(!index.has_value(&"smith".into(), EntryId(1)).unwrap());
        assert_eq!(index.reverse_lookup(EntryId(1)).unwrap(), None);
        // the other entries are untouched
        assert!(index.has_value(&"alice".into(), EntryId(3)).unwrap());
        assert_eq!(index.count().unwrap(), 2);
    }

    #[test]
    fn forward_scan_orders_by_value_then_id() {
        let index = cn_index();
        let mut cursor = index.list_forward().unwrap();
        let mut seen = Vec::new();
        while cursor.next().unwrap() {
            let record = cursor.get().unwrap();
            seen.push((record.value().clone(), record.id()));
        }
        assert_eq!(
            seen,
            vec![
                ("alice".to_string(), EntryId(1)),
                ("alice".to_string(), EntryId(3)),
                ("bob".to_string(), EntryId(2)),
            ]
        );
    }

    #[test]
    fn forward_scan_of_one_value() {
        let index = cn_index();
        let mut cursor = index.list_forward_of(&"alice".into()).unwrap();
        assert!(cursor.next().unwrap());
        assert_eq!(cursor.get().unwrap().id(), EntryId(1));
        assert!(cursor.next().unwrap());
        assert_eq!(cursor.get().unwrap().id(), EntryId(3));
        assert!(!cursor.next().unwrap());
    }

    #[test]
    fn forward_scan_from_value_boundary() {
        let index = cn_index();

        let mut cursor = index
            .list_forward_from(&"alice".into(), Direction::GreaterOrEqual)
            .unwrap();
        assert!(cursor.next().unwrap());
        assert_eq!(cursor.get().unwrap().id(), EntryId(1));

        // LessOrEqual parks after the last record of the value
        let mut cursor = index
            .list_forward_from(&"alice".into(), Direction::LessOrEqual)
            .unwrap();
        assert!(cursor.previous().unwrap());
        assert_eq!(cursor.get().unwrap().id(), EntryId(3));
        assert!(cursor.next().unwrap());
        assert!(cursor.next().unwrap());
        assert_eq!(cursor.get().unwrap().value(), "bob");
    }

    #[test]
    fn reverse_scan_lists_entry_values() {
        let mut index = cn_index();
        index.add("smith".into(), EntryId(1)).unwrap();

        let mut cursor = index.list_reverse(EntryId(1)).unwrap();
        assert!(cursor.next().unwrap());
        assert_eq!(*cursor.get().unwrap(), "alice");
        assert!(cursor.next().unwrap());
        assert_eq!(*cursor.get().unwrap(), "smith");
        assert!(!cursor.next().unwrap());

        assert!(!index.list_reverse(EntryId(9)).unwrap().next().unwrap());
    }

    #[test]
    fn has_value_from_scopes_to_one_value() {
        let index = cn_index();
        let alice = "alice".to_string();
        assert!(index
            .has_value_from(&alice, EntryId(2), Direction::GreaterOrEqual)
            .unwrap());
        assert!(!index
            .has_value_from(&alice, EntryId(4), Direction::GreaterOrEqual)
            .unwrap());
        assert!(index
            .has_value_from(&alice, EntryId(2), Direction::LessOrEqual)
            .unwrap());
    }

    #[test]
    fn matching_scan_filters_lazily() {
        let index = cn_index();
        let pattern = Regex::new("^a.*e$").unwrap();

        let mut cursor = index.list_forward_matching(&pattern, None).unwrap();
        assert!(cursor.next().unwrap());
        assert_eq!(cursor.get().unwrap().id(), EntryId(1));
        assert!(cursor.next().unwrap());
        assert_eq!(cursor.get().unwrap().id(), EntryId(3));
        assert!(!cursor.next().unwrap());
    }

    #[test]
    fn matching_predicate_on_one_entry() {
        let index = cn_index();
        let pattern = Regex::new("^bo").unwrap();
        assert!(index.has_value_matching(&pattern, EntryId(2)).unwrap());
        assert!(!index.has_value_matching(&pattern, EntryId(1)).unwrap());
        assert!(!index.has_value_matching(&pattern, EntryId(9)).unwrap());
    }

    #[test]
    fn normalizer_applies_to_storage_and_lookup() {
        let config = IndexConfig::new("mail")
            .with_normalizer(Arc::new(|v: &String| v.to_lowercase()));
        let mut index = MemIndex::new(config);
        index.add("Alice@Example.COM".into(), EntryId(1)).unwrap();

        assert_eq!(
            index.forward_lookup(&"ALICE@example.com".into()).unwrap(),
            Some(EntryId(1))
        );
        assert_eq!(
            index.reverse_lookup(EntryId(1)).unwrap(),
            Some("alice@example.com".into())
        );
        index.drop_value(&"alice@EXAMPLE.com".into(), EntryId(1)).unwrap();
        assert_eq!(index.count().unwrap(), 0);
    }

    #[test]
    fn duplicate_add_is_a_no_op() {
        let mut index = cn_index();
        index.add("alice".into(), EntryId(1)).unwrap();
        assert_eq!(index.count().unwrap(), 3);
    }

    #[test]
    fn close_is_idempotent_and_guards_access() {
        let mut index = cn_index();
        index.sync().unwrap();
        index.close().unwrap();
        index.close().unwrap();
        assert!(index.is_closed());
        assert!(matches!(
            index.forward_lookup(&"alice".into()),
            Err(StoreError::Cursor(_))
        ));
    }
}
