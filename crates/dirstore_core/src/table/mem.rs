//! In-memory table implementation.

use crate::browser::{BrowserFactory, MemBrowserFactory};
use crate::cursor::{BrowserCursor, KeyValuesCursor};
use crate::error::{StoreError, StoreResult};
use crate::table::{Direction, Table, TableConfig};
use crate::tuple::Tuple;
use dirstore_cursor::{ClosureMonitor, Comparator, Cursor, EmptyCursor, ListCursor, SingletonCursor};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use tracing::debug;

/// A table backed by an in-memory ordered map.
///
/// This is the working-table implementation used for partition scratch
/// tables and tests, and the reference for the table contract. Keys are
/// ordered by `K`'s natural order; duplicate values are kept as an ordered
/// set, sorted by the configured value comparator when one is present and
/// by insertion order otherwise.
///
/// Cursors iterate a snapshot taken when the cursor is created; mutations
/// after that point are not visible to an open cursor.
pub struct MemTable<K, V> {
    config: TableConfig<V>,
    map: BTreeMap<K, Vec<V>>,
    len: usize,
    monitor: ClosureMonitor,
}

impl<K, V> MemTable<K, V>
where
    K: Ord + Clone + Send + Sync + 'static,
    V: Clone + PartialEq + Send + Sync + 'static,
{
    /// Creates an empty table with the given configuration.
    #[must_use]
    pub fn new(config: TableConfig<V>) -> Self {
        Self {
            config,
            map: BTreeMap::new(),
            len: 0,
            monitor: ClosureMonitor::new(),
        }
    }

    fn check_open(&self, operation: &str) -> StoreResult<()> {
        self.monitor.check_not_closed(operation)?;
        Ok(())
    }

    fn value_eq(&self, a: &V, b: &V) -> bool {
        match self.config.value_comparator() {
            Some(cmp) => cmp(a, b) == Ordering::Equal,
            None => a == b,
        }
    }

    /// Inserts into the ordered value set, returning whether it grew.
    fn insert_value(&self, values: &mut Vec<V>, value: V) -> bool {
        match self.config.value_comparator() {
            Some(cmp) => {
                let at = values.partition_point(|v| cmp(v, &value) == Ordering::Less);
                if values.get(at).is_some_and(|v| cmp(v, &value) == Ordering::Equal) {
                    return false;
                }
                values.insert(at, value);
                true
            }
            None => {
                if values.contains(&value) {
                    return false;
                }
                values.push(value);
                true
            }
        }
    }

    fn render(&self, value: &V) -> Option<String> {
        self.config.renderer().map(|r| r(value))
    }

    /// Drains a value cursor into a vector, front to back.
    fn drain_values(values: &mut dyn Cursor<Item = V>) -> StoreResult<Vec<V>> {
        let mut out = Vec::new();
        values.before_first()?;
        while values.next()? {
            out.push(values.get_owned()?);
        }
        Ok(out)
    }

    fn flat_snapshot(&self) -> Vec<(K, V)> {
        let mut flat = Vec::with_capacity(self.len);
        for (key, values) in &self.map {
            for value in values {
                flat.push((key.clone(), value.clone()));
            }
        }
        flat
    }

    fn tuple_comparator(&self) -> StoreResult<Comparator<Tuple<K, V>>> {
        let value_cmp = self
            .config
            .value_comparator()
            .ok_or(StoreError::Unsupported {
                operation: "value-directional scan without sorted duplicates",
            })?
            .clone();
        Ok(Arc::new(move |a: &Tuple<K, V>, b: &Tuple<K, V>| {
            a.key()
                .cmp(b.key())
                .then_with(|| value_cmp(a.value(), b.value()))
        }))
    }

    fn browse(&self) -> StoreResult<BrowserCursor<K, V>> {
        let factory = MemBrowserFactory::new(self.flat_snapshot());
        Ok(BrowserCursor::new(factory.browser()?))
    }
}

impl<K, V> Table<K, V> for MemTable<K, V>
where
    K: Ord + Clone + Send + Sync + 'static,
    V: Clone + PartialEq + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        self.config.name()
    }

    fn allows_duplicates(&self) -> bool {
        self.config.allows_duplicates()
    }

    fn supports_sorted_duplicates(&self) -> bool {
        self.config.value_comparator().is_some()
    }

    fn has(&self, key: &K) -> StoreResult<bool> {
        self.check_open("has")?;
        Ok(self.map.contains_key(key))
    }

    fn has_value(&self, key: &K, value: &V) -> StoreResult<bool> {
        self.check_open("has_value")?;
        Ok(self
            .map
            .get(key)
            .is_some_and(|values| values.iter().any(|v| self.value_eq(v, value))))
    }

    fn has_from(&self, key: &K, direction: Direction) -> StoreResult<bool> {
        self.check_open("has_from")?;
        let mut range = match direction {
            Direction::GreaterOrEqual => self.map.range((Bound::Included(key), Bound::Unbounded)),
            Direction::LessOrEqual => self.map.range((Bound::Unbounded, Bound::Included(key))),
        };
        Ok(range.next().is_some())
    }

    fn has_value_from(&self, key: &K, value: &V, direction: Direction) -> StoreResult<bool> {
        self.check_open("has_value_from")?;
        let cmp = self
            .config
            .value_comparator()
            .ok_or(StoreError::Unsupported {
                operation: "has_value_from without sorted duplicates",
            })?;
        let Some(values) = self.map.get(key) else {
            return Ok(false);
        };
        Ok(values.iter().any(|v| match direction {
            Direction::GreaterOrEqual => cmp(v, value) != Ordering::Less,
            Direction::LessOrEqual => cmp(v, value) != Ordering::Greater,
        }))
    }

    fn get(&self, key: &K) -> StoreResult<Option<V>> {
        self.check_open("get")?;
        Ok(self.map.get(key).and_then(|values| values.first().cloned()))
    }

    fn put(&mut self, key: K, value: V) -> StoreResult<Option<V>> {
        self.check_open("put")?;
        if !self.allows_duplicates() {
            let previous = self.map.insert(key, vec![value]);
            let replaced = previous.and_then(|mut values| {
                self.len -= values.len();
                if values.is_empty() {
                    None
                } else {
                    Some(values.remove(0))
                }
            });
            self.len += 1;
            return Ok(replaced);
        }

        // ordered-set append; an exact duplicate pair is a no-op
        let mut values = self.map.remove(&key).unwrap_or_default();
        if self.insert_value(&mut values, value) {
            self.len += 1;
        }
        self.map.insert(key, values);
        Ok(None)
    }

    fn put_all(&mut self, key: K, values: &mut dyn Cursor<Item = V>) -> StoreResult<()> {
        self.check_open("put_all")?;
        let supplied = Self::drain_values(values)?;
        if !self.allows_duplicates() && supplied.len() > 1 {
            let detail = self
                .render(&supplied[0])
                .map(|r| format!(", first value {r}"))
                .unwrap_or_default();
            return Err(StoreError::invalid_state(format!(
                "table '{}' does not allow duplicate keys but {} values were supplied{}",
                self.name(),
                supplied.len(),
                detail
            )));
        }
        for value in supplied {
            self.put(key.clone(), value)?;
        }
        Ok(())
    }

    fn remove(&mut self, key: &K) -> StoreResult<Option<V>> {
        self.check_open("remove")?;
        Ok(self.map.remove(key).and_then(|mut values| {
            self.len -= values.len();
            if values.is_empty() {
                None
            } else {
                Some(values.remove(0))
            }
        }))
    }

    fn remove_value(&mut self, key: &K, value: &V) -> StoreResult<Option<V>> {
        self.check_open("remove_value")?;
        let Some(values) = self.map.get_mut(key) else {
            return Ok(None);
        };
        let Some(at) = values.iter().position(|v| match self.config.value_comparator() {
            Some(cmp) => cmp(v, value) == Ordering::Equal,
            None => v == value,
        }) else {
            return Ok(None);
        };
        let removed = values.remove(at);
        self.len -= 1;
        if values.is_empty() {
            self.map.remove(key);
        }
        Ok(Some(removed))
    }

    fn remove_all(&mut self, key: &K, values: &mut dyn Cursor<Item = V>) -> StoreResult<()> {
        self.check_open("remove_all")?;
        let supplied = Self::drain_values(values)?;
        if !self.allows_duplicates() && supplied.len() > 1 {
            return Err(StoreError::invalid_state(format!(
                "table '{}' does not allow duplicate keys but {} values were supplied for removal",
                self.name(),
                supplied.len()
            )));
        }
        for value in supplied {
            self.remove_value(key, &value)?;
        }
        Ok(())
    }

    fn values(&self, key: &K) -> StoreResult<Box<dyn Cursor<Item = V>>> {
        self.check_open("values")?;
        let Some(values) = self.map.get(key) else {
            return Ok(Box::new(EmptyCursor::new()));
        };
        if values.len() == 1 {
            let value = values[0].clone();
            return Ok(match self.config.value_comparator() {
                Some(cmp) => Box::new(SingletonCursor::with_comparator(value, cmp.clone())),
                None => Box::new(SingletonCursor::new(value)),
            });
        }
        let values = values.clone();
        Ok(match self.config.value_comparator() {
            Some(cmp) => Box::new(ListCursor::sorted(values, cmp.clone())?),
            None => Box::new(ListCursor::new(values)?),
        })
    }

    fn tuples(&self) -> StoreResult<Box<dyn Cursor<Item = Tuple<K, V>>>> {
        self.check_open("tuples")?;
        Ok(Box::new(self.browse()?))
    }

    fn tuples_of(&self, key: &K) -> StoreResult<Box<dyn Cursor<Item = Tuple<K, V>>>> {
        self.check_open("tuples_of")?;
        let Some(values) = self.map.get(key) else {
            return Ok(Box::new(EmptyCursor::new()));
        };
        let key = key.clone();
        let values = values.clone();
        Ok(match self.config.value_comparator() {
            Some(cmp) => Box::new(KeyValuesCursor::sorted(key, values, cmp.clone())),
            None => Box::new(KeyValuesCursor::new(key, values)),
        })
    }

    fn tuples_from(
        &self,
        key: &K,
        direction: Direction,
    ) -> StoreResult<Box<dyn Cursor<Item = Tuple<K, V>>>> {
        self.check_open("tuples_from")?;
        let mut cursor = self.browse()?;
        match direction {
            Direction::GreaterOrEqual => cursor.before_key(key)?,
            Direction::LessOrEqual => cursor.after_key(key)?,
        }
        Ok(Box::new(cursor))
    }

    fn tuples_from_value(
        &self,
        key: &K,
        value: &V,
        direction: Direction,
    ) -> StoreResult<Box<dyn Cursor<Item = Tuple<K, V>>>> {
        self.check_open("tuples_from_value")?;
        let comparator = self.tuple_comparator()?;
        let snapshot = self
            .flat_snapshot()
            .into_iter()
            .map(|(k, v)| Tuple::new(k, v))
            .collect();
        let mut cursor = ListCursor::sorted(snapshot, comparator)?;
        let target = Tuple::new(key.clone(), value.clone());
        match direction {
            Direction::GreaterOrEqual => cursor.before(&target)?,
            Direction::LessOrEqual => cursor.after(&target)?,
        }
        Ok(Box::new(cursor))
    }

    fn count(&self) -> StoreResult<usize> {
        self.check_open("count")?;
        Ok(self.len)
    }

    fn count_of(&self, key: &K) -> StoreResult<usize> {
        self.check_open("count_of")?;
        Ok(self.map.get(key).map_or(0, Vec::len))
    }

    fn count_from(&self, key: &K, direction: Direction) -> StoreResult<usize> {
        self.check_open("count_from")?;
        let range = match direction {
            Direction::GreaterOrEqual => self.map.range((Bound::Included(key), Bound::Unbounded)),
            Direction::LessOrEqual => self.map.range((Bound::Unbounded, Bound::Included(key))),
        };
        Ok(range.map(|(_, values)| values.len()).sum())
    }

    fn is_closed(&self) -> bool {
        self.monitor.is_closed()
    }

    fn close(&mut self) -> StoreResult<()> {
        if !self.monitor.is_closed() {
            debug!(table = self.name(), entries = self.len, "closing table");
        }
        self.monitor.close();
        Ok(())
    }
}
