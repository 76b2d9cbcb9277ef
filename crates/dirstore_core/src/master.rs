//! The master table: entry storage plus id sequencing and properties.

use crate::error::{StoreError, StoreResult};
use crate::table::{Direction, MemTable, Table, TableConfig};
use crate::tuple::Tuple;
use dirstore_cursor::Cursor;
use std::fmt;

/// Admin property key holding the entry id sequence counter.
pub const SEQUENCE_PROPERTY: &str = "__sequence__";

/// Identifier of one entry in a master table.
///
/// Ids are handed out by [`MasterTable::next_id`] in strictly increasing
/// order and never reused, even after the entry is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub u64);

impl EntryId {
    /// The smallest possible id, below any handed-out id.
    pub const MIN: Self = Self(u64::MIN);
    /// The largest possible id.
    pub const MAX: Self = Self(u64::MAX);
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry:{}", self.0)
    }
}

/// The primary table of a partition, keyed by entry id.
///
/// On top of the plain table contract this adds the id sequence and a
/// small string property store for administrative state. The sequence
/// itself lives in that property store under [`SEQUENCE_PROPERTY`], so it
/// survives restarts together with the entries.
pub trait MasterTable<E>: Table<EntryId, E> {
    /// The most recently handed-out entry id, `EntryId::MIN` before any.
    ///
    /// # Errors
    ///
    /// Fails `Corrupted` when the persisted sequence value does not parse.
    fn current_id(&self) -> StoreResult<EntryId>;

    /// Reserves and returns the next entry id.
    ///
    /// Ids are strictly increasing and never reused; the advanced sequence
    /// is persisted before the id is returned.
    fn next_id(&mut self) -> StoreResult<EntryId>;

    /// Reads an administrative property.
    fn property(&self, name: &str) -> StoreResult<Option<String>>;

    /// Writes an administrative property, replacing any prior value.
    fn set_property(&mut self, name: &str, value: &str) -> StoreResult<()>;
}

/// An in-memory master table.
///
/// Entries and administrative properties live in two separate tables so
/// that entry scans never see the sequence counter.
pub struct MemMasterTable<E> {
    entries: MemTable<EntryId, E>,
    admin: MemTable<String, String>,
}

impl<E> MemMasterTable<E>
where
    E: Clone + PartialEq + Send + Sync + 'static,
{
    /// Creates an empty master table named `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            entries: MemTable::new(TableConfig::new(name.clone())),
            admin: MemTable::new(TableConfig::new(format!("{name}_admin"))),
        }
    }

    fn read_sequence(&self) -> StoreResult<u64> {
        match self.admin.get(&SEQUENCE_PROPERTY.to_string())? {
            None => Ok(0),
            Some(raw) => raw.parse().map_err(|_| {
                StoreError::corrupted(format!(
                    "master table '{}' sequence property is not a number: {raw:?}",
                    self.entries.name()
                ))
            }),
        }
    }
}

impl<E> MasterTable<E> for MemMasterTable<E>
where
    E: Clone + PartialEq + Send + Sync + 'static,
{
    fn current_id(&self) -> StoreResult<EntryId> {
        Ok(EntryId(self.read_sequence()?))
    }

    fn next_id(&mut self) -> StoreResult<EntryId> {
        let next = self.read_sequence()? + 1;
        self.set_property(SEQUENCE_PROPERTY, &next.to_string())?;
        Ok(EntryId(next))
    }

    fn property(&self, name: &str) -> StoreResult<Option<String>> {
        self.admin.get(&name.to_string())
    }

    fn set_property(&mut self, name: &str, value: &str) -> StoreResult<()> {
        self.admin.put(name.to_string(), value.to_string())?;
        Ok(())
    }
}

impl<E> Table<EntryId, E> for MemMasterTable<E>
where
    E: Clone + PartialEq + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        self.entries.name()
    }

    fn allows_duplicates(&self) -> bool {
        false
    }

    fn supports_sorted_duplicates(&self) -> bool {
        false
    }

    fn has(&self, key: &EntryId) -> StoreResult<bool> {
        self.entries.has(key)
    }

    fn has_value(&self, key: &EntryId, value: &E) -> StoreResult<bool> {
        self.entries.has_value(key, value)
    }

    fn has_from(&self, key: &EntryId, direction: Direction) -> StoreResult<bool> {
        self.entries.has_from(key, direction)
    }

    fn has_value_from(&self, key: &EntryId, value: &E, direction: Direction) -> StoreResult<bool> {
        self.entries.has_value_from(key, value, direction)
    }

    fn get(&self, key: &EntryId) -> StoreResult<Option<E>> {
        self.entries.get(key)
    }

    fn put(&mut self, key: EntryId, value: E) -> StoreResult<Option<E>> {
        self.entries.put(key, value)
    }

    fn put_all(&mut self, key: EntryId, values: &mut dyn Cursor<Item = E>) -> StoreResult<()> {
        self.entries.put_all(key, values)
    }

    fn remove(&mut self, key: &EntryId) -> StoreResult<Option<E>> {
        self.entries.remove(key)
    }

    fn remove_value(&mut self, key: &EntryId, value: &E) -> StoreResult<Option<E>> {
        self.entries.remove_value(key, value)
    }

    fn remove_all(&mut self, key: &EntryId, values: &mut dyn Cursor<Item = E>) -> StoreResult<()> {
        self.entries.remove_all(key, values)
    }

    fn values(&self, key: &EntryId) -> StoreResult<Box<dyn Cursor<Item = E>>> {
        self.entries.values(key)
    }

    fn tuples(&self) -> StoreResult<Box<dyn Cursor<Item = Tuple<EntryId, E>>>> {
        self.entries.tuples()
    }

    fn tuples_of(&self, key: &EntryId) -> StoreResult<Box<dyn Cursor<Item = Tuple<EntryId, E>>>> {
        self.entries.tuples_of(key)
    }

    fn tuples_from(
        &self,
        key: &EntryId,
        direction: Direction,
    ) -> StoreResult<Box<dyn Cursor<Item = Tuple<EntryId, E>>>> {
        self.entries.tuples_from(key, direction)
    }

    fn tuples_from_value(
        &self,
        key: &EntryId,
        value: &E,
        direction: Direction,
    ) -> StoreResult<Box<dyn Cursor<Item = Tuple<EntryId, E>>>> {
        self.entries.tuples_from_value(key, value, direction)
    }

    fn count(&self) -> StoreResult<usize> {
        self.entries.count()
    }

    fn count_of(&self, key: &EntryId) -> StoreResult<usize> {
        self.entries.count_of(key)
    }

    fn count_from(&self, key: &EntryId, direction: Direction) -> StoreResult<usize> {
        self.entries.count_from(key, direction)
    }

    fn is_closed(&self) -> bool {
        self.entries.is_closed()
    }

    fn close(&mut self) -> StoreResult<()> {
        self.entries.close()?;
        self.admin.close()
    }
}
