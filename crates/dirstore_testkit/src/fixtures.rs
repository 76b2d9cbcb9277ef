//! Canned tables, indexes and cursor data.
//!
//! Provides the small directory data sets the cross-crate tests walk:
//! a people table, a populated common-name index, and plain sorted
//! sequences for cursor checks.

use dirstore_core::{
    EntryId, Index, IndexConfig, MasterTable, MemIndex, MemMasterTable, MemTable, Table,
    TableConfig,
};
use dirstore_cursor::natural;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Installs a tracing subscriber honoring `RUST_LOG`, once per process.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A sorted sequence for plain cursor walks.
pub fn alphabet() -> Vec<char> {
    ('a'..='j').collect()
}

/// A dn-to-cn table without duplicate keys.
pub fn people_table() -> MemTable<String, String> {
    let mut table = MemTable::new(TableConfig::new("people"));
    for (dn, cn) in [
        ("uid=aaron,ou=people", "Aaron Swift"),
        ("uid=alice,ou=people", "Alice Hart"),
        ("uid=bob,ou=people", "Bob Stone"),
        ("uid=carol,ou=people", "Carol Monk"),
    ] {
        table
            .put(dn.to_string(), cn.to_string())
            .expect("fixture put");
    }
    table
}

/// An objectClass-style table with sorted duplicate values.
pub fn class_table() -> MemTable<String, u64> {
    let mut table = MemTable::new(
        TableConfig::new("objectClass")
            .with_duplicates()
            .with_value_comparator(natural()),
    );
    for (class, id) in [
        ("person", 1),
        ("person", 2),
        ("person", 4),
        ("group", 3),
        ("organizationalUnit", 5),
    ] {
        table.put(class.to_string(), id).expect("fixture put");
    }
    table
}

/// A cn index over five entries, with one multi-valued entry.
pub fn cn_index() -> MemIndex<String> {
    let mut index = MemIndex::new(IndexConfig::new("cn"));
    for (cn, id) in [
        ("aaron", 1),
        ("alice", 2),
        ("bob", 3),
        ("carol", 4),
        ("dan", 5),
        // entry 2 carries a second value
        ("ally", 2),
    ] {
        index.add(cn.to_string(), EntryId(id)).expect("fixture add");
    }
    index
}

/// A master table with `n` entries named `entry-<id>`.
pub fn master_with_entries(n: usize) -> MemMasterTable<String> {
    let mut master = MemMasterTable::new("ou=system");
    for _ in 0..n {
        let id = master.next_id().expect("fixture next_id");
        master
            .put(id, format!("entry-{}", id.0))
            .expect("fixture put");
    }
    master
}
