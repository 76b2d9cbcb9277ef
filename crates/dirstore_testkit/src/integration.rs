//! Cross-crate integration helpers and tests.
//!
//! The harness wires a master table to a cn index the way a partition
//! backend would, tracking what it wrote so tests can verify both
//! directions of the index after any sequence of mutations.

use dirstore_core::{
    EntryId, Index, IndexConfig, MasterTable, MemIndex, MemMasterTable, StoreResult, Table,
};
use std::collections::HashMap;

/// A master table and one attribute index, mutated in lockstep.
pub struct DirectoryHarness {
    /// The primary entry table.
    pub master: MemMasterTable<String>,
    /// The cn index over those entries.
    pub cn: MemIndex<String>,
    written: HashMap<EntryId, Vec<String>>,
}

impl DirectoryHarness {
    /// Creates an empty harness.
    #[must_use]
    pub fn new() -> Self {
        Self {
            master: MemMasterTable::new("ou=system"),
            cn: MemIndex::new(IndexConfig::new("cn")),
            written: HashMap::new(),
        }
    }

    /// Adds an entry carrying the given cn values, returning its id.
    pub fn add_entry(&mut self, cns: &[&str]) -> StoreResult<EntryId> {
        let id = self.master.next_id()?;
        self.master.put(id, format!("entry-{}", id.0))?;
        for cn in cns {
            self.cn.add((*cn).to_string(), id)?;
        }
        self.written
            .insert(id, cns.iter().map(|s| (*s).to_string()).collect());
        Ok(id)
    }

    /// Removes an entry and its index pairings.
    pub fn remove_entry(&mut self, id: EntryId) -> StoreResult<()> {
        self.master.remove(&id)?;
        self.cn.drop_id(id)?;
        self.written.remove(&id);
        Ok(())
    }

    /// Asserts both index directions agree with what was written.
    pub fn verify(&self) {
        for (id, cns) in &self.written {
            for cn in cns {
                assert!(
                    self.cn.has_value(cn, *id).expect("has_value"),
                    "forward direction lost ({cn}, {id})"
                );
            }
            let mut reverse = Vec::new();
            let mut cursor = self.cn.list_reverse(*id).expect("list_reverse");
            while cursor.next().expect("reverse walk") {
                reverse.push(cursor.get_owned().expect("reverse get"));
            }
            let mut expected = cns.clone();
            expected.sort();
            assert_eq!(reverse, expected, "reverse direction diverged for {id}");
        }
        let expected_pairs: usize = self.written.values().map(Vec::len).sum();
        assert_eq!(self.cn.count().expect("count"), expected_pairs);
        assert_eq!(self.master.count().expect("count"), self.written.len());
    }
}

impl Default for DirectoryHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{
        alphabet, class_table, cn_index, init_tracing, master_with_entries, people_table,
    };
    use crate::generators::{run_walk, sorted_values_strategy, walk_strategy};
    use dirstore_core::{
        BrowserCursor, BrowserFactory, Direction, IndexEnumeration, MemBrowserFactory, StoreError,
        Tuple,
    };
    use dirstore_cursor::{natural, Cursor, CursorError, ListCursor};
    use proptest::prelude::*;
    use regex::Regex;

    #[test]
    fn table_scan_boundary_algebra() {
        init_tracing();
        let table = people_table();
        let mut cursor = table.tuples().unwrap();

        let mut forward = Vec::new();
        while cursor.next().unwrap() {
            forward.push(cursor.get_owned().unwrap());
        }
        assert_eq!(forward.len(), 4);

        // parked after-last; the walk reverses losslessly
        let mut backward = Vec::new();
        while cursor.previous().unwrap() {
            backward.push(cursor.get_owned().unwrap());
        }
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn closed_cursor_reports_the_original_cause() {
        let table = people_table();
        let mut cursor = table.tuples().unwrap();
        cursor.next().unwrap();
        cursor.close_with_cause("partition detached").unwrap();
        cursor.close().unwrap();
        cursor.close_with_cause("a later cause that must lose").unwrap();

        match cursor.next() {
            Err(CursorError::Closed { cause }) => {
                assert!(cause.contains("partition detached"));
                assert!(!cause.contains("must lose"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn duplicate_table_keeps_value_order() {
        let table = class_table();
        assert_eq!(table.count_of(&"person".into()).unwrap(), 3);
        assert_eq!(table.get(&"person".into()).unwrap(), Some(1));

        let mut ids = Vec::new();
        let mut cursor = table.values(&"person".into()).unwrap();
        while cursor.next().unwrap() {
            ids.push(*cursor.get().unwrap());
        }
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn bulk_mutation_is_atomic_across_layers() {
        let mut table = people_table();
        let mut extra = ListCursor::new(vec![
            "Imposter One".to_string(),
            "Imposter Two".to_string(),
        ])
        .unwrap();

        let err = table
            .put_all("uid=alice,ou=people".into(), &mut extra)
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidState { .. }));
        assert_eq!(
            table.get(&"uid=alice,ou=people".into()).unwrap(),
            Some("Alice Hart".into())
        );
        assert_eq!(table.count().unwrap(), 4);
    }

    #[test]
    fn master_sequence_is_monotonic_across_removals() {
        let mut harness = DirectoryHarness::new();
        let a = harness.add_entry(&["aaron"]).unwrap();
        let b = harness.add_entry(&["bob"]).unwrap();
        harness.remove_entry(a).unwrap();
        let c = harness.add_entry(&["carol"]).unwrap();

        assert!(a < b && b < c);
        assert_eq!(c, EntryId(3));
        harness.verify();
    }

    #[test]
    fn index_round_trip_through_the_harness() {
        let mut harness = DirectoryHarness::new();
        let alice = harness.add_entry(&["alice", "ally"]).unwrap();
        harness.add_entry(&["bob"]).unwrap();
        harness.verify();

        assert_eq!(
            harness.cn.forward_lookup(&"ally".into()).unwrap(),
            Some(alice)
        );

        harness.remove_entry(alice).unwrap();
        harness.verify();
        assert_eq!(harness.cn.forward_lookup(&"alice".into()).unwrap(), None);
    }

    #[test]
    fn index_range_and_regex_scans_agree() {
        let index = cn_index();

        let mut from_b = Vec::new();
        let mut cursor = index
            .list_forward_from(&"b".into(), Direction::GreaterOrEqual)
            .unwrap();
        while cursor.next().unwrap() {
            from_b.push(cursor.get().unwrap().value().clone());
        }
        assert_eq!(from_b, vec!["bob", "carol", "dan"]);

        let pattern = Regex::new("^a").unwrap();
        let mut matched = Vec::new();
        let mut cursor = index.list_forward_matching(&pattern, None).unwrap();
        while cursor.next().unwrap() {
            matched.push(cursor.get().unwrap().value().clone());
        }
        assert_eq!(matched, vec!["aaron", "alice", "ally"]);
    }

    #[test]
    fn alphabet_walk_reverses_losslessly() {
        let mut cursor = ListCursor::new(alphabet()).unwrap();

        let mut forward = Vec::new();
        while cursor.next().unwrap() {
            forward.push(*cursor.get().unwrap());
        }
        assert_eq!(forward, alphabet());

        let mut backward = Vec::new();
        while cursor.previous().unwrap() {
            backward.push(*cursor.get().unwrap());
        }
        backward.reverse();
        assert_eq!(backward, alphabet());
    }

    #[test]
    fn prebuilt_master_resumes_its_sequence() {
        let mut master = master_with_entries(3);
        assert_eq!(master.get(&EntryId(2)).unwrap(), Some("entry-2".into()));
        // the sequence picks up where the fixture left it
        assert_eq!(master.next_id().unwrap(), EntryId(4));
        assert_eq!(master.count().unwrap(), 3);
    }

    #[test]
    fn enumeration_swaps_roles_over_a_reverse_scan() {
        let index = cn_index();
        let mut e = IndexEnumeration::reverse(index.reverse_tuples().unwrap());

        let mut seen = Vec::new();
        while e.has_more().unwrap() {
            let record = e.next_record().unwrap();
            seen.push((record.id(), record.value().clone()));
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[0], (EntryId(1), "aaron".to_string()));
        // entry 2 carries two values, listed in value order
        assert_eq!(seen[1], (EntryId(2), "alice".to_string()));
        assert_eq!(seen[2], (EntryId(2), "ally".to_string()));
    }

    #[test]
    fn enumeration_wraps_an_index_scan_lazily() {
        let index = cn_index();
        let mut e = IndexEnumeration::forward(index.forward_tuples().unwrap())
            .with_filter(Regex::new("^al").unwrap());

        assert!(e.has_more().unwrap());
        assert_eq!(e.next_record().unwrap().value(), "alice");
        assert_eq!(e.next_record().unwrap().value(), "ally");
        assert!(!e.has_more().unwrap());
        assert!(matches!(
            e.next_record(),
            Err(StoreError::InvalidState { .. })
        ));
    }

    fn pairs(values: &[u64]) -> Vec<(u64, u64)> {
        values.iter().map(|v| (*v, v * 2)).collect()
    }

    proptest! {
        // A browser-backed cursor must be indistinguishable from a list
        // cursor over the same sorted pairs, whatever the walk.
        #[test]
        fn browser_cursor_matches_the_list_model(
            values in sorted_values_strategy(16),
            steps in walk_strategy(40),
        ) {
            let data = pairs(&values);

            let factory = MemBrowserFactory::new(data.clone());
            let mut subject = BrowserCursor::new(factory.browser().unwrap());

            let tuples = data.into_iter().map(|(k, v)| Tuple::new(k, v)).collect();
            let mut model = ListCursor::sorted(
                tuples,
                natural::<Tuple<u64, u64>>(),
            ).unwrap();

            let subject_trace = run_walk(&mut subject, &steps);
            let model_trace = run_walk(&mut model, &steps);
            prop_assert_eq!(subject_trace, model_trace);
        }
    }
}
