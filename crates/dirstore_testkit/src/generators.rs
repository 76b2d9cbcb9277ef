//! Property-based test generators using proptest.
//!
//! Provides strategies for random cursor walk scripts and value sets, and
//! a trace helper for checking any cursor against a reference cursor over
//! the same data.

use dirstore_cursor::Cursor;
use proptest::prelude::*;
use std::collections::BTreeSet;

/// One step of a cursor walk script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStep {
    /// Advance forward.
    Next,
    /// Advance backward.
    Previous,
    /// Jump onto the first element.
    First,
    /// Jump onto the last element.
    Last,
    /// Park before the first element.
    BeforeFirst,
    /// Park after the last element.
    AfterLast,
}

/// Strategy for one walk step, biased toward stepping.
pub fn walk_step_strategy() -> impl Strategy<Value = WalkStep> {
    prop_oneof![
        3 => Just(WalkStep::Next),
        3 => Just(WalkStep::Previous),
        1 => Just(WalkStep::First),
        1 => Just(WalkStep::Last),
        1 => Just(WalkStep::BeforeFirst),
        1 => Just(WalkStep::AfterLast),
    ]
}

/// Strategy for a walk script of up to `max_len` steps.
pub fn walk_strategy(max_len: usize) -> impl Strategy<Value = Vec<WalkStep>> {
    prop::collection::vec(walk_step_strategy(), 0..=max_len)
}

/// Strategy for a sorted set of distinct values.
pub fn sorted_values_strategy(max_len: usize) -> impl Strategy<Value = Vec<u64>> {
    prop::collection::btree_set(0u64..1000, 0..=max_len)
        .prop_map(|set: BTreeSet<u64>| set.into_iter().collect())
}

/// What one walk step observed: the step result (None for positioning
/// calls) and the element under the cursor afterwards.
pub type WalkTrace<T> = Vec<(Option<bool>, Option<T>)>;

/// Runs a walk script, recording every step's outcome and the element
/// under the cursor after it.
pub fn run_walk<C>(cursor: &mut C, steps: &[WalkStep]) -> WalkTrace<C::Item>
where
    C: Cursor + ?Sized,
    C::Item: Clone,
{
    let mut trace = Vec::with_capacity(steps.len());
    for step in steps {
        let moved = match step {
            WalkStep::Next => Some(cursor.next().expect("walk next")),
            WalkStep::Previous => Some(cursor.previous().expect("walk previous")),
            WalkStep::First => Some(cursor.first().expect("walk first")),
            WalkStep::Last => Some(cursor.last().expect("walk last")),
            WalkStep::BeforeFirst => {
                cursor.before_first().expect("walk before_first");
                None
            }
            WalkStep::AfterLast => {
                cursor.after_last().expect("walk after_last");
                None
            }
        };
        let on = cursor
            .available()
            .then(|| cursor.get_owned().expect("walk get"));
        trace.push((moved, on));
    }
    trace
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirstore_cursor::ListCursor;

    proptest! {
        #[test]
        fn sorted_values_are_strictly_increasing(values in sorted_values_strategy(32)) {
            prop_assert!(values.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn a_successful_next_then_previous_lands_back(
            values in sorted_values_strategy(16),
            steps in walk_strategy(24),
        ) {
            let mut cursor = ListCursor::new(values).unwrap();
            run_walk(&mut cursor, &steps);

            if cursor.available() {
                let here = *cursor.get().unwrap();
                if cursor.next().unwrap() {
                    prop_assert!(cursor.previous().unwrap());
                    prop_assert_eq!(*cursor.get().unwrap(), here);
                }
            }
        }

        #[test]
        fn walks_never_escape_the_boundaries(
            values in sorted_values_strategy(16),
            steps in walk_strategy(32),
        ) {
            let mut cursor = ListCursor::new(values.clone()).unwrap();
            for (moved, on) in run_walk(&mut cursor, &steps) {
                if moved == Some(true) {
                    prop_assert!(on.is_some());
                    prop_assert!(values.contains(&on.unwrap()));
                } else if moved == Some(false) {
                    prop_assert!(on.is_none());
                }
            }
        }
    }
}
