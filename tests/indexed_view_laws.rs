//! Property-based tests for IndexedView.
//!
//! These tests check the positional laws of the view against a sorted,
//! deduplicated `Vec` model using proptest.

use std::collections::BTreeSet;

use proptest::prelude::*;
use treelist::view::IndexedView;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

/// Operations applied to both the view and the model.
#[derive(Debug, Clone)]
enum Operation {
    Insert(i16),
    Remove(i16),
    RemoveAt(usize),
    Get(usize),
    IndexOf(i16),
}

fn arbitrary_operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        any::<i16>().prop_map(Operation::Insert),
        any::<i16>().prop_map(Operation::Remove),
        (0usize..64).prop_map(Operation::RemoveAt),
        (0usize..64).prop_map(Operation::Get),
        any::<i16>().prop_map(Operation::IndexOf),
    ]
}

fn sorted_model(elements: &[i16]) -> Vec<i16> {
    elements
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// =============================================================================
// Construction Laws
// =============================================================================

proptest! {
    /// Law: the length is the number of distinct elements inserted, and
    /// traversal is ascending.
    #[test]
    fn prop_inserts_yield_sorted_distinct(elements in prop::collection::vec(any::<i16>(), 0..64)) {
        let view = IndexedView::new();
        for element in &elements {
            view.insert(*element);
        }
        let model = sorted_model(&elements);
        prop_assert_eq!(view.len(), model.len());
        prop_assert_eq!(view.to_vec(), model);
    }

    /// Law: get(i) is the i-th element in ascending order, and fails past the end.
    #[test]
    fn prop_get_matches_sorted_position(elements in prop::collection::vec(any::<i16>(), 0..64)) {
        let view: IndexedView<i16> = elements.iter().copied().collect();
        let model = sorted_model(&elements);
        for (index, expected) in model.iter().enumerate() {
            prop_assert_eq!(view.get(index), Ok(*expected));
        }
        prop_assert!(view.get(model.len()).is_err());
    }
}

// =============================================================================
// Round-trip Laws
// =============================================================================

proptest! {
    /// Law: get(index_of(e)) == e for every present element.
    #[test]
    fn prop_index_of_get_round_trip(elements in prop::collection::vec(any::<i16>(), 1..64)) {
        let view: IndexedView<i16> = elements.iter().copied().collect();
        for element in &elements {
            let index = view.index_of(element);
            prop_assert!(index.is_some());
            prop_assert_eq!(view.get(index.unwrap_or_default()), Ok(*element));
            prop_assert_eq!(view.last_index_of(element), index);
        }
    }

    /// Law: sub_range(from, to) holds exactly the elements at positions from..to.
    #[test]
    fn prop_sub_range_matches_slice(
        elements in prop::collection::vec(any::<i16>(), 0..32),
        from_seed in any::<usize>(),
        width_seed in any::<usize>(),
    ) {
        let view: IndexedView<i16> = elements.iter().copied().collect();
        let model = sorted_model(&elements);
        let from_index = from_seed % (model.len() + 1);
        let to_index = from_index + width_seed % (model.len() - from_index + 1);

        let range = view.sub_range(from_index, to_index).unwrap();
        prop_assert_eq!(range.to_vec(), model[from_index..to_index].to_vec());
        prop_assert_eq!(range.len(), to_index - from_index);
    }
}

// =============================================================================
// Cache Coherence Laws
// =============================================================================

proptest! {
    /// Law: any interleaving of mutations and indexed reads agrees with the
    /// model after every step.
    #[test]
    fn prop_interleaved_operations_match_model(
        seed in prop::collection::vec(any::<i16>(), 0..32),
        operations in prop::collection::vec(arbitrary_operation(), 0..64),
    ) {
        let view: IndexedView<i16> = seed.iter().copied().collect();
        let mut model = sorted_model(&seed);

        for operation in operations {
            match operation {
                Operation::Insert(element) => {
                    let absent = model.binary_search(&element).is_err();
                    prop_assert_eq!(view.insert(element), absent);
                    if let Err(position) = model.binary_search(&element) {
                        model.insert(position, element);
                    }
                }
                Operation::Remove(element) => {
                    let found = model.binary_search(&element);
                    prop_assert_eq!(view.remove(&element), found.is_ok());
                    if let Ok(position) = found {
                        model.remove(position);
                    }
                }
                Operation::RemoveAt(index) => {
                    if index < model.len() {
                        prop_assert_eq!(view.remove_at(index), Ok(model.remove(index)));
                    } else {
                        prop_assert!(view.remove_at(index).is_err());
                    }
                }
                Operation::Get(index) => {
                    prop_assert_eq!(view.get(index).ok(), model.get(index).copied());
                }
                Operation::IndexOf(element) => {
                    prop_assert_eq!(view.index_of(&element), model.binary_search(&element).ok());
                }
            }
            prop_assert_eq!(view.len(), model.len());
        }
        prop_assert_eq!(view.to_vec(), model);
    }

    /// Law: a range view follows its parent's mutations within its bounds.
    #[test]
    fn prop_range_view_stays_live(
        seed in prop::collection::vec(0i16..100, 2..32),
        inserted in prop::collection::vec(0i16..100, 0..16),
    ) {
        let view: IndexedView<i16> = seed.iter().copied().collect();
        let model = sorted_model(&seed);
        prop_assume!(model.len() >= 2);
        let (lower, upper) = (model[0], model[model.len() - 1]);
        let range = view.sub_range(0, model.len() - 1).unwrap();
        let _ = range.len();

        view.insert_all(inserted.iter().copied());
        let expected: Vec<i16> = view
            .to_vec()
            .into_iter()
            .filter(|element| (lower..upper).contains(element))
            .collect();
        prop_assert_eq!(range.to_vec(), expected);
    }
}
