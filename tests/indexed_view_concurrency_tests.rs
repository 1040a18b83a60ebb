//! Concurrency tests for IndexedView.
//!
//! These tests share one view between threads and check that readers never
//! observe a positional cache that disagrees with the set, and that
//! concurrent writers do not lose elements.
//!
//! # Running these tests
//!
//! ```bash
//! cargo test --test indexed_view_concurrency_tests
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use rstest::rstest;
use treelist::view::IndexedView;

/// Concurrent inserts of disjoint elements all land.
#[rstest]
fn test_concurrent_inserts_are_not_lost() {
    let view: Arc<IndexedView<i32>> = Arc::new(IndexedView::new());
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let view = Arc::clone(&view);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for offset in 0..250 {
                    assert!(view.insert(worker * 250 + offset));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(view.len(), 2000);
    for index in [0, 999, 1999] {
        assert_eq!(view.get(index), Ok(index as i32));
    }
}

/// Readers racing a writer only ever see positions that match the set.
///
/// Elements are even numbers `0, 2, 4, ...`; the writer inserts and removes
/// one odd number at a time. An even element `2k` therefore sits at position
/// `k`, or `k + 1` while a smaller odd number is present.
#[rstest]
fn test_readers_never_see_stale_positions() {
    let view: Arc<IndexedView<i32>> = Arc::new((0..200).map(|value| value * 2).collect());
    let stop = Arc::new(AtomicBool::new(false));

    let writer = {
        let view = Arc::clone(&view);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            for round in 0..500 {
                let odd = (round % 200) * 2 + 1;
                view.insert(odd);
                view.remove(&odd);
            }
            stop.store(true, Ordering::SeqCst);
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let view = Arc::clone(&view);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::SeqCst) {
                    let len = view.len();
                    for index in (0..len).step_by(17) {
                        match view.get(index) {
                            Ok(element) if element % 2 == 0 => {
                                let rank = element / 2;
                                let index = index as i32;
                                assert!(index == rank || index == rank + 1);
                            }
                            Ok(element) => assert_eq!(element % 2, 1),
                            Err(error) => assert!(error.index >= error.len),
                        }
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(view.len(), 200);
    assert_eq!(view.index_of(&398), Some(199));
}

/// Many readers materializing the cache at once agree on every position.
#[rstest]
fn test_concurrent_materialization_is_consistent() {
    for _ in 0..20 {
        let view: Arc<IndexedView<i32>> = Arc::new((0..512).collect());
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let view = Arc::clone(&view);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let stride = worker + 1;
                    for index in (0..512).step_by(stride) {
                        assert_eq!(view.get(index), Ok(index as i32));
                    }
                    assert_eq!(view.index_of(&511), Some(511));
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}

/// Concurrent `remove_at(0)` calls each remove a distinct element.
#[rstest]
fn test_concurrent_remove_at_drains_exactly_once() {
    let view: Arc<IndexedView<i32>> = Arc::new((0..1000).collect());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let view = Arc::clone(&view);
            thread::spawn(move || {
                let mut removed = Vec::new();
                while let Ok(element) = view.remove_at(0) {
                    removed.push(element);
                }
                removed
            })
        })
        .collect();

    let mut removed: Vec<i32> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();
    removed.sort_unstable();

    assert!(view.is_empty());
    assert_eq!(removed, (0..1000).collect::<Vec<_>>());
}

/// A range view read from one thread while another mutates the parent.
#[rstest]
fn test_range_view_under_concurrent_mutation() {
    let view: IndexedView<i32> = (0..100).map(|value| value * 10).collect();
    let range = view.sub_range(10, 20).unwrap();

    thread::scope(|scope| {
        scope.spawn(|| {
            for value in 101..=109 {
                view.insert(value);
            }
        });
        scope.spawn(|| {
            for _ in 0..100 {
                let snapshot = range.to_vec();
                assert!(snapshot.windows(2).all(|pair| pair[0] < pair[1]));
                assert!(snapshot.iter().all(|element| (100..200).contains(element)));
            }
        });
    });

    assert_eq!(range.len(), 19);
}
