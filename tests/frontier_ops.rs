//! Integration tests for the two-layer bitmap frontier
//!
//! Tests verify correctness across:
//! - Membership exactness after compaction (no duplicates, no omissions)
//! - The compaction idempotence guard and its reset on mutation
//! - clear/swap/is_empty semantics
//! - Concurrent device-view inserts
//! - u32 and u64 word types

use primr::bitmap::{swap_frontiers, Frontier};
use primr::runtime::cpu::{CpuDevice, CpuRuntime};
use primr::runtime::Runtime;

fn cpu_frontier(num_items: usize) -> Frontier<u32, CpuRuntime> {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);
    Frontier::new(&client, num_items).unwrap()
}

fn sorted_active(frontier: &Frontier<u32, CpuRuntime>) -> Vec<u32> {
    let mut active = frontier.active_to_vec().unwrap();
    active.sort_unstable();
    active
}

// ============================================================================
// Membership exactness
// ============================================================================

#[test]
fn test_compaction_matches_inserted_set() {
    let mut frontier = cpu_frontier(1000);

    let inserted = [0u32, 1, 31, 32, 63, 64, 500, 999];
    for &idx in &inserted {
        frontier.insert(idx).unwrap();
    }
    frontier.compute_active_frontier().unwrap();

    assert_eq!(frontier.active_count().unwrap(), inserted.len());
    assert_eq!(sorted_active(&frontier), inserted);
}

#[test]
fn test_duplicate_inserts_not_duplicated() {
    let mut frontier = cpu_frontier(100);

    frontier.insert(42).unwrap();
    frontier.insert(42).unwrap();
    frontier.insert(42).unwrap();
    frontier.compute_active_frontier().unwrap();

    assert_eq!(frontier.active_count().unwrap(), 1);
    assert_eq!(frontier.active_to_vec().unwrap(), [42]);
}

#[test]
fn test_check_without_compaction() {
    let mut frontier = cpu_frontier(128);

    frontier.insert(65).unwrap();
    assert!(frontier.check(65).unwrap());
    assert!(!frontier.check(64).unwrap());
    assert!(frontier.check(128).is_err());
}

#[test]
fn test_wide_word_frontier() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);
    let mut frontier = Frontier::<u64, CpuRuntime>::new(&client, 10_000).unwrap();

    for idx in (0..10_000).step_by(777) {
        frontier.insert(idx).unwrap();
    }
    frontier.compute_active_frontier().unwrap();

    let mut active = frontier.active_to_vec().unwrap();
    active.sort_unstable();
    let expected: Vec<u32> = (0..10_000).step_by(777).collect();
    assert_eq!(active, expected);
}

// ============================================================================
// Idempotence guard
// ============================================================================

#[test]
fn test_compaction_runs_once_per_dirty_period() {
    let mut frontier = cpu_frontier(64);

    frontier.insert(3).unwrap();
    frontier.compute_active_frontier().unwrap();
    assert_eq!(frontier.active_count().unwrap(), 1);

    // Repeat without mutation: must not scan again or duplicate entries
    frontier.compute_active_frontier().unwrap();
    assert_eq!(frontier.active_count().unwrap(), 1);
    assert_eq!(frontier.active_to_vec().unwrap(), [3]);
}

#[test]
fn test_frontier_recompacts_after_insert() {
    let mut frontier = cpu_frontier(64);

    frontier.insert(3).unwrap();
    frontier.compute_active_frontier().unwrap();
    assert_eq!(frontier.active_to_vec().unwrap(), [3]);

    // Mutation resets the guard: the second compaction must observe bit 7
    frontier.insert(7).unwrap();
    frontier.compute_active_frontier().unwrap();
    assert_eq!(sorted_active(&frontier), [3, 7]);
}

#[test]
fn test_view_insert_resets_guard() {
    let mut frontier = cpu_frontier(64);

    frontier.insert(3).unwrap();
    frontier.compute_active_frontier().unwrap();

    frontier.device_view().insert(9);
    frontier.compute_active_frontier().unwrap();
    assert_eq!(sorted_active(&frontier), [3, 9]);
}

// ============================================================================
// clear / is_empty / swap
// ============================================================================

#[test]
fn test_clear_resets_fully() {
    let mut frontier = cpu_frontier(256);

    for idx in [1, 2, 3, 100, 200] {
        frontier.insert(idx).unwrap();
    }
    frontier.compute_active_frontier().unwrap();
    frontier.clear().unwrap();

    for i in 0..256 {
        assert!(!frontier.check(i).unwrap());
    }
    frontier.compute_active_frontier().unwrap();
    assert_eq!(frontier.active_count().unwrap(), 0);
}

#[test]
fn test_is_empty() {
    let mut frontier = cpu_frontier(100);
    assert!(frontier.is_empty().unwrap());

    frontier.insert(55).unwrap();
    assert!(!frontier.is_empty().unwrap());

    frontier.clear().unwrap();
    assert!(frontier.is_empty().unwrap());
}

#[test]
fn test_swap_exchanges_contents() {
    let mut f1 = cpu_frontier(64);
    let mut f2 = cpu_frontier(64);

    f1.insert(1).unwrap();
    f1.insert(2).unwrap();
    f2.insert(3).unwrap();

    swap_frontiers(&mut f1, &mut f2);

    assert!(f1.check(3).unwrap());
    assert!(!f1.check(1).unwrap());
    assert!(f2.check(1).unwrap());
    assert!(f2.check(2).unwrap());
    assert!(!f2.check(3).unwrap());
}

// ============================================================================
// Traversal
// ============================================================================

/// One level of BFS-style advance driven by the compacted active set
fn advance(
    current: &mut Frontier<u32, CpuRuntime>,
    next: &mut Frontier<u32, CpuRuntime>,
    adjacency: &[Vec<u32>],
) {
    current.compute_active_frontier().unwrap();
    let view = next.device_view();
    for &u in &current.active_to_vec().unwrap() {
        for &v in &adjacency[u as usize] {
            view.insert(v);
        }
    }
}

#[test]
fn test_triangle_advance() {
    // 3-vertex graph with edges 0-1, 0-2, 1-2
    let adjacency = vec![vec![1, 2], vec![0, 2], vec![0, 1]];
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    let mut a = Frontier::<u32, CpuRuntime>::new(&client, 3).unwrap();
    let mut b = Frontier::<u32, CpuRuntime>::new(&client, 3).unwrap();
    let mut c = Frontier::<u32, CpuRuntime>::new(&client, 3).unwrap();

    a.insert(0).unwrap();
    assert!(a.check(0).unwrap());
    assert!(!a.check(1).unwrap());
    assert!(!a.check(2).unwrap());

    advance(&mut a, &mut b, &adjacency);
    assert!(!b.check(0).unwrap());
    assert!(b.check(1).unwrap());
    assert!(b.check(2).unwrap());

    advance(&mut b, &mut c, &adjacency);
    assert!(c.check(0).unwrap());
    assert!(c.check(1).unwrap());
    assert!(c.check(2).unwrap());
}

#[test]
fn test_concurrent_view_inserts() {
    let mut frontier = cpu_frontier(10_000);
    let view = frontier.device_view();

    std::thread::scope(|scope| {
        for t in 0..8u32 {
            scope.spawn(move || {
                let mut idx = t;
                while idx < 10_000 {
                    view.insert(idx);
                    idx += 8;
                }
            });
        }
    });

    frontier.compute_active_frontier().unwrap();
    assert_eq!(frontier.active_count().unwrap(), 10_000);
    let expected: Vec<u32> = (0..10_000).collect();
    assert_eq!(sorted_active(&frontier), expected);
}
