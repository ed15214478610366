//! Integration tests for SVM working-set selection
//!
//! Tests verify correctness across:
//! - The size invariant (exactly ws_size distinct indices)
//! - Determinism under a stable sort
//! - Warm-start carry-over between rounds
//! - Input validation and state misuse

use primr::algorithm::svm::{propose_working_set_size, WorkingSetSelector};
use primr::buffer::Buffer;
use primr::error::Error;
use primr::runtime::cpu::{CpuDevice, CpuRuntime};
use primr::runtime::{Device, Runtime};
use std::collections::HashSet;

fn cpu_selector(
    labels: &[f32],
    c: f32,
) -> (WorkingSetSelector<f32, CpuRuntime>, CpuDevice) {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);
    let labels_buf = Buffer::from_slice(labels, &device).unwrap();
    let selector = WorkingSetSelector::new(&client, labels_buf, c, labels.len()).unwrap();
    (selector, device)
}

fn buffers(
    alpha: &[f32],
    f: &[f32],
    device: &CpuDevice,
) -> (Buffer<f32, CpuRuntime>, Buffer<f32, CpuRuntime>) {
    (
        Buffer::from_slice(alpha, device).unwrap(),
        Buffer::from_slice(f, device).unwrap(),
    )
}

/// Synthetic training state: alternating labels, mixed alpha regimes,
/// deterministic pseudo-random gradients
fn synthetic_state(n: usize, c: f32) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
    let mut y = Vec::with_capacity(n);
    let mut alpha = Vec::with_capacity(n);
    let mut f = Vec::with_capacity(n);
    for i in 0..n {
        y.push(if i % 2 == 0 { 1.0 } else { -1.0 });
        alpha.push(match i % 3 {
            0 => 0.0,
            1 => c,
            _ => c / 2.0,
        });
        // LCG-ish spread with plenty of duplicate keys
        f.push(((i * 7919) % 101) as f32 / 101.0);
    }
    (y, alpha, f)
}

// ============================================================================
// Size invariant
// ============================================================================

#[test]
fn test_select_fills_exactly_ws_size_distinct() {
    let c = 1.0;
    let (y, alpha, f) = synthetic_state(300, c);
    let (mut selector, device) = cpu_selector(&y, c);
    selector.init().unwrap();

    assert_eq!(selector.ws_size(), 256);

    let (alpha_buf, f_buf) = buffers(&alpha, &f, &device);
    selector.select(&alpha_buf, &f_buf).unwrap();

    let ws = selector.working_set_indices().unwrap();
    assert_eq!(ws.len(), 256);
    let distinct: HashSet<u32> = ws.iter().copied().collect();
    assert_eq!(distinct.len(), 256);
    assert!(ws.iter().all(|&i| (i as usize) < 300));
}

#[test]
fn test_degenerate_working_set_equals_full_set() {
    // n_vectors == ws_size: every index must appear exactly once no matter
    // what the predicates say
    let c = 1.0;
    let y = [1.0, 1.0, -1.0, -1.0];
    let alpha = [0.0, c, c / 2.0, 0.0];
    let f = [0.3, 0.1, 0.2, 0.4];
    let (mut selector, device) = cpu_selector(&y, c);
    selector.init().unwrap();
    assert_eq!(selector.ws_size(), 4);

    let (alpha_buf, f_buf) = buffers(&alpha, &f, &device);
    selector.select(&alpha_buf, &f_buf).unwrap();

    let mut ws = selector.working_set_indices().unwrap();
    ws.sort_unstable();
    assert_eq!(ws, [0, 1, 2, 3]);
}

#[test]
fn test_one_sided_violators_exercise_backfill() {
    // All vectors are upper-only violators (alpha == 0, y == +1): the lower
    // pass contributes nothing and the backfill must complete the set
    let c = 10.0;
    let y = vec![1.0; 8];
    let alpha = vec![0.0; 8];
    let f: Vec<f32> = (0..8).map(|i| i as f32).collect();
    let (mut selector, device) = cpu_selector(&y, c);
    selector.init().unwrap();
    assert_eq!(selector.ws_size(), 8);

    let (alpha_buf, f_buf) = buffers(&alpha, &f, &device);
    selector.select(&alpha_buf, &f_buf).unwrap();

    let mut ws = selector.working_set_indices().unwrap();
    ws.sort_unstable();
    assert_eq!(ws, [0, 1, 2, 3, 4, 5, 6, 7]);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_identical_inputs_identical_selection() {
    let c = 2.0;
    let (y, alpha, f) = synthetic_state(200, c);

    let run = || {
        let (mut selector, device) = cpu_selector(&y, c);
        selector.init().unwrap();
        let (alpha_buf, f_buf) = buffers(&alpha, &f, &device);
        selector.select(&alpha_buf, &f_buf).unwrap();
        selector.working_set_indices().unwrap()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_upper_pass_follows_gradient_order() {
    // Upper violators are taken from the low-gradient head of the stable
    // ascending order
    let c = 1.0;
    let y = vec![1.0; 8];
    let alpha = vec![0.5; 8]; // every vector on both edges
    let f = [0.7, 0.1, 0.5, 0.3, 0.9, 0.2, 0.8, 0.6];
    let (mut selector, device) = cpu_selector(&y, c);
    selector.init().unwrap();

    let (alpha_buf, f_buf) = buffers(&alpha, &f, &device);
    selector.select(&alpha_buf, &f_buf).unwrap();

    let ws = selector.working_set_indices().unwrap();
    // First half: ascending-f head (indices of the 4 smallest gradients)
    assert_eq!(ws[..4], [1, 5, 3, 2]);
    // Second half: the tail of the lower-violator order, excluding committed
    let tail: HashSet<u32> = ws[4..].iter().copied().collect();
    assert_eq!(tail, HashSet::from([0, 6, 4, 7]));
}

// ============================================================================
// Warm start
// ============================================================================

#[test]
fn test_warm_start_carries_upper_half() {
    let c = 1.0;
    let (y, alpha, f) = synthetic_state(64, c);
    let (mut selector, device) = cpu_selector(&y, c);
    selector.init().unwrap();
    let ws_size = selector.ws_size();
    let q = ws_size / 2;

    let (alpha_buf, f_buf) = buffers(&alpha, &f, &device);
    selector.select(&alpha_buf, &f_buf).unwrap();
    let first_round = selector.working_set_indices().unwrap();

    selector.save_working_set_indices().unwrap();
    selector.select(&alpha_buf, &f_buf).unwrap();
    let second_round = selector.working_set_indices().unwrap();

    // The first q slots of round two are round one's upper half
    assert_eq!(&second_round[..q], &first_round[q..]);

    // And no carried slot is re-emitted as a new selection
    let distinct: HashSet<u32> = second_round.iter().copied().collect();
    assert_eq!(distinct.len(), ws_size);
}

#[test]
fn test_multi_round_selection_stays_consistent() {
    let c = 1.0;
    let (y, mut alpha, f) = synthetic_state(128, c);
    let (mut selector, device) = cpu_selector(&y, c);
    selector.init().unwrap();
    let ws_size = selector.ws_size();

    let f_buf = Buffer::from_slice(&f, &device).unwrap();
    for round in 0..5 {
        // Perturb alphas between rounds the way an optimizer would
        for (i, a) in alpha.iter_mut().enumerate() {
            if (i + round) % 7 == 0 {
                *a = (*a + c / 4.0).min(c);
            }
        }
        let alpha_buf = Buffer::from_slice(&alpha, &device).unwrap();
        selector.select(&alpha_buf, &f_buf).unwrap();

        let ws = selector.working_set_indices().unwrap();
        let distinct: HashSet<u32> = ws.iter().copied().collect();
        assert_eq!(distinct.len(), ws_size, "round {}", round);
        assert!(ws.iter().all(|&i| (i as usize) < 128));

        selector.save_working_set_indices().unwrap();
    }
}

// ============================================================================
// Validation and sizing
// ============================================================================

#[test]
fn test_select_before_init_fails() {
    let y = [1.0, -1.0, 1.0, -1.0];
    let (mut selector, device) = cpu_selector(&y, 1.0);
    let (alpha_buf, f_buf) = buffers(&[0.0; 4], &[0.0; 4], &device);

    let err = selector.select(&alpha_buf, &f_buf).unwrap_err();
    assert!(matches!(err, Error::Internal(_)));
}

#[test]
fn test_wrong_length_inputs_rejected() {
    let y = [1.0, -1.0, 1.0, -1.0];
    let (mut selector, device) = cpu_selector(&y, 1.0);
    selector.init().unwrap();

    let (short_alpha, f_buf) = buffers(&[0.0; 3], &[0.0; 4], &device);
    let err = selector.select(&short_alpha, &f_buf).unwrap_err();
    assert!(matches!(err, Error::LengthMismatch { .. }));
}

#[test]
fn test_invalid_construction_rejected() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);

    let labels = Buffer::<f32, CpuRuntime>::from_slice(&[1.0, -1.0], &device).unwrap();
    assert!(WorkingSetSelector::new(&client, labels, 0.0, 2).is_err());

    let labels = Buffer::<f32, CpuRuntime>::from_slice(&[1.0, -1.0], &device).unwrap();
    assert!(WorkingSetSelector::new(&client, labels, 1.0, 3).is_err());
}

#[test]
fn test_proposed_size_is_pow2_and_capped() {
    let device = CpuDevice::new();
    assert_eq!(propose_working_set_size(&device, 0), 0);
    assert_eq!(propose_working_set_size(&device, 1), 1);
    assert_eq!(propose_working_set_size(&device, 4), 4);
    assert_eq!(propose_working_set_size(&device, 5), 4);
    assert_eq!(propose_working_set_size(&device, 300), 256);
    assert_eq!(
        propose_working_set_size(&device, 1 << 20),
        device.max_work_group_size()
    );
}
