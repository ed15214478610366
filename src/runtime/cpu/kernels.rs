//! CPU kernel implementations
//!
//! Low-level compute kernels for the selection primitives. Kernels are
//! generic over the element/word type and operate on raw device pointers,
//! standing in for the parallel-for launches of a device backend. Parallel
//! kernels use relaxed atomics exactly where a device lane would.

#![allow(unsafe_op_in_unsafe_fn)] // Kernels are already marked unsafe, inner unsafe is redundant

use crate::bitmap::BitWord;
use crate::dtype::Element;
use crate::ops::ViolatingEdge;
use bytemuck::Zeroable;
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Shared raw pointer for disjoint parallel writes
///
/// Emitting lanes write non-overlapping ranges claimed through an atomic
/// counter, so the aliasing is race-free by construction.
#[derive(Copy, Clone)]
struct SyncPtr<T>(*mut T);

unsafe impl<T> Send for SyncPtr<T> {}
unsafe impl<T> Sync for SyncPtr<T> {}

// ============================================================================
// Sort / partition
// ============================================================================

/// Stable argsort of `keys` ascending, writing the permutation to `out`
///
/// Ties preserve original index order. Incomparable keys (NaN) compare as
/// equal, which keeps the sort total and deterministic.
///
/// # Safety
/// - `keys` must be valid for reads of `len` elements
/// - `out` must be valid for writes of `len` elements and not overlap `keys`
pub unsafe fn argsort_kernel<T: Element>(keys: *const T, out: *mut u32, len: usize) {
    let keys = std::slice::from_raw_parts(keys, len);
    let out = std::slice::from_raw_parts_mut(out, len);

    for (i, slot) in out.iter_mut().enumerate() {
        *slot = i as u32;
    }
    out.sort_by(|&a, &b| {
        keys[a as usize]
            .partial_cmp(&keys[b as usize])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Gather `values[i] = keys[perm[i]]`
///
/// # Safety
/// - `keys` and `perm` must be valid for reads of `len` elements
/// - `values` must be valid for writes of `len` elements, no overlap
pub unsafe fn gather_kernel<T: Element>(
    keys: *const T,
    perm: *const u32,
    values: *mut T,
    len: usize,
) {
    let keys = std::slice::from_raw_parts(keys, len);
    let perm = std::slice::from_raw_parts(perm, len);
    let values = std::slice::from_raw_parts_mut(values, len);

    for i in 0..len {
        values[i] = keys[perm[i] as usize];
    }
}

/// Emit flagged entries of `source` into `out` preserving order
///
/// Returns the number of entries emitted. The scan is sequential: stability
/// is load-bearing here, and the reference backend keeps it trivially.
///
/// # Safety
/// - `indicator` must be valid for reads of `indicator_len` elements
/// - `source` must be valid for reads of `len` elements, every entry below
///   `indicator_len`
/// - `out` must be valid for writes of `len` elements
pub unsafe fn flagged_index_kernel(
    indicator: *const u8,
    indicator_len: usize,
    source: *const u32,
    out: *mut u32,
    len: usize,
) -> usize {
    let indicator = std::slice::from_raw_parts(indicator, indicator_len);
    let source = std::slice::from_raw_parts(source, len);
    let out = std::slice::from_raw_parts_mut(out, len);

    let mut count = 0;
    for &idx in source {
        if indicator[idx as usize] != 0 {
            out[count] = idx;
            count += 1;
        }
    }
    count
}

// ============================================================================
// Indicator kernels
// ============================================================================

#[inline]
fn on_edge<T: Element>(y: T, alpha: T, c: T, edge: ViolatingEdge) -> bool {
    let zero = T::zeroed();
    match edge {
        ViolatingEdge::Up => (y > zero && alpha < c) || (y < zero && alpha > zero),
        ViolatingEdge::Low => (y > zero && alpha > zero) || (y < zero && alpha < c),
    }
}

/// Recompute the violating-edge indicator over all `len` vectors
///
/// # Safety
/// - `y` and `alpha` must be valid for reads of `len` elements
/// - `indicator` must be valid for writes of `len` elements, no overlap
pub unsafe fn check_edge_kernel<T: Element>(
    y: *const T,
    alpha: *const T,
    indicator: *mut u8,
    c: T,
    edge: ViolatingEdge,
    len: usize,
) {
    let y = std::slice::from_raw_parts(y, len);
    let alpha = std::slice::from_raw_parts(alpha, len);
    let indicator = std::slice::from_raw_parts_mut(indicator, len);

    #[cfg(feature = "rayon")]
    indicator.par_iter_mut().enumerate().for_each(|(i, flag)| {
        *flag = on_edge(y[i], alpha[i], c, edge) as u8;
    });

    #[cfg(not(feature = "rayon"))]
    for (i, flag) in indicator.iter_mut().enumerate() {
        *flag = on_edge(y[i], alpha[i], c, edge) as u8;
    }
}

/// Zero the indicator at each of the first `n` committed indices
///
/// # Safety
/// - `indices` must be valid for reads of `n` elements, every entry below
///   `indicator_len`
/// - `indicator` must be valid for writes of `indicator_len` elements
pub unsafe fn reset_indicator_kernel(
    indices: *const u32,
    indicator: *mut u8,
    n: usize,
    indicator_len: usize,
) {
    let indices = std::slice::from_raw_parts(indices, n);
    let indicator = std::slice::from_raw_parts_mut(indicator, indicator_len);

    for &idx in indices {
        indicator[idx as usize] = 0;
    }
}

// ============================================================================
// Frontier kernels
// ============================================================================

/// Compact the two-layer bitmap into `offsets[1..]`, count in `offsets[0]`
///
/// Mirrors the device variant: a guard pass records whether `offsets[0]` is
/// zero into `caf_flag` and the scan bails out when it is not (compaction
/// already ran for this bitmap state). Each worker claims an output range
/// with one `fetch_add` of the covered word's popcount, the CPU rendering of
/// work-group local accumulation.
///
/// # Safety
/// - `data` must be valid for reads of `data_len` words, `mlb` for
///   `mlb_len` words covering `data`
/// - `offsets` must be valid for writes of `num_items + 1` elements
/// - `caf_flag` must be valid for writes of one element
/// - no set bit in `data` may lie at or past `num_items`
pub unsafe fn compact_frontier_kernel<W: BitWord>(
    data: *const W,
    data_len: usize,
    mlb: *const W,
    mlb_len: usize,
    offsets: *mut u32,
    caf_flag: *mut u32,
    num_items: usize,
) {
    let already_computed = *offsets != 0;
    *caf_flag = if already_computed { 0 } else { 1 };
    if already_computed {
        return;
    }

    let data = std::slice::from_raw_parts(data, data_len);
    let mlb = std::slice::from_raw_parts(mlb, mlb_len);
    let count = AtomicU32::from_ptr(offsets);
    let out = SyncPtr(offsets.add(1));

    let scan_block = |meta_idx: usize| {
        // Capture the wrapper whole: closure captures must stay `Sync`, and
        // edition-2021 disjoint capture would otherwise grab the raw field.
        let out = out;
        let meta = mlb[meta_idx];
        if meta == W::zero() {
            return;
        }
        for b in 0..W::BITS as usize {
            if meta & (W::one() << b) == W::zero() {
                continue;
            }
            let block = meta_idx * W::BITS as usize + b;
            if block >= data_len {
                break;
            }
            let word = data[block];
            let popcount = word.count_ones();
            if popcount == 0 {
                continue;
            }
            let base = count.fetch_add(popcount, Ordering::Relaxed) as usize;
            let mut slot = 0;
            for i in 0..W::BITS as usize {
                if word & (W::one() << i) != W::zero() {
                    let idx = block * W::BITS as usize + i;
                    debug_assert!(idx < num_items, "set bit {} past frontier end", idx);
                    unsafe { *out.0.add(base + slot) = idx as u32 };
                    slot += 1;
                }
            }
        }
    };

    #[cfg(feature = "rayon")]
    (0..mlb_len).into_par_iter().for_each(scan_block);

    #[cfg(not(feature = "rayon"))]
    (0..mlb_len).for_each(scan_block);
}

/// Population test over the meta layer, result (0 or 1) written to `out_any`
///
/// # Safety
/// - `mlb` must be valid for reads of `mlb_len` words
/// - `out_any` must be valid for writes of one element
pub unsafe fn mlb_any_kernel<W: BitWord>(mlb: *const W, mlb_len: usize, out_any: *mut u32) {
    let mlb = std::slice::from_raw_parts(mlb, mlb_len);

    #[cfg(feature = "rayon")]
    let any = mlb.par_iter().any(|&w| w != W::zero());

    #[cfg(not(feature = "rayon"))]
    let any = mlb.iter().any(|&w| w != W::zero());

    *out_any = any as u32;
}
