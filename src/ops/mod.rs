//! Kernel capability traits implemented per backend client
//!
//! The generic components ([`crate::bitmap::Frontier`],
//! [`crate::algorithm::svm::WorkingSetSelector`]) are written against these
//! traits; each backend client implements them with its own kernels. The CPU
//! client is the reference implementation.

use crate::bitmap::BitWord;
use crate::buffer::Buffer;
use crate::dtype::Element;
use crate::error::Result;
use crate::runtime::{Runtime, RuntimeClient};

/// Which side of the KKT box constraint a pass is scanning for
///
/// A training vector is an upper violator when its dual variable can still
/// move up (`y > 0 && alpha < C` or `y < 0 && alpha > 0`), a lower violator
/// in the mirrored case.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ViolatingEdge {
    /// Upper edge: candidates for ascent
    Up,
    /// Lower edge: candidates for descent
    Low,
}

/// Sort, partition, and indicator kernels used by working-set selection
pub trait SelectionOps<R: Runtime>: RuntimeClient<R> {
    /// Stable argsort of `keys` ascending into `sorted_indices`
    ///
    /// Ties preserve original index order; the selector's determinism
    /// depends on it. `values`, `values_scratch` and `indices_scratch` are
    /// caller-owned scratch sized like `keys`; device backends use them for
    /// radix passes, the CPU backend sorts in place through
    /// `sorted_indices`. No allocation happens per call.
    fn argsort<T: Element>(
        &self,
        keys: &Buffer<T, R>,
        sorted_indices: &mut Buffer<u32, R>,
        values: &mut Buffer<T, R>,
        values_scratch: &mut Buffer<T, R>,
        indices_scratch: &mut Buffer<u32, R>,
    ) -> Result<()>;

    /// Mark `indicator[i] = 1` for every `i` on the given violating edge
    ///
    /// Recomputes the whole indicator; previous contents are overwritten.
    fn check_violating_edge<T: Element>(
        &self,
        y: &Buffer<T, R>,
        alpha: &Buffer<T, R>,
        indicator: &mut Buffer<u8, R>,
        c: T,
        edge: ViolatingEdge,
    ) -> Result<()>;

    /// Zero `indicator[indices[j]]` for `j in 0..n`
    ///
    /// Used to exclude already-committed working-set slots from a pass.
    fn reset_indicator(
        &self,
        indices: &Buffer<u32, R>,
        indicator: &mut Buffer<u8, R>,
        n: usize,
    ) -> Result<()>;

    /// Order-preserving compaction of flagged indices
    ///
    /// Emits, in `source` order, every `source[j]` with
    /// `indicator[source[j]] != 0` into `out`, and returns the emitted
    /// count. Relative order of survivors is preserved (stable filter).
    fn flagged_index_compaction(
        &self,
        indicator: &Buffer<u8, R>,
        source: &Buffer<u32, R>,
        out: &mut Buffer<u32, R>,
    ) -> Result<usize>;
}

/// Bitmap-walk kernels used by the frontier
pub trait FrontierOps<R: Runtime>: RuntimeClient<R> {
    /// Compact the two-layer bitmap into a dense active-index list
    ///
    /// Walks `mlb`, and for each set meta-bit scans the covered `data` word,
    /// emitting global bit indices into `offsets[1..]` with the running
    /// count kept in `offsets[0]`. Early-exits when `offsets[0]` is already
    /// non-zero (compaction already ran for the current bitmap state); the
    /// guard decision is recorded in `scratch`. No output order is
    /// guaranteed, only set equality.
    fn compute_active_frontier<W: BitWord>(
        &self,
        data: &Buffer<W, R>,
        mlb: &Buffer<W, R>,
        offsets: &mut Buffer<u32, R>,
        scratch: &mut Buffer<u32, R>,
        num_items: usize,
    ) -> Result<()>;

    /// Whether the bitmap holds no set bit, via an mlb population test
    fn frontier_is_empty<W: BitWord>(
        &self,
        mlb: &Buffer<W, R>,
        scratch: &mut Buffer<u32, R>,
    ) -> Result<bool>;
}
