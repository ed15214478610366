//! Two-layer bitmap frontier for level-synchronous graph traversal

use super::bitset::{storage_len, BitWord, Bitset};
use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::ops::FrontierOps;
use crate::runtime::{Runtime, RuntimeClient};
use std::sync::atomic::{AtomicU32, Ordering};

/// Device view of a frontier for traversal kernels
///
/// Exposes the insert/check surface a neighbor-expansion kernel needs.
/// `insert` and `check` may race freely across lanes: bit mutation is atomic
/// and a check racing an in-flight insert for the same bit observes either
/// state, never a torn word.
#[derive(Clone, Copy, Debug)]
pub struct FrontierView<W: BitWord> {
    num_items: usize,
    data_layer: Bitset<W>,
    mlb_layer: Bitset<W>,
    offsets: *mut u32,
    offsets_len: *mut u32,
}

unsafe impl<W: BitWord> Send for FrontierView<W> {}
unsafe impl<W: BitWord> Sync for FrontierView<W> {}

impl<W: BitWord> FrontierView<W> {
    /// Insert element `idx` into the frontier
    ///
    /// Restores the meta-layer invariant on every call: the data bit and its
    /// covering block bit are both set (idempotently), and the compaction
    /// guard is reset so the next [`Frontier::compute_active_frontier`]
    /// recomputes. The test-before-set reads are a contention fast path, not
    /// a correctness requirement.
    #[inline]
    pub fn insert(&self, idx: u32) {
        let idx = idx as usize;
        if !self.data_layer.atomic_test(idx) {
            self.data_layer.atomic_set(idx);
        }
        let block = idx / W::BITS as usize;
        if !self.mlb_layer.atomic_test(block) {
            self.mlb_layer.atomic_set(block);
        }
        // Any mutation invalidates a previously computed compaction.
        unsafe { AtomicU32::from_ptr(self.offsets_len).store(0, Ordering::Relaxed) };
    }

    /// Check whether element `idx` is in the frontier
    #[inline]
    pub fn check(&self, idx: u32) -> bool {
        self.data_layer.atomic_test(idx as usize)
    }

    /// Number of bits in one bitmap word
    pub fn element_bitsize(&self) -> usize {
        W::BITS as usize
    }

    /// Size of the element universe
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// Raw pointer to the compacted index list
    pub fn offsets(&self) -> *mut u32 {
        self.offsets
    }

    /// Raw pointer to the compacted index count
    pub fn offsets_len(&self) -> *mut u32 {
        self.offsets_len
    }
}

/// The two-layer bitmap frontier
///
/// `data_layer` holds one bit per element; `mlb_layer` (meta lower bound)
/// holds one bit per `data_layer` word, set iff that word has any set bit,
/// so compaction never scans empty regions of the data layer. The `offsets`
/// buffer caches the last compaction: slot 0 is the active count, slots
/// `1..=count` the active indices in discovery order.
///
/// A frontier is either *dirty* (mutated since the last compaction) or
/// *compacted*; every insert makes it dirty by zeroing `offsets[0]`, and
/// [`Frontier::compute_active_frontier`] skips the scan while the cached
/// count is still valid.
pub struct Frontier<W: BitWord, R: Runtime> {
    client: R::Client,
    num_items: usize,
    data_layer: Buffer<W, R>,
    mlb_layer: Buffer<W, R>,
    offsets: Buffer<u32, R>,
    scratch: Buffer<u32, R>,
}

impl<W: BitWord, R: Runtime> Frontier<W, R>
where
    R::Client: FrontierOps<R>,
{
    /// Create an empty frontier over `[0, num_items)`
    pub fn new(client: &R::Client, num_items: usize) -> Result<Self> {
        if num_items == 0 || num_items > u32::MAX as usize {
            return Err(Error::invalid_argument(
                "num_items",
                format!("must be in [1, {}], got {}", u32::MAX, num_items),
            ));
        }
        let device = client.device();
        let data_words = storage_len::<W>(num_items);
        let mlb_words = storage_len::<W>(data_words);
        Ok(Self {
            client: client.clone(),
            num_items,
            data_layer: Buffer::zeros(data_words, device)?,
            mlb_layer: Buffer::zeros(mlb_words, device)?,
            // Slot 0 keeps the active count
            offsets: Buffer::zeros(num_items + 1, device)?,
            scratch: Buffer::zeros(2, device)?,
        })
    }

    /// Size of the element universe
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// Device view for traversal kernels
    pub fn device_view(&self) -> FrontierView<W> {
        let offsets_len = self.offsets.ptr() as *mut u32;
        unsafe {
            FrontierView {
                num_items: self.num_items,
                data_layer: Bitset::from_raw_parts(self.data_layer.ptr() as *mut W, self.num_items),
                mlb_layer: Bitset::from_raw_parts(
                    self.mlb_layer.ptr() as *mut W,
                    self.data_layer.len(),
                ),
                offsets: offsets_len.add(1),
                offsets_len,
            }
        }
    }

    fn check_index(&self, idx: u32) -> Result<()> {
        if idx as usize >= self.num_items {
            return Err(Error::out_of_bounds(idx as usize, self.num_items, "frontier"));
        }
        Ok(())
    }

    fn split(idx: u32) -> (usize, W) {
        let word = idx as usize / W::BITS as usize;
        let mask = W::one() << (idx as usize % W::BITS as usize);
        (word, mask)
    }

    /// Insert element `idx` from the host
    ///
    /// Host-side single-writer variant of [`FrontierView::insert`], expressed
    /// through runtime copies so it works on any backend. Also resets the
    /// compaction guard.
    pub fn insert(&mut self, idx: u32) -> Result<()> {
        self.check_index(idx)?;

        let (word, mask) = Self::split(idx);
        let value = self.data_layer.get(word)?;
        self.data_layer.copy_from_slice(&[value | mask], word)?;

        let (mlb_word, mlb_mask) = Self::split((idx as usize / W::BITS as usize) as u32);
        let value = self.mlb_layer.get(mlb_word)?;
        self.mlb_layer.copy_from_slice(&[value | mlb_mask], mlb_word)?;

        // Mutation invalidates the cached compaction.
        self.offsets.copy_from_slice(&[0], 0)?;
        Ok(())
    }

    /// Check whether element `idx` is in the frontier
    ///
    /// Does not require a prior compaction.
    pub fn check(&self, idx: u32) -> Result<bool> {
        self.check_index(idx)?;
        let (word, mask) = Self::split(idx);
        Ok(self.data_layer.get(word)? & mask != W::zero())
    }

    /// Whether no element is in the frontier, via the meta layer
    pub fn is_empty(&mut self) -> Result<bool> {
        let empty = self
            .client
            .frontier_is_empty(&self.mlb_layer, &mut self.scratch)?;
        self.client.synchronize();
        Ok(empty)
    }

    /// Reset to the empty state
    ///
    /// Zero-fills both layers and the offsets buffer; waits for completion
    /// so the frontier can be reused immediately.
    pub fn clear(&mut self) -> Result<()> {
        self.data_layer.fill(W::zero())?;
        self.mlb_layer.fill(W::zero())?;
        self.offsets.fill(0)?;
        self.client.synchronize();
        Ok(())
    }

    /// Compact the bitmap into the offsets buffer
    ///
    /// Afterwards `offsets[0]` is the exact population count of the data
    /// layer and `offsets[1..=count]` holds every set index exactly once, in
    /// no guaranteed order. Runs at most once per dirty period: a repeat
    /// call without intervening mutation is a no-op.
    pub fn compute_active_frontier(&mut self) -> Result<()> {
        self.client.compute_active_frontier(
            &self.data_layer,
            &self.mlb_layer,
            &mut self.offsets,
            &mut self.scratch,
            self.num_items,
        )?;
        self.client.synchronize();
        Ok(())
    }

    /// Active count found by the last compaction
    pub fn active_count(&self) -> Result<usize> {
        Ok(self.offsets.get(0)? as usize)
    }

    /// Active indices found by the last compaction
    pub fn active_to_vec(&self) -> Result<Vec<u32>> {
        let count = self.active_count()?;
        self.offsets.read_range(1, count)
    }

    /// Exchange the underlying buffers of two frontiers in O(1)
    ///
    /// No data is copied; used to ping-pong "current" and "next" frontiers
    /// across traversal levels.
    pub fn swap(f1: &mut Self, f2: &mut Self) {
        std::mem::swap(f1, f2);
    }
}

/// Free-function alias for [`Frontier::swap`]
pub fn swap_frontiers<W: BitWord, R: Runtime>(f1: &mut Frontier<W, R>, f2: &mut Frontier<W, R>)
where
    R::Client: FrontierOps<R>,
{
    Frontier::swap(f1, f2);
}
