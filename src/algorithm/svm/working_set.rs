//! Working-set selection for decomposition-method SVM training
//!
//! Each outer training iteration optimizes a bounded subset of the training
//! vectors (the working set). The selector picks that subset by partitioning
//! vectors into upper/lower KKT violators over a stable gradient ordering,
//! excluding slots carried over from the previous round, and backfilling from
//! the upper edge when one violator pool runs dry.

use crate::buffer::Buffer;
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::ops::{SelectionOps, ViolatingEdge};
use crate::runtime::{Device, Runtime, RuntimeClient};
use bytemuck::Zeroable;

/// Largest power of two not exceeding `n` (`n > 0`)
fn pow2_floor(n: usize) -> usize {
    1 << (usize::BITS - 1 - n.leading_zeros())
}

/// Working-set size for a training run
///
/// The working set is processed by one work-group, so it is capped by the
/// device group-size limit; below that it is the largest power of two that
/// still fits in the row count, which keeps the set never larger than the
/// problem. An empty problem gets an empty working set.
pub fn propose_working_set_size<D: Device>(device: &D, row_count: usize) -> usize {
    if row_count == 0 {
        return 0;
    }
    pow2_floor(row_count).min(device.max_work_group_size())
}

/// Buffers owned by the selector, sized once at `init`
///
/// `indicator` is overwritten by every pass inside one `select` call; each
/// pass fully recomputes it before reading, so the reuse carries no
/// stale-read hazard. `buff_indices` doubles as the device sort's index
/// scratch and the compaction output, as the passes never need both at once.
struct SelectorBuffers<F: Element, R: Runtime> {
    sorted_f_indices: Buffer<u32, R>,
    buff_indices: Buffer<u32, R>,
    indicator: Buffer<u8, R>,
    ws_indices: Buffer<u32, R>,
    ws_save_indices: Buffer<u32, R>,
    sort_values: Buffer<F, R>,
    sort_values_scratch: Buffer<F, R>,
}

/// Selects the working set for each decomposition round
///
/// One instance lives per training run. [`WorkingSetSelector::init`] must be
/// called once before the first [`WorkingSetSelector::select`]; between
/// rounds the training loop calls
/// [`WorkingSetSelector::save_working_set_indices`] to warm-start the next
/// selection with the upper half of the previous one.
///
/// The caller must not invoke `select` concurrently on one instance; there
/// is no internal locking (single-writer discipline).
pub struct WorkingSetSelector<F: Element, R: Runtime> {
    client: R::Client,
    labels: Buffer<F, R>,
    c: F,
    n_vectors: usize,
    ws_size: usize,
    n_selected: usize,
    state: Option<SelectorBuffers<F, R>>,
}

impl<F: Element, R: Runtime> WorkingSetSelector<F, R>
where
    R::Client: SelectionOps<R>,
{
    /// Create a selector over `n_vectors` training vectors
    ///
    /// `labels` holds the ±1 class labels, `c` the box constraint upper
    /// bound (`c > 0`). Buffers are not allocated until `init`.
    pub fn new(client: &R::Client, labels: Buffer<F, R>, c: F, n_vectors: usize) -> Result<Self> {
        if n_vectors == 0 {
            return Err(Error::invalid_argument("n_vectors", "must be positive"));
        }
        if labels.len() != n_vectors {
            return Err(Error::length_mismatch("labels", n_vectors, labels.len()));
        }
        if !(c > F::zeroed()) {
            return Err(Error::invalid_argument(
                "c",
                "box constraint must be positive",
            ));
        }
        Ok(Self {
            client: client.clone(),
            labels,
            c,
            n_vectors,
            ws_size: 0,
            n_selected: 0,
            state: None,
        })
    }

    /// Allocate all round-to-round buffers and fix the working-set size
    ///
    /// Must be called exactly once before the first `select`. Allocation
    /// failures propagate; nothing is retried.
    pub fn init(&mut self) -> Result<()> {
        if self.state.is_some() {
            return Err(Error::internal("working-set selector already initialized"));
        }
        let device = self.client.device();
        let n = self.n_vectors;
        self.ws_size = propose_working_set_size(device, n);
        self.n_selected = 0;
        self.state = Some(SelectorBuffers {
            sorted_f_indices: Buffer::zeros(n, device)?,
            buff_indices: Buffer::zeros(n, device)?,
            // zero-filled: no index is committed before the first round
            indicator: Buffer::zeros(n, device)?,
            ws_indices: Buffer::zeros(self.ws_size, device)?,
            ws_save_indices: Buffer::zeros(self.ws_size, device)?,
            sort_values: Buffer::zeros(n, device)?,
            sort_values_scratch: Buffer::zeros(n, device)?,
        });
        Ok(())
    }

    /// Working-set size fixed at `init` (0 before)
    pub fn ws_size(&self) -> usize {
        self.ws_size
    }

    /// Total number of training vectors
    pub fn n_vectors(&self) -> usize {
        self.n_vectors
    }

    /// Device buffer holding the selected indices of the last round
    pub fn working_set_buffer(&self) -> Result<&Buffer<u32, R>> {
        self.state
            .as_ref()
            .map(|s| &s.ws_indices)
            .ok_or_else(|| Error::internal("working-set selector not initialized"))
    }

    /// Host copy of the selected indices of the last round
    pub fn working_set_indices(&self) -> Result<Vec<u32>> {
        Ok(self.working_set_buffer()?.to_vec())
    }

    /// Select the working set for the current round
    ///
    /// Populates exactly `ws_size` distinct indices in `[0, n_vectors)` from
    /// `alpha` (dual variables) and `f` (gradient values), both of length
    /// `n_vectors`. Deterministic for identical inputs and prior state: the
    /// gradient ordering is a stable ascending argsort and both violator
    /// passes preserve it.
    pub fn select(&mut self, alpha: &Buffer<F, R>, f: &Buffer<F, R>) -> Result<()> {
        if alpha.len() != self.n_vectors {
            return Err(Error::length_mismatch("alpha", self.n_vectors, alpha.len()));
        }
        if f.len() != self.n_vectors {
            return Err(Error::length_mismatch("f", self.n_vectors, f.len()));
        }
        let state = self
            .state
            .as_mut()
            .ok_or_else(|| Error::internal("select called before init"))?;

        self.client.argsort(
            f,
            &mut state.sorted_f_indices,
            &mut state.sort_values,
            &mut state.sort_values_scratch,
            &mut state.buff_indices,
        )?;

        // Upper-violator pass: half of the remaining budget, taken from the
        // low-gradient head of the sorted order.
        {
            let n_need = (self.ws_size - self.n_selected) / 2;

            self.client.check_violating_edge(
                &self.labels,
                alpha,
                &mut state.indicator,
                self.c,
                ViolatingEdge::Up,
            )?;
            if self.n_selected > 0 {
                self.client.reset_indicator(
                    &state.ws_indices,
                    &mut state.indicator,
                    self.n_selected,
                )?;
            }

            let n_upper = self.client.flagged_index_compaction(
                &state.indicator,
                &state.sorted_f_indices,
                &mut state.buff_indices,
            )?;
            self.client.synchronize();

            let n_copy = n_upper.min(n_need);
            state
                .ws_indices
                .copy_from(&state.buff_indices, 0, self.n_selected, n_copy)?;
            self.n_selected += n_copy;
        }

        // Lower-violator pass: all remaining budget, taken from the
        // high-gradient tail of the compacted order.
        {
            let n_need = self.ws_size - self.n_selected;

            self.client.check_violating_edge(
                &self.labels,
                alpha,
                &mut state.indicator,
                self.c,
                ViolatingEdge::Low,
            )?;
            if self.n_selected > 0 {
                self.client.reset_indicator(
                    &state.ws_indices,
                    &mut state.indicator,
                    self.n_selected,
                )?;
            }

            let n_lower = self.client.flagged_index_compaction(
                &state.indicator,
                &state.sorted_f_indices,
                &mut state.buff_indices,
            )?;
            self.client.synchronize();

            let n_copy = n_lower.min(n_need);
            state.ws_indices.copy_from(
                &state.buff_indices,
                n_lower - n_copy,
                self.n_selected,
                n_copy,
            )?;
            self.n_selected += n_copy;
        }

        // Backfill from the upper edge when the violator pools were
        // exhausted on one side.
        if self.n_selected < self.ws_size {
            let n_need = self.ws_size - self.n_selected;

            self.client.check_violating_edge(
                &self.labels,
                alpha,
                &mut state.indicator,
                self.c,
                ViolatingEdge::Up,
            )?;
            if self.n_selected > 0 {
                self.client.reset_indicator(
                    &state.ws_indices,
                    &mut state.indicator,
                    self.n_selected,
                )?;
            }

            let n_upper = self.client.flagged_index_compaction(
                &state.indicator,
                &state.sorted_f_indices,
                &mut state.buff_indices,
            )?;
            self.client.synchronize();

            let n_copy = n_upper.min(n_need);
            state
                .ws_indices
                .copy_from(&state.buff_indices, 0, self.n_selected, n_copy)?;
            self.n_selected += n_copy;
        }

        if self.n_selected != self.ws_size {
            // A predicate or sizing defect, not a resource failure: with a
            // positive box constraint every vector lies on at least one edge,
            // so a full set must always be reachable when
            // ws_size <= n_vectors.
            let (selected, expected) = (self.n_selected, self.ws_size);
            self.n_selected = 0;
            return Err(Error::internal(format!(
                "working set incomplete: selected {} of {}",
                selected, expected
            )));
        }

        state
            .ws_save_indices
            .copy_from(&state.ws_indices, 0, 0, self.ws_size)?;
        self.n_selected = 0;
        Ok(())
    }

    /// Warm-start the next round with the previous upper half
    ///
    /// Copies the upper half (`q = ws_size / 2` slots `[q, ws_size)`) of the
    /// committed selection into the front of the working buffer and marks
    /// those slots as already selected, so the next `select` only has to
    /// find `ws_size - q` new indices. Called by the training loop between
    /// the optimization step and the next `select`.
    pub fn save_working_set_indices(&mut self) -> Result<()> {
        let state = self
            .state
            .as_mut()
            .ok_or_else(|| Error::internal("save called before init"))?;
        let q = self.ws_size / 2;
        state
            .ws_indices
            .copy_from(&state.ws_save_indices, q, 0, self.ws_size - q)?;
        self.n_selected = q;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pow2_floor() {
        assert_eq!(pow2_floor(1), 1);
        assert_eq!(pow2_floor(2), 2);
        assert_eq!(pow2_floor(3), 2);
        assert_eq!(pow2_floor(4), 4);
        assert_eq!(pow2_floor(1000), 512);
        assert_eq!(pow2_floor(1024), 1024);
    }
}
