//! FrontierOps implementation for the CPU client

use super::{kernels, CpuClient};
use crate::bitmap::BitWord;
use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::ops::FrontierOps;
use crate::runtime::cpu::CpuRuntime;

impl FrontierOps<CpuRuntime> for CpuClient {
    fn compute_active_frontier<W: BitWord>(
        &self,
        data: &Buffer<W, CpuRuntime>,
        mlb: &Buffer<W, CpuRuntime>,
        offsets: &mut Buffer<u32, CpuRuntime>,
        scratch: &mut Buffer<u32, CpuRuntime>,
        num_items: usize,
    ) -> Result<()> {
        if offsets.len() < num_items + 1 {
            return Err(Error::length_mismatch(
                "offsets",
                num_items + 1,
                offsets.len(),
            ));
        }
        if scratch.len() < 2 {
            return Err(Error::length_mismatch("scratch", 2, scratch.len()));
        }

        unsafe {
            // Slot 1 of the scratch buffer holds the compute-active-frontier
            // guard flag; slot 0 belongs to the emptiness reduction.
            kernels::compact_frontier_kernel::<W>(
                data.ptr() as *const W,
                data.len(),
                mlb.ptr() as *const W,
                mlb.len(),
                offsets.ptr() as *mut u32,
                (scratch.ptr() as *mut u32).add(1),
                num_items,
            );
        }
        Ok(())
    }

    fn frontier_is_empty<W: BitWord>(
        &self,
        mlb: &Buffer<W, CpuRuntime>,
        scratch: &mut Buffer<u32, CpuRuntime>,
    ) -> Result<bool> {
        if scratch.is_empty() {
            return Err(Error::length_mismatch("scratch", 1, 0));
        }

        unsafe {
            kernels::mlb_any_kernel::<W>(
                mlb.ptr() as *const W,
                mlb.len(),
                scratch.ptr() as *mut u32,
            );
        }
        Ok(scratch.get(0)? == 0)
    }
}
