//! SelectionOps implementation for the CPU client

use super::{kernels, sort, CpuClient};
use crate::buffer::Buffer;
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::ops::{SelectionOps, ViolatingEdge};
use crate::runtime::cpu::CpuRuntime;

impl SelectionOps<CpuRuntime> for CpuClient {
    fn argsort<T: Element>(
        &self,
        keys: &Buffer<T, CpuRuntime>,
        sorted_indices: &mut Buffer<u32, CpuRuntime>,
        values: &mut Buffer<T, CpuRuntime>,
        values_scratch: &mut Buffer<T, CpuRuntime>,
        indices_scratch: &mut Buffer<u32, CpuRuntime>,
    ) -> Result<()> {
        sort::argsort_impl(
            self,
            keys,
            sorted_indices,
            values,
            values_scratch,
            indices_scratch,
        )
    }

    fn check_violating_edge<T: Element>(
        &self,
        y: &Buffer<T, CpuRuntime>,
        alpha: &Buffer<T, CpuRuntime>,
        indicator: &mut Buffer<u8, CpuRuntime>,
        c: T,
        edge: ViolatingEdge,
    ) -> Result<()> {
        let len = y.len();
        if alpha.len() != len {
            return Err(Error::length_mismatch("alpha", len, alpha.len()));
        }
        if indicator.len() < len {
            return Err(Error::length_mismatch("indicator", len, indicator.len()));
        }

        unsafe {
            kernels::check_edge_kernel::<T>(
                y.ptr() as *const T,
                alpha.ptr() as *const T,
                indicator.ptr() as *mut u8,
                c,
                edge,
                len,
            );
        }
        Ok(())
    }

    fn reset_indicator(
        &self,
        indices: &Buffer<u32, CpuRuntime>,
        indicator: &mut Buffer<u8, CpuRuntime>,
        n: usize,
    ) -> Result<()> {
        if n > indices.len() {
            return Err(Error::length_mismatch("indices", n, indices.len()));
        }

        unsafe {
            kernels::reset_indicator_kernel(
                indices.ptr() as *const u32,
                indicator.ptr() as *mut u8,
                n,
                indicator.len(),
            );
        }
        Ok(())
    }

    fn flagged_index_compaction(
        &self,
        indicator: &Buffer<u8, CpuRuntime>,
        source: &Buffer<u32, CpuRuntime>,
        out: &mut Buffer<u32, CpuRuntime>,
    ) -> Result<usize> {
        let len = source.len();
        if out.len() < len {
            return Err(Error::length_mismatch("out", len, out.len()));
        }

        let count = unsafe {
            kernels::flagged_index_kernel(
                indicator.ptr() as *const u8,
                indicator.len(),
                source.ptr() as *const u32,
                out.ptr() as *mut u32,
                len,
            )
        };
        Ok(count)
    }
}
