//! CPU runtime implementation
//!
//! The CPU runtime uses standard heap allocation and provides the reference
//! implementation for all primitive kernels. With the `rayon` feature
//! (default), data-parallel kernels run on the rayon thread pool, standing in
//! for device work-groups; without it they fall back to sequential loops.
//!
//! Atomics use `Ordering::Relaxed` throughout: correctness relies on the
//! synchronous kernel boundary, not on the atomics' ordering guarantees,
//! matching how device backends chain kernels through dependency events.

mod client;
mod device;
mod frontier;
mod kernels;
mod runtime;
mod selection;
mod sort;

pub use client::{CpuAllocator, CpuClient};
pub use device::CpuDevice;
pub use runtime::CpuRuntime;
