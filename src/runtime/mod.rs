//! Runtime backends for the selection primitives
//!
//! This module defines the `Runtime` trait and provides implementations for
//! different compute backends. The primitives (bitset, frontier, working-set
//! selector) are written purely against this contract, so a backend only has
//! to provide buffer allocation, host/device transfer, ranged device copies,
//! and the kernel capability traits in [`crate::ops`].
//!
//! # Architecture
//!
//! ```text
//! Runtime (backend identity)
//! ├── Device (identifies a specific GPU/CPU, exposes group-size limits)
//! ├── Client (dispatches kernels, owns stream/queue, implements ops traits)
//! ├── Allocator (memory management)
//! └── RawHandle (escape hatch for custom kernels)
//! ```
//!
//! Only the CPU backend is shipped; the associated-type seams are the
//! extension points a CUDA or WebGPU backend would fill in.

mod allocator;

pub mod cpu;

pub use allocator::{Allocator, DefaultAllocator};

use crate::error::Result;

/// Core trait for compute backends
///
/// `Runtime` abstracts over different compute devices (CPU, GPU, etc.).
/// It uses static dispatch via generics for zero-cost abstraction.
///
/// Buffer handles are `u64`: a host pointer for the CPU backend, a device
/// pointer for a CUDA-style backend. Handles are addressable, i.e. a byte
/// offset may be added to a handle to reference a sub-range.
pub trait Runtime: Clone + Send + Sync + 'static {
    /// Device identifier type
    type Device: Device;

    /// Client for dispatching operations
    type Client: RuntimeClient<Self>;

    /// Memory allocator type
    type Allocator: Allocator;

    /// Raw handle for custom kernel launching (escape hatch)
    ///
    /// For CPU: `()` (no raw handle needed)
    type RawHandle: Send + Sync;

    /// Human-readable name of this runtime
    fn name() -> &'static str;

    /// Allocate zero-initialized device memory
    ///
    /// Returns a device handle (u64) that can be used for operations.
    /// Fails with [`crate::error::Error::OutOfMemory`] when the underlying
    /// allocation fails; the failure is propagated, never retried.
    fn allocate(size_bytes: usize, device: &Self::Device) -> Result<u64>;

    /// Deallocate device memory
    fn deallocate(ptr: u64, size_bytes: usize, device: &Self::Device);

    /// Copy data from host to device
    fn copy_to_device(src: &[u8], dst: u64, device: &Self::Device);

    /// Copy data from device to host
    fn copy_from_device(src: u64, dst: &mut [u8], device: &Self::Device);

    /// Copy data within device (device to device)
    ///
    /// Ranges may overlap.
    fn copy_within_device(src: u64, dst: u64, size_bytes: usize, device: &Self::Device);

    /// Get the default device
    fn default_device() -> Self::Device;

    /// Get the default client for a device
    fn default_client(device: &Self::Device) -> Self::Client;

    /// Get the raw handle from a client (escape hatch for custom kernels)
    fn raw_handle(client: &Self::Client) -> &Self::RawHandle;
}

/// Trait for device identification
pub trait Device: Clone + Send + Sync + 'static {
    /// Unique identifier for this device
    fn id(&self) -> usize;

    /// Check if two devices are the same
    fn is_same(&self, other: &Self) -> bool {
        self.id() == other.id()
    }

    /// Human-readable name
    fn name(&self) -> String {
        format!("Device({})", self.id())
    }

    /// Maximum number of work-items in one work-group
    ///
    /// Upper bound for working-set sizing: a working set is processed by a
    /// single group on device backends, so it can never exceed this.
    fn max_work_group_size(&self) -> usize;
}

/// Trait for runtime clients that handle operation dispatch
pub trait RuntimeClient<R: Runtime>: Clone + Send + Sync {
    /// Get the device this client operates on
    fn device(&self) -> &R::Device;

    /// Synchronize: wait for all pending operations to complete
    ///
    /// Called where a host-visible scalar result (a compacted count, an
    /// emptiness flag) must be observed before branching.
    fn synchronize(&self);

    /// Get the allocator for this client
    fn allocator(&self) -> &R::Allocator;
}
