//! # primr
//!
//! **Parallel selection primitives for device-resident ML algorithms.**
//!
//! primr provides the working-set and frontier machinery that sits under
//! iterative, device-resident combinatorial optimization: the bounded-subset
//! selector used by decomposition-method SVM training, and the two-layer
//! bitmap frontier that drives level-synchronous graph traversal. Both are
//! parallel set-membership/selection engines over a fixed index universe,
//! built on a shared packed [`bitmap::Bitset`] and a pluggable compute
//! runtime.
//!
//! ## Architecture
//!
//! ```text
//! WorkingSetSelector      Frontier
//!        │                   │
//!   SelectionOps        FrontierOps      (kernel capability traits)
//!        └───────┬───────────┘
//!            Runtime / Client            (buffers, copies, dispatch)
//!                │
//!            CPU backend                 (reference implementation)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use primr::prelude::*;
//!
//! let device = CpuDevice::new();
//! let client = CpuRuntime::default_client(&device);
//!
//! let mut frontier = Frontier::<u32, CpuRuntime>::new(&client, 1024)?;
//! frontier.insert(5)?;
//! frontier.compute_active_frontier()?;
//! assert_eq!(frontier.active_to_vec()?, [5]);
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): data-parallel CPU kernels on the rayon thread pool

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithm;
pub mod bitmap;
pub mod buffer;
pub mod dtype;
pub mod error;
pub mod ops;
pub mod runtime;

/// Commonly used types, re-exported
pub mod prelude {
    pub use crate::algorithm::svm::{propose_working_set_size, WorkingSetSelector};
    pub use crate::bitmap::{swap_frontiers, BitWord, Bitset, Frontier, FrontierView};
    pub use crate::buffer::Buffer;
    pub use crate::dtype::DType;
    pub use crate::error::{Error, Result};
    pub use crate::ops::{FrontierOps, SelectionOps, ViolatingEdge};
    pub use crate::runtime::cpu::{CpuDevice, CpuRuntime};
    pub use crate::runtime::{Device, Runtime, RuntimeClient};
}
