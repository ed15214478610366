//! Element trait for mapping Rust types to DType

use super::DType;
use bytemuck::{Pod, Zeroable};

/// Trait for types that can be elements of a primr buffer
///
/// This trait connects Rust's type system to primr's runtime dtype system.
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - Basic trait requirements
/// - `Pod + Zeroable` - Safe memory transmutation (bytemuck), required for
///   host/device transfers through byte slices
/// - `PartialOrd` - Comparison, used by sort keys and edge predicates
pub trait Element:
    Copy + Clone + Send + Sync + Pod + Zeroable + PartialOrd + 'static
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;
}

impl Element for i32 {
    const DTYPE: DType = DType::I32;
}

impl Element for u8 {
    const DTYPE: DType = DType::U8;
}

impl Element for u32 {
    const DTYPE: DType = DType::U32;
}

impl Element for u64 {
    const DTYPE: DType = DType::U64;
}
