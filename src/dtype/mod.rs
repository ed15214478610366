//! Data type system for primr buffers
//!
//! This module provides the `DType` enum representing the element types the
//! selection primitives operate on, along with the `Element` trait connecting
//! Rust types to it.

mod element;

pub use element::Element;

use std::fmt;

/// Element types supported by primr buffers
///
/// The set is deliberately small: the selection primitives only ever move
/// floats (gradients, dual variables), bitmap words, indices, and indicator
/// flags.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit float (selector gradients, alphas, labels)
    F32,
    /// 64-bit float
    F64,
    /// 32-bit signed integer
    I32,
    /// 8-bit unsigned integer (indicator flags)
    U8,
    /// 32-bit unsigned integer (indices, bitmap words)
    U32,
    /// 64-bit unsigned integer (wide bitmap words)
    U64,
}

impl DType {
    /// Size of one element in bytes
    pub fn size_bytes(&self) -> usize {
        match self {
            DType::U8 => 1,
            DType::F32 | DType::I32 | DType::U32 => 4,
            DType::F64 | DType::U64 => 8,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::I32 => "i32",
            DType::U8 => "u8",
            DType::U32 => "u32",
            DType::U64 => "u64",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_bytes() {
        assert_eq!(DType::U8.size_bytes(), 1);
        assert_eq!(DType::F32.size_bytes(), 4);
        assert_eq!(DType::U64.size_bytes(), 8);
    }
}
