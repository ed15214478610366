//! Owning 1-D typed device buffers
//!
//! [`Buffer`] is the ownership-tagged replacement for raw device pointers
//! with manual lifetime: it allocates through the runtime on construction and
//! deallocates on `Drop`. All the primitives' long-lived state (bitmap
//! layers, index permutations, indicator flags) lives in these buffers,
//! allocated once and reused round to round.

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::runtime::Runtime;
use bytemuck::Zeroable;
use std::marker::PhantomData;

/// A 1-D typed device buffer owned by its component
///
/// The handle is addressable: sub-range operations offset it by
/// `index * size_of::<T>()` bytes. Non-owning views (e.g.
/// [`crate::bitmap::Bitset`]) borrow the memory behind a `Buffer` without
/// taking over its lifetime.
pub struct Buffer<T: Element, R: Runtime> {
    ptr: u64,
    len: usize,
    device: R::Device,
    _marker: PhantomData<T>,
}

// The handle refers to plain Pod memory; ownership is unique.
unsafe impl<T: Element, R: Runtime> Send for Buffer<T, R> {}
unsafe impl<T: Element, R: Runtime> Sync for Buffer<T, R> {}

impl<T: Element, R: Runtime> Buffer<T, R> {
    /// Allocate a zero-initialized buffer of `len` elements
    pub fn zeros(len: usize, device: &R::Device) -> Result<Self> {
        let ptr = R::allocate(len * std::mem::size_of::<T>(), device)?;
        Ok(Self {
            ptr,
            len,
            device: device.clone(),
            _marker: PhantomData,
        })
    }

    /// Allocate a buffer holding a copy of `data`
    pub fn from_slice(data: &[T], device: &R::Device) -> Result<Self> {
        let mut buf = Self::zeros(data.len(), device)?;
        buf.copy_from_slice(data, 0)?;
        Ok(buf)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw device handle (base of the buffer)
    pub fn ptr(&self) -> u64 {
        self.ptr
    }

    /// Device this buffer lives on
    pub fn device(&self) -> &R::Device {
        &self.device
    }

    fn byte_offset(&self, index: usize) -> u64 {
        self.ptr + (index * std::mem::size_of::<T>()) as u64
    }

    fn check_range(&self, offset: usize, n: usize, what: &'static str) -> Result<()> {
        if offset + n > self.len {
            return Err(Error::out_of_bounds(offset + n, self.len, what));
        }
        Ok(())
    }

    /// Overwrite every element with `value`
    ///
    /// Host-staged through a fixed-size chunk; no per-call heap allocation.
    /// The CPU reference backend has no dedicated fill kernel.
    pub fn fill(&mut self, value: T) -> Result<()> {
        let staged = [value; 512];
        let mut offset = 0;
        while offset < self.len {
            let n = (self.len - offset).min(staged.len());
            self.copy_from_slice(&staged[..n], offset)?;
            offset += n;
        }
        Ok(())
    }

    /// Copy `data` into the buffer starting at element `offset`
    pub fn copy_from_slice(&mut self, data: &[T], offset: usize) -> Result<()> {
        self.check_range(offset, data.len(), "buffer write")?;
        R::copy_to_device(
            bytemuck::cast_slice(data),
            self.byte_offset(offset),
            &self.device,
        );
        Ok(())
    }

    /// Copy `len` elements from `src[src_offset..]` into `self[dst_offset..]`
    ///
    /// Both buffers must live on the same device.
    pub fn copy_from(
        &mut self,
        src: &Buffer<T, R>,
        src_offset: usize,
        dst_offset: usize,
        len: usize,
    ) -> Result<()> {
        src.check_range(src_offset, len, "buffer copy source")?;
        self.check_range(dst_offset, len, "buffer copy destination")?;
        R::copy_within_device(
            src.byte_offset(src_offset),
            self.byte_offset(dst_offset),
            len * std::mem::size_of::<T>(),
            &self.device,
        );
        Ok(())
    }

    /// Read one element back to the host
    pub fn get(&self, index: usize) -> Result<T> {
        self.check_range(index, 1, "buffer read")?;
        let mut value = T::zeroed();
        R::copy_from_device(
            self.byte_offset(index),
            bytemuck::bytes_of_mut(&mut value),
            &self.device,
        );
        Ok(value)
    }

    /// Read a sub-range back to the host
    pub fn read_range(&self, offset: usize, len: usize) -> Result<Vec<T>> {
        self.check_range(offset, len, "buffer read")?;
        let mut out = vec![T::zeroed(); len];
        R::copy_from_device(
            self.byte_offset(offset),
            bytemuck::cast_slice_mut(&mut out),
            &self.device,
        );
        Ok(out)
    }

    /// Read the whole buffer back to the host
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = vec![T::zeroed(); self.len];
        R::copy_from_device(self.ptr, bytemuck::cast_slice_mut(&mut out), &self.device);
        out
    }
}

impl<T: Element, R: Runtime> Drop for Buffer<T, R> {
    fn drop(&mut self) {
        R::deallocate(self.ptr, self.len * std::mem::size_of::<T>(), &self.device);
    }
}
