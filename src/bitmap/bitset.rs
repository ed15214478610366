//! Packed bitset view with plain and atomic accessors

use crate::dtype::Element;
use num_traits::PrimInt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Unsigned word types a bitset can be packed into
///
/// The atomic operations are relaxed at device scope: eventual visibility is
/// all the primitives need, ordering across kernels comes from the kernel
/// dependency chain.
pub trait BitWord: Element + PrimInt {
    /// Number of bits in one word
    const BITS: u32;

    /// `*ptr |= val`, atomically
    ///
    /// # Safety
    /// `ptr` must be valid, properly aligned, and only accessed atomically or
    /// by non-racing plain accesses for the duration of the call.
    unsafe fn atomic_fetch_or(ptr: *mut Self, val: Self);

    /// `*ptr &= val`, atomically
    ///
    /// # Safety
    /// Same contract as [`BitWord::atomic_fetch_or`].
    unsafe fn atomic_fetch_and(ptr: *mut Self, val: Self);

    /// Atomic load of `*ptr`
    ///
    /// # Safety
    /// Same contract as [`BitWord::atomic_fetch_or`].
    unsafe fn atomic_load(ptr: *const Self) -> Self;
}

impl BitWord for u32 {
    const BITS: u32 = 32;

    unsafe fn atomic_fetch_or(ptr: *mut Self, val: Self) {
        AtomicU32::from_ptr(ptr).fetch_or(val, Ordering::Relaxed);
    }

    unsafe fn atomic_fetch_and(ptr: *mut Self, val: Self) {
        AtomicU32::from_ptr(ptr).fetch_and(val, Ordering::Relaxed);
    }

    unsafe fn atomic_load(ptr: *const Self) -> Self {
        AtomicU32::from_ptr(ptr as *mut Self).load(Ordering::Relaxed)
    }
}

impl BitWord for u64 {
    const BITS: u32 = 64;

    unsafe fn atomic_fetch_or(ptr: *mut Self, val: Self) {
        AtomicU64::from_ptr(ptr).fetch_or(val, Ordering::Relaxed);
    }

    unsafe fn atomic_fetch_and(ptr: *mut Self, val: Self) {
        AtomicU64::from_ptr(ptr).fetch_and(val, Ordering::Relaxed);
    }

    unsafe fn atomic_load(ptr: *const Self) -> Self {
        AtomicU64::from_ptr(ptr as *mut Self).load(Ordering::Relaxed)
    }
}

/// Number of words needed to store `num_items` bits
pub(crate) fn storage_len<W: BitWord>(num_items: usize) -> usize {
    (num_items + W::BITS as usize - 1) / W::BITS as usize
}

/// A non-owning packed-bit view over caller-owned words
///
/// Bit `i` is stored at `words[i / W::BITS]`, bit position `i % W::BITS`.
/// The view never frees the underlying memory.
///
/// Plain accessors are read-modify-write on the owning word and are not safe
/// under concurrent mutation of that word; the atomic variants are safe under
/// arbitrary concurrent access. Indexes at or past `num_items` are rejected
/// by `debug_assert!` in checked builds and are a documented precondition in
/// release builds.
#[derive(Clone, Copy, Debug)]
pub struct Bitset<W: BitWord> {
    data: *mut W,
    num_items: usize,
}

// Lanes share the view; all shared mutation goes through the atomic methods.
unsafe impl<W: BitWord> Send for Bitset<W> {}
unsafe impl<W: BitWord> Sync for Bitset<W> {}

impl<W: BitWord> Bitset<W> {
    /// Create a view over `storage_len(num_items)` words at `data`
    ///
    /// # Safety
    /// `data` must point to at least `ceil(num_items / W::BITS)` properly
    /// aligned words that stay valid for the lifetime of the view.
    pub unsafe fn from_raw_parts(data: *mut W, num_items: usize) -> Self {
        Self { data, num_items }
    }

    /// Number of addressable bits
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    #[inline]
    fn split(&self, index: usize) -> (usize, usize) {
        debug_assert!(
            index < self.num_items,
            "bitset index {} out of range ({} items)",
            index,
            self.num_items
        );
        (index / W::BITS as usize, index % W::BITS as usize)
    }

    /// Set the bit at `index` to 1
    ///
    /// # Safety
    /// No other lane may mutate the owning word concurrently.
    #[inline]
    pub unsafe fn set(&self, index: usize) {
        let (word, bit) = self.split(index);
        let p = self.data.add(word);
        *p = *p | (W::one() << bit);
    }

    /// Clear the bit at `index` to 0
    ///
    /// # Safety
    /// No other lane may mutate the owning word concurrently.
    #[inline]
    pub unsafe fn clear(&self, index: usize) {
        let (word, bit) = self.split(index);
        let p = self.data.add(word);
        *p = *p & !(W::one() << bit);
    }

    /// Check whether the bit at `index` is set
    ///
    /// # Safety
    /// No other lane may mutate the owning word concurrently; use
    /// [`Bitset::atomic_test`] when racing inserts are possible.
    #[inline]
    pub unsafe fn test(&self, index: usize) -> bool {
        let (word, bit) = self.split(index);
        (*self.data.add(word) & (W::one() << bit)) != W::zero()
    }

    /// Set the bit at `index` to 1 using atomic operations
    #[inline]
    pub fn atomic_set(&self, index: usize) {
        let (word, bit) = self.split(index);
        unsafe { W::atomic_fetch_or(self.data.add(word), W::one() << bit) };
    }

    /// Clear the bit at `index` to 0 using atomic operations
    #[inline]
    pub fn atomic_clear(&self, index: usize) {
        let (word, bit) = self.split(index);
        unsafe { W::atomic_fetch_and(self.data.add(word), !(W::one() << bit)) };
    }

    /// Check whether the bit at `index` is set using atomic operations
    #[inline]
    pub fn atomic_test(&self, index: usize) -> bool {
        let (word, bit) = self.split(index);
        let value = unsafe { W::atomic_load(self.data.add(word)) };
        (value & (W::one() << bit)) != W::zero()
    }
}
