//! Integration tests for the packed bitset view
//!
//! Tests verify correctness across:
//! - Plain and atomic accessors
//! - u32 and u64 word types
//! - Word-boundary indices and bit independence

use primr::bitmap::Bitset;

// ============================================================================
// Round-trip
// ============================================================================

#[test]
fn test_set_then_test_round_trip() {
    let mut words = vec![0u32; 4];
    let bs = unsafe { Bitset::from_raw_parts(words.as_mut_ptr(), 128) };

    for i in 0..128 {
        unsafe {
            bs.set(i);
            assert!(bs.test(i));
            bs.clear(i);
            assert!(!bs.test(i));
        }
    }
}

#[test]
fn test_three_word_scenario() {
    // n = 3 words of 32 bits
    let mut words = vec![0u32; 3];
    let bs = unsafe { Bitset::from_raw_parts(words.as_mut_ptr(), 96) };

    unsafe {
        bs.set(5);
        assert!(bs.test(5));
        assert!(!bs.test(4));
        assert!(!bs.test(37));
        bs.clear(5);
        assert!(!bs.test(5));
    }
}

#[test]
fn test_setting_one_bit_leaves_others() {
    let mut words = vec![0u64; 2];
    let bs = unsafe { Bitset::from_raw_parts(words.as_mut_ptr(), 128) };

    unsafe { bs.set(77) };
    for j in 0..128 {
        unsafe { assert_eq!(bs.test(j), j == 77) };
    }
}

// ============================================================================
// Atomic accessors
// ============================================================================

#[test]
fn test_atomic_round_trip() {
    let mut words = vec![0u32; 2];
    let bs = unsafe { Bitset::from_raw_parts(words.as_mut_ptr(), 64) };

    bs.atomic_set(31);
    bs.atomic_set(32);
    assert!(bs.atomic_test(31));
    assert!(bs.atomic_test(32));
    assert!(!bs.atomic_test(33));

    bs.atomic_clear(31);
    assert!(!bs.atomic_test(31));
    assert!(bs.atomic_test(32));
}

#[test]
fn test_concurrent_atomic_set_same_word() {
    let mut words = vec![0u32; 1];
    let bs = unsafe { Bitset::from_raw_parts(words.as_mut_ptr(), 32) };

    // All 32 bits of one word, hammered from many threads
    std::thread::scope(|scope| {
        for t in 0..4 {
            let bs = bs;
            scope.spawn(move || {
                for i in 0..32 {
                    if i % 4 == t {
                        bs.atomic_set(i);
                    }
                }
            });
        }
    });

    for i in 0..32 {
        assert!(bs.atomic_test(i));
    }
    assert_eq!(words[0], u32::MAX);
}
