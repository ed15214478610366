//! Stable argsort for the CPU runtime

use super::kernels;
use super::CpuClient;
use crate::buffer::Buffer;
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::runtime::cpu::CpuRuntime;

/// Stable argsort of `keys` ascending into `sorted_indices`
///
/// The scratch buffers exist for device backends' radix passes; the CPU path
/// sorts through `sorted_indices` directly and fills `values` with the keys
/// in sorted order.
pub(crate) fn argsort_impl<T: Element>(
    _client: &CpuClient,
    keys: &Buffer<T, CpuRuntime>,
    sorted_indices: &mut Buffer<u32, CpuRuntime>,
    values: &mut Buffer<T, CpuRuntime>,
    _values_scratch: &mut Buffer<T, CpuRuntime>,
    _indices_scratch: &mut Buffer<u32, CpuRuntime>,
) -> Result<()> {
    let len = keys.len();
    if sorted_indices.len() < len {
        return Err(Error::length_mismatch(
            "sorted_indices",
            len,
            sorted_indices.len(),
        ));
    }
    if values.len() < len {
        return Err(Error::length_mismatch("values", len, values.len()));
    }

    unsafe {
        kernels::argsort_kernel::<T>(keys.ptr() as *const T, sorted_indices.ptr() as *mut u32, len);
        kernels::gather_kernel::<T>(
            keys.ptr() as *const T,
            sorted_indices.ptr() as *const u32,
            values.ptr() as *mut T,
            len,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::cpu::CpuDevice;
    use crate::runtime::Runtime;

    #[test]
    fn test_argsort_stability() {
        let device = CpuDevice::new();
        let client = CpuRuntime::default_client(&device);

        let keys =
            Buffer::<f32, CpuRuntime>::from_slice(&[2.0, 1.0, 2.0, 1.0, 0.5], &device).unwrap();
        let mut idx = Buffer::<u32, CpuRuntime>::zeros(5, &device).unwrap();
        let mut values = Buffer::<f32, CpuRuntime>::zeros(5, &device).unwrap();
        let mut vs = Buffer::<f32, CpuRuntime>::zeros(5, &device).unwrap();
        let mut is = Buffer::<u32, CpuRuntime>::zeros(5, &device).unwrap();

        argsort_impl(&client, &keys, &mut idx, &mut values, &mut vs, &mut is).unwrap();

        // Equal keys keep original index order
        assert_eq!(idx.to_vec(), [4, 1, 3, 0, 2]);
        assert_eq!(values.to_vec(), [0.5, 1.0, 1.0, 2.0, 2.0]);
    }
}
