//! CPU device implementation

use crate::runtime::Device;

/// Work-group size stand-in for the host CPU
///
/// Device backends report their hardware limit; the CPU backend picks the
/// value typical of the GPUs the primitives target so that working-set sizing
/// behaves the same on both.
const CPU_MAX_WORK_GROUP_SIZE: usize = 256;

/// CPU device (there's only one: the host CPU)
#[derive(Clone, Debug, Default)]
pub struct CpuDevice {
    id: usize,
}

impl CpuDevice {
    /// Create a new CPU device
    pub fn new() -> Self {
        Self { id: 0 }
    }
}

impl Device for CpuDevice {
    fn id(&self) -> usize {
        self.id
    }

    fn name(&self) -> String {
        "cpu".to_string()
    }

    fn max_work_group_size(&self) -> usize {
        CPU_MAX_WORK_GROUP_SIZE
    }
}
