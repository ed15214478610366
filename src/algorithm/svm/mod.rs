//! SVM decomposition-method training support
//!
//! Only the working-set machinery lives here; the numerical optimization of
//! a selected working set (kernel-matrix evaluation, SMO inner solver) is a
//! caller of these primitives, not part of them.

mod working_set;

pub use working_set::{propose_working_set_size, WorkingSetSelector};
