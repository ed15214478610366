//! Algorithm-side components built on the primitive kernels

pub mod svm;
