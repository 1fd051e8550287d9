//! `mm-kernel` - Row-parallel dense matrix multiplication for matmul-runtime.
//!
//! This crate provides:
//! - A `Multiplier` that computes `C (+)= A @ B` over flat row-major buffers,
//!   splitting output rows across a bounded rayon worker pool
//! - A standalone `transpose` used to walk B with unit stride
//! - Typed entry points for `i32`, `f32` and `f64`
//! - A small owned `Matrix` type built on the same kernel

pub mod config;
pub mod cpu;
pub mod dims;
pub mod element;
pub mod entry;
pub mod error;
pub mod matrix;

// Re-export primary types at the crate root for convenience.
pub use config::{KernelConfig, OutputMode};
pub use cpu::{transpose, Multiplier};
pub use dims::Dims;
pub use element::{Element, ElementKind};
pub use entry::{multiply, multiply_f32, multiply_f64, multiply_i32};
pub use error::{status_of, KernelError, Operand, Result};
pub use matrix::Matrix;
