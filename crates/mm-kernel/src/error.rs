use std::fmt;

use thiserror::Error;

/// Which buffer of a multiplication an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Left operand, shape [n, m].
    A,
    /// Right operand, shape [m, l].
    B,
    /// Output, shape [n, l].
    C,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::A => write!(f, "a"),
            Operand::B => write!(f, "b"),
            Operand::C => write!(f, "c"),
        }
    }
}

#[derive(Error, Debug)]
pub enum KernelError {
    #[error("invalid dimension {name}={value}")]
    InvalidDimension { name: &'static str, value: i64 },
    #[error("buffer {operand} has {got} elements, expected {expected}")]
    BufferLength {
        operand: Operand,
        expected: usize,
        got: usize,
    },
    #[error("{got} elements do not fill a {rows}x{cols} matrix")]
    DataLength { rows: usize, cols: usize, got: usize },
    #[error("matmul dimension mismatch: [{a_rows}x{a_cols}] @ [{b_rows}x{b_cols}]")]
    DimensionMismatch {
        a_rows: usize,
        a_cols: usize,
        b_rows: usize,
        b_cols: usize,
    },
    #[error("failed to allocate {elements} elements")]
    AllocationFailure { elements: usize },
    #[error("worker pool unavailable: {0}")]
    ConcurrencyResourceExhaustion(String),
}

impl KernelError {
    /// Integer status reported at the C boundary. Success is 0, so every
    /// error maps to a nonzero value.
    pub fn status_code(&self) -> i32 {
        match self {
            KernelError::InvalidDimension { .. }
            | KernelError::BufferLength { .. }
            | KernelError::DataLength { .. }
            | KernelError::DimensionMismatch { .. } => 2,
            KernelError::AllocationFailure { .. } => 3,
            KernelError::ConcurrencyResourceExhaustion(_) => 4,
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for KernelError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        KernelError::ConcurrencyResourceExhaustion(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, KernelError>;

/// Status for a call that may have failed: 0 on success.
pub fn status_of<T>(result: &Result<T>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(e) => e.status_code(),
    }
}
