use std::fmt;

use crate::error::{KernelError, Operand, Result};

/// Dimensions of a multiplication `C[n, l] = A[n, m] @ B[m, l]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dims {
    /// Rows of A and C.
    pub n: usize,
    /// Columns of A, rows of B.
    pub m: usize,
    /// Columns of B and C.
    pub l: usize,
}

impl Dims {
    pub fn new(n: usize, m: usize, l: usize) -> Self {
        Dims { n, m, l }
    }

    /// Build dimensions from signed integers as they arrive from a C caller.
    ///
    /// Negative values are rejected with `InvalidDimension`.
    pub fn from_signed(n: i32, m: i32, l: i32) -> Result<Self> {
        Ok(Dims {
            n: non_negative("n", n)?,
            m: non_negative("m", m)?,
            l: non_negative("l", l)?,
        })
    }

    /// Element count of A (n * m).
    pub fn a_len(&self) -> Result<usize> {
        checked_area("n*m", self.n, self.m)
    }

    /// Element count of B (m * l).
    pub fn b_len(&self) -> Result<usize> {
        checked_area("m*l", self.m, self.l)
    }

    /// Element count of C (n * l).
    pub fn c_len(&self) -> Result<usize> {
        checked_area("n*l", self.n, self.l)
    }

    /// Returns true if the product has no cells to write.
    pub fn is_empty_output(&self) -> bool {
        self.n == 0 || self.l == 0
    }

    /// Checks that each buffer holds exactly as many elements as the
    /// dimensions describe.
    pub fn check_buffers(&self, a: usize, b: usize, c: usize) -> Result<()> {
        check_len(Operand::A, self.a_len()?, a)?;
        check_len(Operand::B, self.b_len()?, b)?;
        check_len(Operand::C, self.c_len()?, c)
    }
}

fn non_negative(name: &'static str, value: i32) -> Result<usize> {
    usize::try_from(value).map_err(|_| KernelError::InvalidDimension {
        name,
        value: value as i64,
    })
}

fn checked_area(name: &'static str, rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols)
        .ok_or(KernelError::InvalidDimension {
            name,
            value: i64::MAX,
        })
}

fn check_len(operand: Operand, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(KernelError::BufferLength {
            operand,
            expected,
            got,
        });
    }
    Ok(())
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}x{}] @ [{}x{}]", self.n, self.m, self.m, self.l)
    }
}
