use std::fmt;
use std::ops::{Index, IndexMut};

use crate::cpu::Multiplier;
use crate::dims::Dims;
use crate::element::Element;
use crate::error::{KernelError, Result};

/// An owned, row-major matrix with positive dimensions.
///
/// Multiplication goes through the row-parallel kernel, into a freshly
/// zeroed output.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Element> Matrix<T> {
    /// Create a matrix from row-major data.
    ///
    /// Fails if either dimension is zero or `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        check_positive(rows, cols)?;
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(KernelError::DataLength {
                rows,
                cols,
                got: data.len(),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Create a zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        check_positive(rows, cols)?;
        let len = Dims::new(rows, 0, cols).c_len()?;
        Ok(Matrix {
            rows,
            cols,
            data: vec![T::zero(); len],
        })
    }

    /// Create a `size x size` identity matrix.
    pub fn identity(size: usize) -> Result<Self> {
        let mut m = Self::zeros(size, size)?;
        for i in 0..size {
            m[(i, i)] = T::one();
        }
        Ok(m)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the underlying row-major data.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Returns the element at (`row`, `col`), or `None` if out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Matrix product on the shared worker pool.
    ///
    /// self is [n, m], other is [m, l], result is [n, l].
    pub fn matmul(&self, other: &Matrix<T>) -> Result<Matrix<T>> {
        self.matmul_with(other, Multiplier::shared())
    }

    /// Matrix product on the given multiplier.
    pub fn matmul_with(&self, other: &Matrix<T>, multiplier: &Multiplier) -> Result<Matrix<T>> {
        if self.cols != other.rows {
            return Err(KernelError::DimensionMismatch {
                a_rows: self.rows,
                a_cols: self.cols,
                b_rows: other.rows,
                b_cols: other.cols,
            });
        }

        let mut out = Matrix::zeros(self.rows, other.cols)?;
        let dims = Dims::new(self.rows, self.cols, other.cols);
        multiplier.multiply(dims, &self.data, &other.data, &mut out.data)?;
        Ok(out)
    }
}

fn check_positive(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 {
        return Err(KernelError::InvalidDimension {
            name: "rows",
            value: 0,
        });
    }
    if cols == 0 {
        return Err(KernelError::InvalidDimension {
            name: "cols",
            value: 0,
        });
    }
    Ok(())
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(row < self.rows && col < self.cols, "index ({row}, {col}) out of range");
        &self.data[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(row < self.rows && col < self.cols, "index ({row}, {col}) out of range");
        &mut self.data[row * self.cols + col]
    }
}

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.data.chunks(self.cols).enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for (c, v) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", v)?;
            }
        }
        Ok(())
    }
}
