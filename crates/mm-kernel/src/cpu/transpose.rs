use crate::error::{KernelError, Operand, Result};

/// Returns the transpose of a row-major `rows x cols` matrix as a row-major
/// `cols x rows` matrix, so that `out[c * rows + r] == b[r * cols + c]`.
///
/// The output buffer is reserved fallibly; a failed reservation is reported
/// as `AllocationFailure` instead of aborting.
pub fn transpose<T: Copy>(b: &[T], rows: usize, cols: usize) -> Result<Vec<T>> {
    let len = rows
        .checked_mul(cols)
        .ok_or(KernelError::InvalidDimension {
            name: "rows*cols",
            value: i64::MAX,
        })?;
    if b.len() != len {
        return Err(KernelError::BufferLength {
            operand: Operand::B,
            expected: len,
            got: b.len(),
        });
    }

    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|_| KernelError::AllocationFailure { elements: len })?;
    for c in 0..cols {
        out.extend((0..rows).map(|r| b[r * cols + c]));
    }
    Ok(out)
}
