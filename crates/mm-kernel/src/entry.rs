//! Typed entry points.
//!
//! One function per supported element type, all with the same shape:
//! `(n, m, l, a, b, c) -> Result<()>`. They run on [`Multiplier::shared`],
//! accumulating into `c`, and map onto the C exports in `mm-ffi`.

use crate::cpu::Multiplier;
use crate::dims::Dims;
use crate::element::Element;
use crate::error::Result;

/// Generic form of the typed entry points: `c += a @ b` with `a` of shape
/// [n, m], `b` of shape [m, l] and `c` of shape [n, l], all row-major.
pub fn multiply<T: Element>(
    n: usize,
    m: usize,
    l: usize,
    a: &[T],
    b: &[T],
    c: &mut [T],
) -> Result<()> {
    Multiplier::shared().multiply(Dims::new(n, m, l), a, b, c)
}

/// `c += a @ b` over 32-bit integers. Accumulation wraps on overflow.
pub fn multiply_i32(
    n: usize,
    m: usize,
    l: usize,
    a: &[i32],
    b: &[i32],
    c: &mut [i32],
) -> Result<()> {
    multiply(n, m, l, a, b, c)
}

/// `c += a @ b` over single-precision floats.
pub fn multiply_f32(
    n: usize,
    m: usize,
    l: usize,
    a: &[f32],
    b: &[f32],
    c: &mut [f32],
) -> Result<()> {
    multiply(n, m, l, a, b, c)
}

/// `c += a @ b` over double-precision floats.
pub fn multiply_f64(
    n: usize,
    m: usize,
    l: usize,
    a: &[f64],
    b: &[f64],
    c: &mut [f64],
) -> Result<()> {
    multiply(n, m, l, a, b, c)
}
