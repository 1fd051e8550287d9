use crate::element::Element;

/// Accumulates `Σ x[k] * y[k]` onto `init`, in ascending `k` order.
#[inline]
pub fn dot_acc<T: Element>(init: T, x: &[T], y: &[T]) -> T {
    x.iter()
        .zip(y)
        .fold(init, |acc, (&a, &b)| T::mul_acc(acc, a, b))
}

/// Computes a contiguous block of output rows.
///
/// - `a_rows`: the matching rows of A, `rows * m` elements
/// - `bt`: the transposed right operand, `l * m` elements
/// - `out`: the output rows, `rows * l` elements, accumulated into
///
/// Row `i` of A and row `j` of `bt` are both contiguous, so the inner loop
/// walks memory with unit stride. `l` must be non-zero.
pub fn multiply_rows<T: Element>(a_rows: &[T], bt: &[T], m: usize, l: usize, out: &mut [T]) {
    debug_assert!(l > 0);
    debug_assert_eq!(bt.len(), l * m);

    for (i, out_row) in out.chunks_exact_mut(l).enumerate() {
        let a_row = &a_rows[i * m..(i + 1) * m];
        for (j, cell) in out_row.iter_mut().enumerate() {
            let bt_row = &bt[j * m..(j + 1) * m];
            *cell = dot_acc(*cell, a_row, bt_row);
        }
    }
}
