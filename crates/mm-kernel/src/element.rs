use std::fmt::{self, Debug};

use num_traits::{One, Zero};

/// Element types the kernel is instantiated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// 32-bit signed integer.
    I32,
    /// 32-bit floating point.
    F32,
    /// 64-bit floating point.
    F64,
}

impl ElementKind {
    /// Returns the size in bytes of a single element.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            ElementKind::I32 | ElementKind::F32 => 4,
            ElementKind::F64 => 8,
        }
    }

    /// Returns true for the floating-point kinds.
    pub fn is_float(&self) -> bool {
        matches!(self, ElementKind::F32 | ElementKind::F64)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::I32 => write!(f, "i32"),
            ElementKind::F32 => write!(f, "f32"),
            ElementKind::F64 => write!(f, "f64"),
        }
    }
}

/// A numeric element the matmul kernel can operate on.
///
/// The set of implementors is closed (`i32`, `f32`, `f64`); the kernel is
/// monomorphized per type.
pub trait Element: Copy + Send + Sync + Debug + PartialEq + Zero + One + 'static {
    const KIND: ElementKind;

    /// Returns `acc + a * b`.
    ///
    /// Integers wrap on overflow, floats use plain IEEE arithmetic
    /// (no fused multiply-add) so results match a scalar reference loop.
    fn mul_acc(acc: Self, a: Self, b: Self) -> Self;
}

impl Element for i32 {
    const KIND: ElementKind = ElementKind::I32;

    #[inline]
    fn mul_acc(acc: Self, a: Self, b: Self) -> Self {
        acc.wrapping_add(a.wrapping_mul(b))
    }
}

impl Element for f32 {
    const KIND: ElementKind = ElementKind::F32;

    #[inline]
    fn mul_acc(acc: Self, a: Self, b: Self) -> Self {
        acc + a * b
    }
}

impl Element for f64 {
    const KIND: ElementKind = ElementKind::F64;

    #[inline]
    fn mul_acc(acc: Self, a: Self, b: Self) -> Self {
        acc + a * b
    }
}
