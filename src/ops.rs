//! The operation catalogue: every function takes operand handles (or a
//! handle plus a host scalar), invokes exactly one runtime entry point, and
//! wraps the returned handle. Operand compatibility (shape agreement, type
//! promotion) is the runtime's business, not checked here; a sentinel
//! return surfaces as [`Error::AllocationFailed`](crate::Error).

use crate::array::Array;
use crate::runtime::{self, BinaryOp, ReduceOp, UnaryOp, FULL};
use crate::Result;

macro_rules! binary_op {
    ($(#[$doc:meta])* $name:ident, $op:ident) => {
        $(#[$doc])*
        pub fn $name(a: &Array, b: &Array) -> Result<Array> {
            Array::from_handle(runtime::binary(BinaryOp::$op, a.raw(), b.raw()))
        }
    };
}

binary_op!(
    /// Elementwise sum of two arrays.
    add, Add
);
binary_op!(sub, Sub);
binary_op!(mul, Mul);
binary_op!(div, Div);
binary_op!(le, Le);
binary_op!(lt, Lt);
binary_op!(ge, Ge);
binary_op!(gt, Gt);
binary_op!(eq, Eq);
binary_op!(ne, Ne);

macro_rules! unary_op {
    ($(#[$doc:meta])* $name:ident, $op:ident) => {
        $(#[$doc])*
        pub fn $name(a: &Array) -> Result<Array> {
            Array::from_handle(runtime::unary(UnaryOp::$op, a.raw()))
        }
    };
}

unary_op!(sin, Sin);
unary_op!(cos, Cos);
unary_op!(tan, Tan);
unary_op!(asin, Asin);
unary_op!(acos, Acos);
unary_op!(atan, Atan);
unary_op!(sinh, Sinh);
unary_op!(cosh, Cosh);
unary_op!(tanh, Tanh);
unary_op!(asinh, Asinh);
unary_op!(acosh, Acosh);
unary_op!(atanh, Atanh);
unary_op!(exp, Exp);
unary_op!(
    /// Natural logarithm.
    log, Log
);
unary_op!(
    /// Elementwise magnitude; complex input collapses to the matching real
    /// kind.
    abs, Abs
);
unary_op!(sqrt, Sqrt);

macro_rules! scalar_op {
    ($(#[$doc:meta])* $name:ident, $op:ident) => {
        $(#[$doc])*
        pub fn $name(a: &Array, b: f32) -> Result<Array> {
            Array::from_handle(runtime::scalar(BinaryOp::$op, a.raw(), b, false))
        }
    };
}

// Scalar-first forms exist separately because subtraction, division, and
// the ordering comparisons are not symmetric.
macro_rules! scalar_first_op {
    ($(#[$doc:meta])* $name:ident, $op:ident) => {
        $(#[$doc])*
        pub fn $name(a: f32, b: &Array) -> Result<Array> {
            Array::from_handle(runtime::scalar(BinaryOp::$op, b.raw(), a, true))
        }
    };
}

scalar_op!(add_scalar, Add);
scalar_op!(sub_scalar, Sub);
scalar_op!(mul_scalar, Mul);
scalar_op!(div_scalar, Div);
scalar_op!(le_scalar, Le);
scalar_op!(lt_scalar, Lt);
scalar_op!(ge_scalar, Ge);
scalar_op!(gt_scalar, Gt);
scalar_op!(eq_scalar, Eq);
scalar_op!(ne_scalar, Ne);
scalar_op!(
    /// Raises every element to the power `b`.
    pow, Pow
);

scalar_first_op!(
    /// `a - b[i]` for every element of `b`.
    scalar_sub, Sub
);
scalar_first_op!(scalar_div, Div);
scalar_first_op!(scalar_le, Le);
scalar_first_op!(scalar_lt, Lt);
scalar_first_op!(scalar_ge, Ge);
scalar_first_op!(scalar_gt, Gt);

fn axis_arg(dim: Option<u32>) -> i32 {
    match dim {
        // Saturate instead of wrapping so a huge axis can never alias the
        // whole-buffer sentinel; the runtime rejects it as out of range.
        Some(d) => i32::try_from(d).unwrap_or(i32::MAX),
        None => FULL,
    }
}

/// Sums along `dim`, or over the whole buffer when `dim` is `None` (the
/// result then holds a single element).
pub fn sum(a: &Array, dim: Option<u32>) -> Result<Array> {
    Array::from_handle(runtime::reduce(ReduceOp::Sum, a.raw(), axis_arg(dim)))
}

pub fn max(a: &Array, dim: Option<u32>) -> Result<Array> {
    Array::from_handle(runtime::reduce(ReduceOp::Max, a.raw(), axis_arg(dim)))
}

pub fn min(a: &Array, dim: Option<u32>) -> Result<Array> {
    Array::from_handle(runtime::reduce(ReduceOp::Min, a.raw(), axis_arg(dim)))
}

/// Whole-buffer sum returned as a host scalar; no handle is allocated.
pub fn sum_all(a: &Array) -> Result<f64> {
    runtime::reduce_all(ReduceOp::Sum, a.raw()).ok_or(crate::Error::AllocationFailed)
}

pub fn max_all(a: &Array) -> Result<f64> {
    runtime::reduce_all(ReduceOp::Max, a.raw()).ok_or(crate::Error::AllocationFailed)
}

pub fn min_all(a: &Array) -> Result<f64> {
    runtime::reduce_all(ReduceOp::Min, a.raw()).ok_or(crate::Error::AllocationFailed)
}

macro_rules! transform_op {
    ($(#[$doc:meta])* $name:ident, $rank:expr, $inverse:expr) => {
        $(#[$doc])*
        pub fn $name(a: &Array) -> Result<Array> {
            Array::from_handle(runtime::transform(a.raw(), $rank, $inverse))
        }
    };
}

transform_op!(
    /// Forward transform along dimension 0. Real input is promoted to the
    /// matching complex kind.
    fft, 1, false
);
transform_op!(fft2, 2, false);
transform_op!(fft3, 3, false);
transform_op!(
    /// Inverse transform along dimension 0, scaled by 1/n.
    ifft, 1, true
);
transform_op!(ifft2, 2, true);
transform_op!(ifft3, 3, true);
