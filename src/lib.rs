//! # Flare
//!
//! Managed array handles over a device compute runtime.
//!
//! The runtime owns the real buffers and performs all arithmetic; this crate
//! is the boundary layer that makes those allocations behave like safely
//! owned local values. Every [`Array`] wraps one opaque [`Handle`], created
//! by a constructor or returned by an operation, and gives it back to the
//! runtime through an explicit, idempotent [`Array::release`].
//!
//! ```
//! use flare::{ops, Array};
//!
//! # fn main() -> flare::Result<()> {
//! let mut a = Array::from_f32(&[2, 3], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])?;
//! let mut b = ops::add(&a, &a)?;
//! assert_eq!(b.to_f32()?, vec![2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);
//! b.release();
//! a.release();
//! # Ok(())
//! # }
//! ```
//!
//! There is no automatic reclamation: an `Array` dropped without `release`
//! leaks its device buffer. Release on every exit path, error paths
//! included.

mod array;
mod dtype;
pub mod ops;
mod runtime;
mod shape;

use std::result::Result as StdResult;

pub use crate::array::{Array, Handle};
pub use crate::dtype::ElementType;
pub use crate::shape::Shape;
pub use num_complex::{Complex32, Complex64};

/// Failure kinds surfaced by the boundary layer. All are synchronous and
/// immediate; none are retried, and a failed operation leaves no new
/// allocation behind.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// More than four dimensions supplied.
    #[error("invalid shape: at most 4 dimensions are supported, got {0}")]
    InvalidShape(usize),

    /// Host buffer length disagrees with the shape's element count.
    #[error("shape mismatch: shape holds {expected} elements, buffer holds {got}")]
    ShapeMismatch { expected: usize, got: usize },

    /// No element buffer provided.
    #[error("null data: no element buffer provided")]
    NullData,

    /// The runtime returned the sentinel handle.
    #[error("runtime failed to allocate the result")]
    AllocationFailed,

    /// Extraction requested the wrong element kind.
    #[error("type mismatch: requested {requested}, found {found}")]
    TypeMismatch {
        requested: ElementType,
        found: ElementType,
    },

    /// Query on a released handle.
    #[error("invalid handle: array has been released")]
    InvalidHandle,
}

pub type Result<T> = StdResult<T, Error>;

/// Prints runtime and device diagnostics.
pub fn info() {
    runtime::module_info();
}
