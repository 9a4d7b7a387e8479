use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::Index;

use crate::{Error, Result};

/// Fixed four-slot extent of a device buffer, fastest-varying dimension
/// first. Callers supply between zero and four dimensions; unspecified
/// trailing slots are padded with 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape([i32; 4]);

impl Shape {
    /// Normalizes a caller-supplied dimension list.
    ///
    /// Accepts 0 to 4 dimensions and fails with [`Error::InvalidShape`] for
    /// anything longer. Individual dimension magnitude is not checked here;
    /// the runtime allocator rejects sizes it cannot satisfy.
    pub fn new(dims: &[i32]) -> Result<Self> {
        if dims.len() > 4 {
            return Err(Error::InvalidShape(dims.len()));
        }
        let mut adims = [1i32; 4];
        adims[..dims.len()].copy_from_slice(dims);
        Ok(Shape(adims))
    }

    pub fn dims(&self) -> [i32; 4] {
        self.0
    }

    /// Total element count, the product of all four dimensions. Zero when
    /// the product is undefined (a negative dimension or overflow); see
    /// [`Shape::checked_elements`].
    pub fn elements(&self) -> usize {
        self.checked_elements().unwrap_or(0)
    }

    /// Dimension product, or `None` when a dimension is negative or the
    /// product overflows. Callers that want the runtime allocator to be the
    /// one rejecting such a shape pass it through instead of failing here.
    pub fn checked_elements(&self) -> Option<usize> {
        if self.0.iter().any(|&d| d < 0) {
            return None;
        }
        self.0
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d as usize))
    }
}

impl From<[i32; 4]> for Shape {
    fn from(dims: [i32; 4]) -> Self {
        Shape(dims)
    }
}

impl Index<usize> for Shape {
    type Output = i32;

    fn index(&self, i: usize) -> &i32 {
        &self.0[i]
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "[{} {} {} {}]", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}
