use std::fmt::{Display, Formatter, Result as FmtResult};

/// Tag identifying which concrete element kind a device buffer holds.
///
/// Fixed at creation and immutable for the lifetime of the handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    Real32,
    ComplexReal32,
    Real64,
    ComplexReal64,
    Boolean,
    Int32,
}

impl ElementType {
    pub fn name(&self) -> &'static str {
        match self {
            ElementType::Real32 => "real32",
            ElementType::ComplexReal32 => "complex32",
            ElementType::Real64 => "real64",
            ElementType::ComplexReal64 => "complex64",
            ElementType::Boolean => "boolean",
            ElementType::Int32 => "int32",
        }
    }

    pub(crate) fn is_complex(&self) -> bool {
        matches!(self, ElementType::ComplexReal32 | ElementType::ComplexReal64)
    }

    /// True for the two double-precision kinds.
    pub(crate) fn is_double(&self) -> bool {
        matches!(self, ElementType::Real64 | ElementType::ComplexReal64)
    }
}

impl Display for ElementType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}
