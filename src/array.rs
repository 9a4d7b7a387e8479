use num_complex::{Complex32, Complex64};

use crate::dtype::ElementType;
use crate::runtime::{self, HostBuffer};
use crate::shape::Shape;
use crate::{Error, Result};

/// Opaque token referencing a runtime-allocated buffer. Meaningless outside
/// the runtime; never interchangeable with a plain integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle(u64);

impl Handle {
    /// The sentinel: no resource owned.
    pub const NULL: Handle = Handle(0);

    pub(crate) fn from_raw(raw: u64) -> Self {
        Handle(raw)
    }

    pub(crate) fn raw(&self) -> u64 {
        self.0
    }

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

/// Per-kind construct/extract table collapsing the six concrete element
/// kinds into one generic path.
pub(crate) trait DeviceElement: Sized {
    const ELEMENT_TYPE: ElementType;

    fn to_buffer(data: &[Self]) -> HostBuffer;
    fn from_buffer(buffer: HostBuffer) -> Option<Vec<Self>>;
}

macro_rules! device_element {
    ($rust:ty, $tag:ident, $buf:ident) => {
        impl DeviceElement for $rust {
            const ELEMENT_TYPE: ElementType = ElementType::$tag;

            fn to_buffer(data: &[Self]) -> HostBuffer {
                HostBuffer::$buf(data.to_vec())
            }

            fn from_buffer(buffer: HostBuffer) -> Option<Vec<Self>> {
                match buffer {
                    HostBuffer::$buf(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

device_element!(f32, Real32, Real32);
device_element!(f64, Real64, Real64);
device_element!(i32, Int32, Int32);
device_element!(bool, Boolean, Boolean);
device_element!(Complex32, ComplexReal32, Complex32);
device_element!(Complex64, ComplexReal64, Complex64);

/// A managed handle over one runtime-allocated multidimensional buffer.
///
/// Ownership is exclusive: each live `Array` owns exactly one allocation,
/// and no two live arrays share a handle. The buffer is freed only by
/// [`Array::release`]; there is no `Drop` impl, so an `Array` that goes out
/// of scope without being released leaks its device buffer. The owner must
/// call `release` on every exit path, error paths included.
#[derive(Debug)]
pub struct Array {
    handle: Handle,
}

impl Array {
    /// Wraps a handle returned by a runtime call. The sentinel means the
    /// runtime failed to produce an allocation.
    pub(crate) fn from_handle(handle: Handle) -> Result<Self> {
        if handle.is_null() {
            return Err(Error::AllocationFailed);
        }
        Ok(Array { handle })
    }

    pub(crate) fn raw(&self) -> Handle {
        self.handle
    }

    /// Allocates a zero-initialized buffer of the given shape and type.
    pub fn empty(dims: &[i32], ty: ElementType) -> Result<Self> {
        let shape = Shape::new(dims)?;
        Self::from_handle(runtime::create_empty(shape.dims(), ty))
    }

    /// Allocates a buffer filled by the runtime's uniform random engine.
    pub fn randu(dims: &[i32], ty: ElementType) -> Result<Self> {
        let shape = Shape::new(dims)?;
        Self::from_handle(runtime::create_uniform(shape.dims(), ty))
    }

    /// Allocates a buffer filled by the runtime's normal random engine.
    pub fn randn(dims: &[i32], ty: ElementType) -> Result<Self> {
        let shape = Shape::new(dims)?;
        Self::from_handle(runtime::create_normal(shape.dims(), ty))
    }

    /// Allocates a buffer with every element set to `value`, coerced to
    /// `ty`.
    pub fn constant(value: f64, dims: &[i32], ty: ElementType) -> Result<Self> {
        let shape = Shape::new(dims)?;
        Self::from_handle(runtime::create_constant(value, shape.dims(), ty))
    }

    fn from_slice<T: DeviceElement>(dims: &[i32], data: &[T]) -> Result<Self> {
        let shape = Shape::new(dims)?;
        if data.is_empty() {
            return Err(Error::NullData);
        }
        // An undefined product (negative dim, overflow) is the allocator's
        // call to reject, not a length mismatch.
        if let Some(expected) = shape.checked_elements() {
            if data.len() != expected {
                return Err(Error::ShapeMismatch {
                    expected,
                    got: data.len(),
                });
            }
        }
        Self::from_handle(runtime::create_buffer(shape.dims(), T::to_buffer(data)))
    }

    pub fn from_f32(dims: &[i32], data: &[f32]) -> Result<Self> {
        Self::from_slice(dims, data)
    }

    pub fn from_f64(dims: &[i32], data: &[f64]) -> Result<Self> {
        Self::from_slice(dims, data)
    }

    pub fn from_i32(dims: &[i32], data: &[i32]) -> Result<Self> {
        Self::from_slice(dims, data)
    }

    pub fn from_bool(dims: &[i32], data: &[bool]) -> Result<Self> {
        Self::from_slice(dims, data)
    }

    pub fn from_c32(dims: &[i32], data: &[Complex32]) -> Result<Self> {
        Self::from_slice(dims, data)
    }

    pub fn from_c64(dims: &[i32], data: &[Complex64]) -> Result<Self> {
        Self::from_slice(dims, data)
    }

    /// The runtime-reported extent. The runtime is the source of truth;
    /// nothing is cached wrapper-side.
    pub fn dims(&self) -> Result<[i32; 4]> {
        runtime::shape_of(self.handle).ok_or(Error::InvalidHandle)
    }

    /// The runtime-reported element type.
    pub fn element_type(&self) -> Result<ElementType> {
        runtime::type_of(self.handle).ok_or(Error::InvalidHandle)
    }

    /// Total element count of the runtime-reported extent.
    pub fn elements(&self) -> Result<usize> {
        Ok(Shape::from(self.dims()?).elements())
    }

    /// Guard used before every extraction: the runtime-reported type must
    /// match the requested kind exactly.
    fn assert_type(&self, expected: ElementType) -> Result<()> {
        let found = self.element_type()?;
        if found != expected {
            return Err(Error::TypeMismatch {
                requested: expected,
                found,
            });
        }
        Ok(())
    }

    fn extract<T: DeviceElement>(&self) -> Result<Vec<T>> {
        self.assert_type(T::ELEMENT_TYPE)?;
        let buffer = runtime::extract(self.handle).ok_or(Error::InvalidHandle)?;
        T::from_buffer(buffer).ok_or(Error::InvalidHandle)
    }

    /// Materializes the whole buffer host-side, dimension 0 fastest. Fails
    /// with `TypeMismatch` unless the array holds real32 elements.
    pub fn to_f32(&self) -> Result<Vec<f32>> {
        self.extract()
    }

    pub fn to_f64(&self) -> Result<Vec<f64>> {
        self.extract()
    }

    pub fn to_i32(&self) -> Result<Vec<i32>> {
        self.extract()
    }

    pub fn to_bool(&self) -> Result<Vec<bool>> {
        self.extract()
    }

    pub fn to_c32(&self) -> Result<Vec<Complex32>> {
        self.extract()
    }

    pub fn to_c64(&self) -> Result<Vec<Complex64>> {
        self.extract()
    }

    /// Returns the buffer to the runtime allocator and clears the handle.
    /// Idempotent: a released array performs no runtime call here, and this
    /// is the only path that frees device memory.
    pub fn release(&mut self) {
        if self.handle.is_null() {
            return;
        }
        runtime::destroy(self.handle);
        self.handle = Handle::NULL;
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_null()
    }
}
