//! Construction, extraction, and lifecycle behavior of the managed array.

use flare::{Array, Complex32, Complex64, ElementType, Error};

#[test]
fn from_host_data_round_trips_each_kind() {
    let mut a = Array::from_f32(&[2, 2], &[1.0, 2.0, 3.0, 4.0]).unwrap();
    assert_eq!(a.to_f32().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(a.dims().unwrap(), [2, 2, 1, 1]);
    assert_eq!(a.element_type().unwrap(), ElementType::Real32);
    a.release();

    let mut b = Array::from_f64(&[3], &[0.5, 1.5, 2.5]).unwrap();
    assert_eq!(b.to_f64().unwrap(), vec![0.5, 1.5, 2.5]);
    assert_eq!(b.element_type().unwrap(), ElementType::Real64);
    b.release();

    let mut c = Array::from_i32(&[4], &[-1, 0, 1, 2]).unwrap();
    assert_eq!(c.to_i32().unwrap(), vec![-1, 0, 1, 2]);
    c.release();

    let mut d = Array::from_bool(&[2], &[true, false]).unwrap();
    assert_eq!(d.to_bool().unwrap(), vec![true, false]);
    d.release();

    let vals32 = vec![Complex32::new(1.0, -1.0), Complex32::new(0.0, 2.0)];
    let mut e = Array::from_c32(&[2], &vals32).unwrap();
    assert_eq!(e.to_c32().unwrap(), vals32);
    assert_eq!(e.element_type().unwrap(), ElementType::ComplexReal32);
    e.release();

    let vals64 = vec![Complex64::new(3.0, 4.0)];
    let mut f = Array::from_c64(&[1], &vals64).unwrap();
    assert_eq!(f.to_c64().unwrap(), vals64);
    f.release();
}

#[test]
fn dims_normalize_before_any_allocation() {
    let mut a = Array::from_f32(&[6], &[0.0; 6]).unwrap();
    assert_eq!(a.dims().unwrap(), [6, 1, 1, 1]);
    a.release();

    // Five dimensions never reach the runtime.
    assert_eq!(
        Array::empty(&[1, 1, 1, 1, 1], ElementType::Real32).unwrap_err(),
        Error::InvalidShape(5)
    );
    assert_eq!(
        Array::from_f32(&[1, 1, 1, 1, 1], &[1.0]).unwrap_err(),
        Error::InvalidShape(5)
    );
    assert_eq!(
        Array::constant(0.0, &[2, 2, 2, 2, 2], ElementType::Int32).unwrap_err(),
        Error::InvalidShape(5)
    );
}

#[test]
fn negative_dims_reach_the_runtime_and_fail_there() {
    // The wrapper passes bad dimension values through untouched; the
    // allocator rejects them with the sentinel.
    assert_eq!(
        Array::from_f32(&[-2, -2], &[1.0, 2.0, 3.0, 4.0]).unwrap_err(),
        Error::AllocationFailed
    );
    assert_eq!(
        Array::empty(&[-1], ElementType::Real32).unwrap_err(),
        Error::AllocationFailed
    );
    assert_eq!(
        Array::constant(1.0, &[3, -3], ElementType::Real64).unwrap_err(),
        Error::AllocationFailed
    );
}

#[test]
fn buffer_length_must_equal_shape_product() {
    assert_eq!(
        Array::from_f32(&[2, 3], &[1.0, 2.0, 3.0]).unwrap_err(),
        Error::ShapeMismatch {
            expected: 6,
            got: 3
        }
    );
    assert_eq!(
        Array::from_i32(&[2], &[1, 2, 3]).unwrap_err(),
        Error::ShapeMismatch {
            expected: 2,
            got: 3
        }
    );
}

#[test]
fn missing_buffer_is_null_data() {
    assert_eq!(Array::from_f32(&[2, 3], &[]).unwrap_err(), Error::NullData);
    assert_eq!(Array::from_bool(&[1], &[]).unwrap_err(), Error::NullData);
}

#[test]
fn extraction_with_wrong_kind_is_type_mismatch() {
    let mut a = Array::from_i32(&[3], &[1, 2, 3]).unwrap();
    assert_eq!(
        a.to_f32(),
        Err(Error::TypeMismatch {
            requested: ElementType::Real32,
            found: ElementType::Int32,
        })
    );
    // The failed extraction left the array untouched.
    assert_eq!(a.to_i32().unwrap(), vec![1, 2, 3]);
    a.release();
}

#[test]
fn empty_is_zero_filled() {
    let mut a = Array::empty(&[2, 3], ElementType::Real32).unwrap();
    assert_eq!(a.to_f32().unwrap(), vec![0.0; 6]);
    a.release();

    let mut b = Array::empty(&[2], ElementType::ComplexReal64).unwrap();
    assert_eq!(b.to_c64().unwrap(), vec![Complex64::new(0.0, 0.0); 2]);
    b.release();
}

#[test]
fn constant_fills_and_coerces() {
    let mut a = Array::constant(2.7, &[4], ElementType::Int32).unwrap();
    assert_eq!(a.to_i32().unwrap(), vec![2; 4]);
    a.release();

    let mut b = Array::constant(1.0, &[5], ElementType::Boolean).unwrap();
    assert_eq!(b.to_bool().unwrap(), vec![true; 5]);
    b.release();

    let mut c = Array::constant(-1.5, &[2, 2], ElementType::Real64).unwrap();
    assert_eq!(c.to_f64().unwrap(), vec![-1.5; 4]);
    c.release();
}

#[test]
fn randu_real_values_lie_in_unit_interval() {
    let mut a = Array::randu(&[100], ElementType::Real32).unwrap();
    let vals = a.to_f32().unwrap();
    assert_eq!(vals.len(), 100);
    assert!(vals.iter().all(|&v| (0.0..1.0).contains(&v)));
    a.release();
}

#[test]
fn randn_allocates_floating_kinds_only() {
    let mut a = Array::randn(&[10], ElementType::Real64).unwrap();
    assert_eq!(a.to_f64().unwrap().len(), 10);
    a.release();

    assert_eq!(
        Array::randn(&[10], ElementType::Boolean).unwrap_err(),
        Error::AllocationFailed
    );
}

#[test]
fn release_is_idempotent() {
    let mut a = Array::from_f32(&[2], &[1.0, 2.0]).unwrap();
    assert!(!a.is_released());
    a.release();
    assert!(a.is_released());
    // Second release performs no runtime call and never faults.
    a.release();
    assert!(a.is_released());
}

#[test]
fn queries_after_release_fail_cleanly() {
    let mut a = Array::from_f32(&[2], &[1.0, 2.0]).unwrap();
    a.release();
    assert_eq!(a.dims(), Err(Error::InvalidHandle));
    assert_eq!(a.element_type(), Err(Error::InvalidHandle));
    assert_eq!(a.to_f32(), Err(Error::InvalidHandle));
}

#[test]
fn elements_reports_shape_product() {
    let mut a = Array::empty(&[2, 3, 4], ElementType::Real32).unwrap();
    assert_eq!(a.elements().unwrap(), 24);
    a.release();
}
