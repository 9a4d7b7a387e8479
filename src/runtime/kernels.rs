//! Element math behind the runtime boundary: dtype promotion, elementwise
//! evaluation, reductions, and spectral transforms over host-resident
//! buffers. Everything here is private to the runtime; failures surface as
//! `None` and become the sentinel handle at the boundary.

use num_complex::{Complex32, Complex64};
use rand::Rng;
use rand_distr::StandardNormal;
use rustfft::FftPlanner;

use crate::dtype::ElementType;

/// One device buffer, tagged by element kind. Buffers are stored flat in
/// dimension-0-fastest order.
#[derive(Clone, Debug)]
pub(crate) enum HostBuffer {
    Real32(Vec<f32>),
    Real64(Vec<f64>),
    Int32(Vec<i32>),
    Boolean(Vec<bool>),
    Complex32(Vec<Complex32>),
    Complex64(Vec<Complex64>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Le,
    Lt,
    Ge,
    Gt,
    Eq,
    Ne,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Exp,
    Log,
    Abs,
    Sqrt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ReduceOp {
    Sum,
    Max,
    Min,
}

impl BinaryOp {
    fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Le | BinaryOp::Lt | BinaryOp::Ge | BinaryOp::Gt | BinaryOp::Eq | BinaryOp::Ne
        )
    }

    /// Ordering comparisons are undefined for complex operands; equality is
    /// not.
    fn is_ordering(&self) -> bool {
        matches!(self, BinaryOp::Le | BinaryOp::Lt | BinaryOp::Ge | BinaryOp::Gt)
    }
}

impl HostBuffer {
    pub(crate) fn element_type(&self) -> ElementType {
        match self {
            HostBuffer::Real32(_) => ElementType::Real32,
            HostBuffer::Real64(_) => ElementType::Real64,
            HostBuffer::Int32(_) => ElementType::Int32,
            HostBuffer::Boolean(_) => ElementType::Boolean,
            HostBuffer::Complex32(_) => ElementType::ComplexReal32,
            HostBuffer::Complex64(_) => ElementType::ComplexReal64,
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            HostBuffer::Real32(v) => v.len(),
            HostBuffer::Real64(v) => v.len(),
            HostBuffer::Int32(v) => v.len(),
            HostBuffer::Boolean(v) => v.len(),
            HostBuffer::Complex32(v) => v.len(),
            HostBuffer::Complex64(v) => v.len(),
        }
    }

    /// Lossless lift into the common compute domain.
    fn to_c64(&self) -> Vec<Complex64> {
        match self {
            HostBuffer::Real32(v) => v.iter().map(|&x| Complex64::new(x as f64, 0.0)).collect(),
            HostBuffer::Real64(v) => v.iter().map(|&x| Complex64::new(x, 0.0)).collect(),
            HostBuffer::Int32(v) => v.iter().map(|&x| Complex64::new(x as f64, 0.0)).collect(),
            HostBuffer::Boolean(v) => v
                .iter()
                .map(|&x| Complex64::new(if x { 1.0 } else { 0.0 }, 0.0))
                .collect(),
            HostBuffer::Complex32(v) => v
                .iter()
                .map(|&z| Complex64::new(z.re as f64, z.im as f64))
                .collect(),
            HostBuffer::Complex64(v) => v.clone(),
        }
    }

    /// Real-valued lift; `None` for complex buffers.
    fn to_f64(&self) -> Option<Vec<f64>> {
        match self {
            HostBuffer::Real32(v) => Some(v.iter().map(|&x| x as f64).collect()),
            HostBuffer::Real64(v) => Some(v.clone()),
            HostBuffer::Int32(v) => Some(v.iter().map(|&x| x as f64).collect()),
            HostBuffer::Boolean(v) => {
                Some(v.iter().map(|&x| if x { 1.0 } else { 0.0 }).collect())
            }
            HostBuffer::Complex32(_) | HostBuffer::Complex64(_) => None,
        }
    }
}

/// Cast out of the compute domain into a concrete element kind.
fn cast(vals: Vec<Complex64>, ty: ElementType) -> HostBuffer {
    match ty {
        ElementType::Real32 => HostBuffer::Real32(vals.iter().map(|v| v.re as f32).collect()),
        ElementType::Real64 => HostBuffer::Real64(vals.iter().map(|v| v.re).collect()),
        ElementType::Int32 => HostBuffer::Int32(vals.iter().map(|v| v.re as i32).collect()),
        ElementType::Boolean => {
            HostBuffer::Boolean(vals.iter().map(|v| v.re != 0.0 || v.im != 0.0).collect())
        }
        ElementType::ComplexReal32 => HostBuffer::Complex32(
            vals.iter()
                .map(|v| Complex32::new(v.re as f32, v.im as f32))
                .collect(),
        ),
        ElementType::ComplexReal64 => HostBuffer::Complex64(vals),
    }
}

fn real_rank(ty: ElementType) -> u8 {
    match ty {
        ElementType::Boolean => 0,
        ElementType::Int32 => 1,
        ElementType::Real32 | ElementType::ComplexReal32 => 2,
        ElementType::Real64 | ElementType::ComplexReal64 => 3,
    }
}

/// Promotion ladder for arithmetic results: complex wins over real, double
/// precision wins over single, otherwise the higher real rank.
fn promote(a: ElementType, b: ElementType) -> ElementType {
    if a.is_complex() || b.is_complex() {
        if a.is_double() || b.is_double() {
            ElementType::ComplexReal64
        } else {
            ElementType::ComplexReal32
        }
    } else if real_rank(a) >= real_rank(b) {
        a
    } else {
        b
    }
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

pub(crate) fn zeros(ty: ElementType, n: usize) -> HostBuffer {
    constant(0.0, ty, n)
}

pub(crate) fn constant(val: f64, ty: ElementType, n: usize) -> HostBuffer {
    match ty {
        ElementType::Real32 => HostBuffer::Real32(vec![val as f32; n]),
        ElementType::Real64 => HostBuffer::Real64(vec![val; n]),
        ElementType::Int32 => HostBuffer::Int32(vec![val as i32; n]),
        ElementType::Boolean => HostBuffer::Boolean(vec![val != 0.0; n]),
        ElementType::ComplexReal32 => {
            HostBuffer::Complex32(vec![Complex32::new(val as f32, 0.0); n])
        }
        ElementType::ComplexReal64 => HostBuffer::Complex64(vec![Complex64::new(val, 0.0); n]),
    }
}

pub(crate) fn uniform(ty: ElementType, n: usize) -> HostBuffer {
    let mut rng = rand::thread_rng();
    match ty {
        ElementType::Real32 => HostBuffer::Real32((0..n).map(|_| rng.gen::<f32>()).collect()),
        ElementType::Real64 => HostBuffer::Real64((0..n).map(|_| rng.gen::<f64>()).collect()),
        ElementType::Int32 => HostBuffer::Int32((0..n).map(|_| rng.gen::<i32>()).collect()),
        ElementType::Boolean => HostBuffer::Boolean((0..n).map(|_| rng.gen_bool(0.5)).collect()),
        ElementType::ComplexReal32 => HostBuffer::Complex32(
            (0..n)
                .map(|_| Complex32::new(rng.gen::<f32>(), rng.gen::<f32>()))
                .collect(),
        ),
        ElementType::ComplexReal64 => HostBuffer::Complex64(
            (0..n)
                .map(|_| Complex64::new(rng.gen::<f64>(), rng.gen::<f64>()))
                .collect(),
        ),
    }
}

/// Standard-normal fill. Defined for the floating and complex kinds only.
pub(crate) fn normal(ty: ElementType, n: usize) -> Option<HostBuffer> {
    let mut rng = rand::thread_rng();
    let buf = match ty {
        ElementType::Real32 => {
            HostBuffer::Real32((0..n).map(|_| rng.sample::<f64, _>(StandardNormal) as f32).collect())
        }
        ElementType::Real64 => {
            HostBuffer::Real64((0..n).map(|_| rng.sample(StandardNormal)).collect())
        }
        ElementType::ComplexReal32 => HostBuffer::Complex32(
            (0..n)
                .map(|_| {
                    Complex32::new(
                        rng.sample::<f64, _>(StandardNormal) as f32,
                        rng.sample::<f64, _>(StandardNormal) as f32,
                    )
                })
                .collect(),
        ),
        ElementType::ComplexReal64 => HostBuffer::Complex64(
            (0..n)
                .map(|_| Complex64::new(rng.sample(StandardNormal), rng.sample(StandardNormal)))
                .collect(),
        ),
        ElementType::Boolean | ElementType::Int32 => return None,
    };
    Some(buf)
}

// ---------------------------------------------------------------------------
// Elementwise
// ---------------------------------------------------------------------------

fn arith(op: BinaryOp, a: Complex64, b: Complex64) -> Complex64 {
    match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Pow => a.powc(b),
        _ => unreachable!("comparison routed through the ordering path"),
    }
}

fn compare(op: BinaryOp, a: f64, b: f64) -> bool {
    match op {
        BinaryOp::Le => a <= b,
        BinaryOp::Lt => a < b,
        BinaryOp::Ge => a >= b,
        BinaryOp::Gt => a > b,
        BinaryOp::Eq => a == b,
        BinaryOp::Ne => a != b,
        _ => unreachable!("arithmetic routed through the complex path"),
    }
}

pub(crate) fn binary(op: BinaryOp, a: &HostBuffer, b: &HostBuffer) -> Option<HostBuffer> {
    if a.len() != b.len() {
        return None;
    }
    let (ta, tb) = (a.element_type(), b.element_type());
    if op.is_comparison() {
        if op.is_ordering() && (ta.is_complex() || tb.is_complex()) {
            return None;
        }
        if ta.is_complex() || tb.is_complex() {
            // Eq/Ne over complex operands compare both components.
            let (va, vb) = (a.to_c64(), b.to_c64());
            let want_eq = op == BinaryOp::Eq;
            return Some(HostBuffer::Boolean(
                va.iter()
                    .zip(vb.iter())
                    .map(|(x, y)| (x == y) == want_eq)
                    .collect(),
            ));
        }
        let (va, vb) = (a.to_f64()?, b.to_f64()?);
        return Some(HostBuffer::Boolean(
            va.iter().zip(vb.iter()).map(|(&x, &y)| compare(op, x, y)).collect(),
        ));
    }
    let (va, vb) = (a.to_c64(), b.to_c64());
    let out: Vec<Complex64> = va
        .iter()
        .zip(vb.iter())
        .map(|(&x, &y)| arith(op, x, y))
        .collect();
    Some(cast(out, promote(ta, tb)))
}

pub(crate) fn scalar(
    op: BinaryOp,
    a: &HostBuffer,
    s: f32,
    scalar_first: bool,
) -> Option<HostBuffer> {
    let ta = a.element_type();
    let sv = s as f64;
    if op.is_comparison() {
        if ta.is_complex() {
            return None;
        }
        let va = a.to_f64()?;
        return Some(HostBuffer::Boolean(
            va.iter()
                .map(|&x| {
                    if scalar_first {
                        compare(op, sv, x)
                    } else {
                        compare(op, x, sv)
                    }
                })
                .collect(),
        ));
    }
    let sc = Complex64::new(sv, 0.0);
    let out: Vec<Complex64> = a
        .to_c64()
        .iter()
        .map(|&x| {
            if scalar_first {
                arith(op, sc, x)
            } else {
                arith(op, x, sc)
            }
        })
        .collect();
    Some(cast(out, promote(ta, ElementType::Real32)))
}

fn real_unary(op: UnaryOp, x: f64) -> f64 {
    match op {
        UnaryOp::Sin => x.sin(),
        UnaryOp::Cos => x.cos(),
        UnaryOp::Tan => x.tan(),
        UnaryOp::Asin => x.asin(),
        UnaryOp::Acos => x.acos(),
        UnaryOp::Atan => x.atan(),
        UnaryOp::Sinh => x.sinh(),
        UnaryOp::Cosh => x.cosh(),
        UnaryOp::Tanh => x.tanh(),
        UnaryOp::Asinh => x.asinh(),
        UnaryOp::Acosh => x.acosh(),
        UnaryOp::Atanh => x.atanh(),
        UnaryOp::Exp => x.exp(),
        UnaryOp::Log => x.ln(),
        UnaryOp::Abs => x.abs(),
        UnaryOp::Sqrt => x.sqrt(),
    }
}

fn complex_unary(op: UnaryOp, z: Complex64) -> Complex64 {
    match op {
        UnaryOp::Sin => z.sin(),
        UnaryOp::Cos => z.cos(),
        UnaryOp::Tan => z.tan(),
        UnaryOp::Asin => z.asin(),
        UnaryOp::Acos => z.acos(),
        UnaryOp::Atan => z.atan(),
        UnaryOp::Sinh => z.sinh(),
        UnaryOp::Cosh => z.cosh(),
        UnaryOp::Tanh => z.tanh(),
        UnaryOp::Asinh => z.asinh(),
        UnaryOp::Acosh => z.acosh(),
        UnaryOp::Atanh => z.atanh(),
        UnaryOp::Exp => z.exp(),
        UnaryOp::Log => z.ln(),
        UnaryOp::Abs => Complex64::new(z.norm(), 0.0),
        UnaryOp::Sqrt => z.sqrt(),
    }
}

pub(crate) fn unary(op: UnaryOp, a: &HostBuffer) -> Option<HostBuffer> {
    let ta = a.element_type();
    if ta.is_complex() {
        let out: Vec<Complex64> = a.to_c64().iter().map(|&z| complex_unary(op, z)).collect();
        // Magnitude collapses complex input to the matching real kind.
        let rty = match (op, ta) {
            (UnaryOp::Abs, ElementType::ComplexReal32) => ElementType::Real32,
            (UnaryOp::Abs, ElementType::ComplexReal64) => ElementType::Real64,
            (_, t) => t,
        };
        return Some(cast(out, rty));
    }
    let out: Vec<Complex64> = a
        .to_f64()?
        .iter()
        .map(|&x| Complex64::new(real_unary(op, x), 0.0))
        .collect();
    let rty = if ta == ElementType::Real64 {
        ElementType::Real64
    } else {
        ElementType::Real32
    };
    Some(cast(out, rty))
}

// ---------------------------------------------------------------------------
// Reductions
// ---------------------------------------------------------------------------

fn dims_usize(dims: [i32; 4]) -> [usize; 4] {
    [
        dims[0] as usize,
        dims[1] as usize,
        dims[2] as usize,
        dims[3] as usize,
    ]
}

fn offset(c: [usize; 4], d: [usize; 4]) -> usize {
    c[0] + d[0] * (c[1] + d[1] * (c[2] + d[2] * c[3]))
}

fn coords(mut i: usize, d: [usize; 4]) -> [usize; 4] {
    let mut c = [0usize; 4];
    for k in 0..4 {
        if d[k] == 0 {
            return c;
        }
        c[k] = i % d[k];
        i /= d[k];
    }
    c
}

fn reduce_output_type(op: ReduceOp, ty: ElementType) -> ElementType {
    match (op, ty) {
        // Summing booleans counts them.
        (ReduceOp::Sum, ElementType::Boolean) => ElementType::Int32,
        (_, t) => t,
    }
}

pub(crate) fn reduce_axis(
    op: ReduceOp,
    a: &HostBuffer,
    dims: [i32; 4],
    axis: usize,
) -> Option<(HostBuffer, [i32; 4])> {
    if axis >= 4 {
        return None;
    }
    let d = dims_usize(dims);
    let mut out_dims = dims;
    out_dims[axis] = 1;
    let od = dims_usize(out_dims);
    let out_len = od.iter().product::<usize>();
    let ty = a.element_type();
    let out = match op {
        ReduceOp::Sum => {
            let vals = a.to_c64();
            let mut acc = vec![Complex64::new(0.0, 0.0); out_len];
            for (i, v) in vals.iter().enumerate() {
                let mut c = coords(i, d);
                c[axis] = 0;
                acc[offset(c, od)] += v;
            }
            cast(acc, reduce_output_type(op, ty))
        }
        ReduceOp::Max | ReduceOp::Min => {
            if ty.is_complex() {
                return None;
            }
            let vals = a.to_f64()?;
            let init = if op == ReduceOp::Max {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            };
            let mut acc = vec![init; out_len];
            for (i, &v) in vals.iter().enumerate() {
                let mut c = coords(i, d);
                c[axis] = 0;
                let slot = &mut acc[offset(c, od)];
                *slot = if op == ReduceOp::Max {
                    slot.max(v)
                } else {
                    slot.min(v)
                };
            }
            cast(
                acc.into_iter().map(|x| Complex64::new(x, 0.0)).collect(),
                reduce_output_type(op, ty),
            )
        }
    };
    Some((out, out_dims))
}

/// Whole-buffer reduction to a one-element buffer of the output kind.
/// Sums accumulate in the complex compute domain, so complex input keeps
/// both components; extrema fall back to the scalar path.
pub(crate) fn reduce_full(op: ReduceOp, a: &HostBuffer) -> Option<HostBuffer> {
    let ty = reduce_output_type(op, a.element_type());
    match op {
        ReduceOp::Sum => {
            let total = a
                .to_c64()
                .iter()
                .fold(Complex64::new(0.0, 0.0), |acc, &v| acc + v);
            Some(cast(vec![total], ty))
        }
        ReduceOp::Max | ReduceOp::Min => {
            reduce_all(op, a).map(|v| constant(v, ty, 1))
        }
    }
}

/// Whole-buffer reduction to one double. Complex sums keep the real part;
/// complex extrema are unordered and fail.
pub(crate) fn reduce_all(op: ReduceOp, a: &HostBuffer) -> Option<f64> {
    match op {
        ReduceOp::Sum => {
            let total = a
                .to_c64()
                .iter()
                .fold(Complex64::new(0.0, 0.0), |acc, &v| acc + v);
            Some(total.re)
        }
        ReduceOp::Max => {
            let vals = a.to_f64()?;
            Some(vals.iter().fold(f64::NEG_INFINITY, |m, &v| m.max(v)))
        }
        ReduceOp::Min => {
            let vals = a.to_f64()?;
            Some(vals.iter().fold(f64::INFINITY, |m, &v| m.min(v)))
        }
    }
}

// ---------------------------------------------------------------------------
// Spectral transforms
// ---------------------------------------------------------------------------

/// Forward or inverse transform over the leading `rank` axes. Real input is
/// promoted to the matching complex kind; the inverse pass is scaled by 1/n
/// per transformed axis.
pub(crate) fn transform(
    a: &HostBuffer,
    dims: [i32; 4],
    rank: usize,
    inverse: bool,
) -> Option<HostBuffer> {
    if rank == 0 || rank > 3 {
        return None;
    }
    let d = dims_usize(dims);
    let mut data = a.to_c64();
    let mut planner = FftPlanner::<f64>::new();
    for axis in 0..rank {
        let n = d[axis];
        if n == 0 {
            return None;
        }
        if n == 1 {
            continue;
        }
        let fft = if inverse {
            planner.plan_fft_inverse(n)
        } else {
            planner.plan_fft_forward(n)
        };
        let stride: usize = d[..axis].iter().product();
        let scale = 1.0 / n as f64;
        let mut line = vec![Complex64::new(0.0, 0.0); n];
        for base in line_starts(d, axis) {
            for (k, slot) in line.iter_mut().enumerate() {
                *slot = data[base + k * stride];
            }
            fft.process(&mut line);
            if inverse {
                for v in line.iter_mut() {
                    *v *= scale;
                }
            }
            for (k, v) in line.iter().enumerate() {
                data[base + k * stride] = *v;
            }
        }
    }
    let ty = if a.element_type().is_double() {
        ElementType::ComplexReal64
    } else {
        ElementType::ComplexReal32
    };
    Some(cast(data, ty))
}

/// Linear offsets of every element whose coordinate along `axis` is zero.
fn line_starts(d: [usize; 4], axis: usize) -> Vec<usize> {
    let mut starts = Vec::new();
    for i3 in 0..d[3] {
        for i2 in 0..d[2] {
            for i1 in 0..d[1] {
                for i0 in 0..d[0] {
                    let c = [i0, i1, i2, i3];
                    if c[axis] != 0 {
                        continue;
                    }
                    starts.push(offset(c, d));
                }
            }
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f32_buf(vals: &[f32]) -> HostBuffer {
        HostBuffer::Real32(vals.to_vec())
    }

    #[test]
    fn promote_follows_the_ladder() {
        assert_eq!(
            promote(ElementType::Boolean, ElementType::Int32),
            ElementType::Int32
        );
        assert_eq!(
            promote(ElementType::Real32, ElementType::Real64),
            ElementType::Real64
        );
        assert_eq!(
            promote(ElementType::ComplexReal32, ElementType::Real64),
            ElementType::ComplexReal64
        );
        assert_eq!(
            promote(ElementType::ComplexReal32, ElementType::Int32),
            ElementType::ComplexReal32
        );
    }

    #[test]
    fn binary_add_matches_elementwise() {
        let a = f32_buf(&[1.0, 2.0, 3.0]);
        let out = binary(BinaryOp::Add, &a, &a).unwrap();
        match out {
            HostBuffer::Real32(v) => assert_eq!(v, vec![2.0, 4.0, 6.0]),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn binary_rejects_length_mismatch() {
        let a = f32_buf(&[1.0, 2.0]);
        let b = f32_buf(&[1.0, 2.0, 3.0]);
        assert!(binary(BinaryOp::Add, &a, &b).is_none());
    }

    #[test]
    fn ordering_comparison_rejects_complex() {
        let a = HostBuffer::Complex32(vec![Complex32::new(1.0, 0.0)]);
        assert!(binary(BinaryOp::Lt, &a, &a).is_none());
        // Equality over complex is fine.
        match binary(BinaryOp::Eq, &a, &a).unwrap() {
            HostBuffer::Boolean(v) => assert_eq!(v, vec![true]),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn scalar_first_subtraction_orders_operands() {
        let a = f32_buf(&[1.0, 2.0]);
        match scalar(BinaryOp::Sub, &a, 10.0, true).unwrap() {
            HostBuffer::Real32(v) => assert_eq!(v, vec![9.0, 8.0]),
            other => panic!("unexpected kind {:?}", other),
        }
        match scalar(BinaryOp::Sub, &a, 10.0, false).unwrap() {
            HostBuffer::Real32(v) => assert_eq!(v, vec![-9.0, -8.0]),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn unary_promotes_int_to_real32() {
        let a = HostBuffer::Int32(vec![0, 1]);
        match unary(UnaryOp::Exp, &a).unwrap() {
            HostBuffer::Real32(v) => {
                assert!((v[0] - 1.0).abs() < 1e-6);
                assert!((v[1] - std::f32::consts::E).abs() < 1e-5);
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn abs_of_complex_is_real_magnitude() {
        let a = HostBuffer::Complex64(vec![Complex64::new(3.0, 4.0)]);
        match unary(UnaryOp::Abs, &a).unwrap() {
            HostBuffer::Real64(v) => assert!((v[0] - 5.0).abs() < 1e-12),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn axis_reduce_sums_along_the_requested_axis() {
        // Shape [2, 3, 1, 1], dimension 0 fastest: columns are [1,2], [3,4], [5,6].
        let a = f32_buf(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let (out, out_dims) = reduce_axis(ReduceOp::Sum, &a, [2, 3, 1, 1], 0).unwrap();
        assert_eq!(out_dims, [1, 3, 1, 1]);
        match out {
            HostBuffer::Real32(v) => assert_eq!(v, vec![3.0, 7.0, 11.0]),
            other => panic!("unexpected kind {:?}", other),
        }
        let (out, out_dims) = reduce_axis(ReduceOp::Sum, &a, [2, 3, 1, 1], 1).unwrap();
        assert_eq!(out_dims, [2, 1, 1, 1]);
        match out {
            HostBuffer::Real32(v) => assert_eq!(v, vec![9.0, 12.0]),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn bool_sum_counts() {
        let a = HostBuffer::Boolean(vec![true, false, true, true]);
        let (out, _) = reduce_axis(ReduceOp::Sum, &a, [4, 1, 1, 1], 0).unwrap();
        match out {
            HostBuffer::Int32(v) => assert_eq!(v, vec![3]),
            other => panic!("unexpected kind {:?}", other),
        }
        assert_eq!(reduce_all(ReduceOp::Sum, &a), Some(3.0));
    }

    #[test]
    fn full_sum_keeps_complex_components() {
        let a = HostBuffer::Complex64(vec![
            Complex64::new(1.0, 2.0),
            Complex64::new(3.0, -0.5),
        ]);
        match reduce_full(ReduceOp::Sum, &a).unwrap() {
            HostBuffer::Complex64(v) => {
                assert_eq!(v.len(), 1);
                assert!((v[0].re - 4.0).abs() < 1e-12);
                assert!((v[0].im - 1.5).abs() < 1e-12);
            }
            other => panic!("unexpected kind {:?}", other),
        }
        // Extrema stay unordered over complex input.
        assert!(reduce_full(ReduceOp::Max, &a).is_none());
    }

    #[test]
    fn reduce_all_extrema() {
        let a = f32_buf(&[3.0, -1.0, 2.0]);
        assert_eq!(reduce_all(ReduceOp::Max, &a), Some(3.0));
        assert_eq!(reduce_all(ReduceOp::Min, &a), Some(-1.0));
        let c = HostBuffer::Complex32(vec![Complex32::new(1.0, 1.0)]);
        assert!(reduce_all(ReduceOp::Max, &c).is_none());
    }

    #[test]
    fn forward_then_inverse_transform_round_trips() {
        let vals = vec![1.0f32, -2.0, 3.5, 0.25];
        let a = f32_buf(&vals);
        let fwd = transform(&a, [4, 1, 1, 1], 1, false).unwrap();
        let back = transform(&fwd, [4, 1, 1, 1], 1, true).unwrap();
        match back {
            HostBuffer::Complex32(v) => {
                for (got, want) in v.iter().zip(vals.iter()) {
                    assert!((got.re - want).abs() < 1e-4);
                    assert!(got.im.abs() < 1e-4);
                }
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn dc_component_is_the_sum() {
        let a = f32_buf(&[1.0, 2.0, 3.0, 4.0]);
        match transform(&a, [4, 1, 1, 1], 1, false).unwrap() {
            HostBuffer::Complex32(v) => {
                assert!((v[0].re - 10.0).abs() < 1e-4);
                assert!(v[0].im.abs() < 1e-4);
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }
}
