//! The native side of the boundary: a process-wide device runtime addressed
//! exclusively through opaque 64-bit handles. The wrapper layer never sees
//! buffers or errors from this module, only handles. The sentinel handle 0
//! signals every failure, mirroring how a native allocator reports one.

mod kernels;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use log::{debug, trace};
use once_cell::sync::Lazy;

use crate::array::Handle;
use crate::dtype::ElementType;

pub(crate) use kernels::{BinaryOp, HostBuffer, ReduceOp, UnaryOp};

/// Axis sentinel selecting a whole-buffer reduction.
pub(crate) const FULL: i32 = -1;

struct Entry {
    dims: [i32; 4],
    buffer: HostBuffer,
}

struct Runtime {
    table: Mutex<HashMap<u64, Entry>>,
    next_id: AtomicU64,
}

// One-time process-wide initialization; repeated access is a no-op.
static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    debug!("device runtime initialized (cpu reference backend)");
    Runtime {
        table: Mutex::new(HashMap::new()),
        next_id: AtomicU64::new(1),
    }
});

impl Runtime {
    fn insert(&self, dims: [i32; 4], buffer: HostBuffer) -> Handle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut table = match self.table.lock() {
            Ok(t) => t,
            Err(_) => return Handle::NULL,
        };
        table.insert(id, Entry { dims, buffer });
        trace!("allocated handle {} ({} elements)", id, dims.iter().product::<i32>());
        Handle::from_raw(id)
    }

    fn with_entry<R>(&self, h: Handle, f: impl FnOnce(&Entry) -> R) -> Option<R> {
        let table = self.table.lock().ok()?;
        table.get(&h.raw()).map(f)
    }
}

fn checked_len(dims: [i32; 4]) -> Option<usize> {
    if dims.iter().any(|&d| d < 0) {
        return None;
    }
    dims.iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d as usize))
}

// ---------------------------------------------------------------------------
// Creation entry points
// ---------------------------------------------------------------------------

pub(crate) fn create_empty(dims: [i32; 4], ty: ElementType) -> Handle {
    match checked_len(dims) {
        Some(n) => RUNTIME.insert(dims, kernels::zeros(ty, n)),
        None => Handle::NULL,
    }
}

/// One logical entry point per concrete element kind, carried by the closed
/// buffer enum. The buffer length is the caller's contract; a disagreement
/// with the dims product is an allocation failure here.
pub(crate) fn create_buffer(dims: [i32; 4], buffer: HostBuffer) -> Handle {
    match checked_len(dims) {
        Some(n) if n == buffer.len() => RUNTIME.insert(dims, buffer),
        _ => Handle::NULL,
    }
}

pub(crate) fn create_uniform(dims: [i32; 4], ty: ElementType) -> Handle {
    match checked_len(dims) {
        Some(n) => RUNTIME.insert(dims, kernels::uniform(ty, n)),
        None => Handle::NULL,
    }
}

pub(crate) fn create_normal(dims: [i32; 4], ty: ElementType) -> Handle {
    match checked_len(dims).and_then(|n| kernels::normal(ty, n)) {
        Some(buf) => RUNTIME.insert(dims, buf),
        None => Handle::NULL,
    }
}

pub(crate) fn create_constant(val: f64, dims: [i32; 4], ty: ElementType) -> Handle {
    match checked_len(dims) {
        Some(n) => RUNTIME.insert(dims, kernels::constant(val, ty, n)),
        None => Handle::NULL,
    }
}

// ---------------------------------------------------------------------------
// Lifecycle and queries
// ---------------------------------------------------------------------------

/// Returns the buffer to the allocator. Unknown handles are ignored, so a
/// second destroy of the same token is harmless.
pub(crate) fn destroy(h: Handle) {
    if let Ok(mut table) = RUNTIME.table.lock() {
        if table.remove(&h.raw()).is_some() {
            trace!("destroyed handle {}", h.raw());
        }
    }
}

pub(crate) fn shape_of(h: Handle) -> Option<[i32; 4]> {
    RUNTIME.with_entry(h, |e| e.dims)
}

pub(crate) fn type_of(h: Handle) -> Option<ElementType> {
    RUNTIME.with_entry(h, |e| e.buffer.element_type())
}

/// Materializes the whole buffer host-side, dimension 0 fastest.
pub(crate) fn extract(h: Handle) -> Option<HostBuffer> {
    RUNTIME.with_entry(h, |e| e.buffer.clone())
}

// ---------------------------------------------------------------------------
// Operation entry points
// ---------------------------------------------------------------------------

pub(crate) fn binary(op: BinaryOp, a: Handle, b: Handle) -> Handle {
    let lhs = match extract(a) {
        Some(buf) => buf,
        None => return Handle::NULL,
    };
    let out = RUNTIME.with_entry(b, |e| (kernels::binary(op, &lhs, &e.buffer), e.dims));
    match out {
        Some((Some(buf), dims)) => RUNTIME.insert(dims, buf),
        _ => Handle::NULL,
    }
}

pub(crate) fn unary(op: UnaryOp, a: Handle) -> Handle {
    let out = RUNTIME.with_entry(a, |e| (kernels::unary(op, &e.buffer), e.dims));
    match out {
        Some((Some(buf), dims)) => RUNTIME.insert(dims, buf),
        _ => Handle::NULL,
    }
}

pub(crate) fn scalar(op: BinaryOp, a: Handle, s: f32, scalar_first: bool) -> Handle {
    let out = RUNTIME.with_entry(a, |e| (kernels::scalar(op, &e.buffer, s, scalar_first), e.dims));
    match out {
        Some((Some(buf), dims)) => RUNTIME.insert(dims, buf),
        _ => Handle::NULL,
    }
}

/// Axis reduction; `FULL` collapses the whole buffer to one element.
pub(crate) fn reduce(op: ReduceOp, a: Handle, axis: i32) -> Handle {
    if axis == FULL {
        let out = RUNTIME.with_entry(a, |e| kernels::reduce_full(op, &e.buffer));
        return match out {
            Some(Some(buf)) => RUNTIME.insert([1, 1, 1, 1], buf),
            _ => Handle::NULL,
        };
    }
    if axis < 0 {
        return Handle::NULL;
    }
    let out = RUNTIME.with_entry(a, |e| kernels::reduce_axis(op, &e.buffer, e.dims, axis as usize));
    match out {
        Some(Some((buf, dims))) => RUNTIME.insert(dims, buf),
        _ => Handle::NULL,
    }
}

pub(crate) fn reduce_all(op: ReduceOp, a: Handle) -> Option<f64> {
    RUNTIME.with_entry(a, |e| kernels::reduce_all(op, &e.buffer))?
}

pub(crate) fn transform(a: Handle, rank: usize, inverse: bool) -> Handle {
    let out = RUNTIME.with_entry(a, |e| {
        (kernels::transform(&e.buffer, e.dims, rank, inverse), e.dims)
    });
    match out {
        Some((Some(buf), dims)) => RUNTIME.insert(dims, buf),
        _ => Handle::NULL,
    }
}

/// Diagnostic print of runtime and device information.
pub(crate) fn module_info() {
    let live = RUNTIME.table.lock().map(|t| t.len()).unwrap_or(0);
    println!("flare device runtime {}", env!("CARGO_PKG_VERSION"));
    println!("device: cpu (reference backend)");
    println!("live allocations: {}", live);
    debug!("module_info requested ({} live allocations)", live);
}
