mod context;
mod error;
mod types;

pub use context::*;
pub use error::*;
pub use types::*;

use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::AssertUnwindSafe;

use mm_kernel::{Dims, Element, KernelConfig, Multiplier};

/// Execute a closure that returns an `MMStatus`, catching any panics
/// and converting them into `MMStatus::ErrorInternal`.
fn catch_panic<F: FnOnce() -> MMStatus>(f: F) -> MMStatus {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(status) => status,
        Err(_) => {
            set_last_error("internal panic".to_string());
            MMStatus::ErrorInternal
        }
    }
}

/// Borrow `len` elements at `ptr`. A null pointer is only accepted for an
/// empty buffer.
unsafe fn borrow_slice<'a, T>(
    name: &str,
    ptr: *const T,
    len: usize,
) -> std::result::Result<&'a [T], MMStatus> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        set_last_error(format!("{} is null", name));
        return Err(MMStatus::ErrorInvalidArgument);
    }
    Ok(std::slice::from_raw_parts(ptr, len))
}

unsafe fn borrow_slice_mut<'a, T>(
    name: &str,
    ptr: *mut T,
    len: usize,
) -> std::result::Result<&'a mut [T], MMStatus> {
    if len == 0 {
        return Ok(&mut []);
    }
    if ptr.is_null() {
        set_last_error(format!("{} is null", name));
        return Err(MMStatus::ErrorInvalidArgument);
    }
    Ok(std::slice::from_raw_parts_mut(ptr, len))
}

/// Shared body of every multiply export.
///
/// # Safety
/// `a`, `b` and `result` must point to `n*m`, `m*l` and `n*l` valid
/// elements respectively (or be null when that count is zero), and
/// `result` must not overlap `a` or `b`.
unsafe fn multiply_raw<T: Element>(
    multiplier: &Multiplier,
    n: i32,
    m: i32,
    l: i32,
    a: *const T,
    b: *const T,
    result: *mut T,
) -> MMStatus {
    let dims = match Dims::from_signed(n, m, l) {
        Ok(d) => d,
        Err(e) => return report(e),
    };
    let lengths = dims
        .a_len()
        .and_then(|a_len| Ok((a_len, dims.b_len()?, dims.c_len()?)));
    let (a_len, b_len, c_len) = match lengths {
        Ok(lens) => lens,
        Err(e) => return report(e),
    };

    let slices = borrow_slice("a", a, a_len).and_then(|a| {
        Ok((
            a,
            borrow_slice("b", b, b_len)?,
            borrow_slice_mut("result", result, c_len)?,
        ))
    });
    let (a, b, c) = match slices {
        Ok(s) => s,
        Err(status) => return status,
    };

    match multiplier.multiply(dims, a, b, c) {
        Ok(()) => MMStatus::Ok,
        Err(e) => report(e),
    }
}

unsafe fn kernel_multiply_raw<T: Element>(
    kernel: *const MMKernel,
    n: i32,
    m: i32,
    l: i32,
    a: *const T,
    b: *const T,
    result: *mut T,
) -> MMStatus {
    catch_panic(|| {
        if kernel.is_null() {
            set_last_error("kernel is null".to_string());
            return MMStatus::ErrorInvalidArgument;
        }
        let kernel = unsafe { &*kernel };
        unsafe { multiply_raw(&kernel.multiplier, n, m, l, a, b, result) }
    })
}

/// Multiply two row-major `int32_t` matrices: `result += a @ b`.
///
/// `a` is `n x m`, `b` is `m x l`, `result` is `n x l`. The product is
/// added to the current contents of `result`, so pass a zeroed buffer for
/// the plain product. Runs on the process-wide worker pool.
///
/// # Safety
/// Each pointer must reference as many valid elements as its shape
/// describes, and `result` must not overlap `a` or `b`. The pointers are
/// not retained after the call returns.
#[no_mangle]
pub unsafe extern "C" fn mm_multiply_int_matrices(
    n: i32,
    m: i32,
    l: i32,
    a: *const i32,
    b: *const i32,
    result: *mut i32,
) -> MMStatus {
    catch_panic(|| unsafe { multiply_raw(Multiplier::shared(), n, m, l, a, b, result) })
}

/// Multiply two row-major `float` matrices: `result += a @ b`.
///
/// # Safety
/// Same contract as `mm_multiply_int_matrices`.
#[no_mangle]
pub unsafe extern "C" fn mm_multiply_float_matrices(
    n: i32,
    m: i32,
    l: i32,
    a: *const f32,
    b: *const f32,
    result: *mut f32,
) -> MMStatus {
    catch_panic(|| unsafe { multiply_raw(Multiplier::shared(), n, m, l, a, b, result) })
}

/// Multiply two row-major `double` matrices: `result += a @ b`.
///
/// # Safety
/// Same contract as `mm_multiply_int_matrices`.
#[no_mangle]
pub unsafe extern "C" fn mm_multiply_double_matrices(
    n: i32,
    m: i32,
    l: i32,
    a: *const f64,
    b: *const f64,
    result: *mut f64,
) -> MMStatus {
    catch_panic(|| unsafe { multiply_raw(Multiplier::shared(), n, m, l, a, b, result) })
}

/// Create a kernel with its own worker pool.
///
/// On success, writes a heap-allocated `MMKernel` pointer into `*kernel_out`
/// and returns `MMStatus::Ok`. The caller must later call `mm_kernel_destroy`
/// to free the kernel and join its threads.
#[no_mangle]
pub extern "C" fn mm_kernel_create(
    params: MMKernelParams,
    kernel_out: *mut *mut MMKernel,
) -> MMStatus {
    catch_panic(|| {
        if kernel_out.is_null() {
            set_last_error("kernel_out is null".to_string());
            return MMStatus::ErrorInvalidArgument;
        }
        let kernel = match MMKernel::new(KernelConfig::from(&params)) {
            Ok(k) => Box::new(k),
            Err(e) => return report(e),
        };
        unsafe {
            *kernel_out = Box::into_raw(kernel);
        }
        MMStatus::Ok
    })
}

/// Destroy a kernel previously created by `mm_kernel_create`.
///
/// Passing a null pointer is a no-op and returns `MMStatus::Ok`.
#[no_mangle]
pub unsafe extern "C" fn mm_kernel_destroy(kernel: *mut MMKernel) -> MMStatus {
    if kernel.is_null() {
        return MMStatus::Ok;
    }
    drop(Box::from_raw(kernel));
    MMStatus::Ok
}

/// `mm_multiply_int_matrices` on a kernel from `mm_kernel_create`.
///
/// # Safety
/// `kernel` must be a live kernel; buffers as for `mm_multiply_int_matrices`.
#[no_mangle]
pub unsafe extern "C" fn mm_kernel_multiply_int_matrices(
    kernel: *const MMKernel,
    n: i32,
    m: i32,
    l: i32,
    a: *const i32,
    b: *const i32,
    result: *mut i32,
) -> MMStatus {
    kernel_multiply_raw(kernel, n, m, l, a, b, result)
}

/// `mm_multiply_float_matrices` on a kernel from `mm_kernel_create`.
///
/// # Safety
/// `kernel` must be a live kernel; buffers as for `mm_multiply_int_matrices`.
#[no_mangle]
pub unsafe extern "C" fn mm_kernel_multiply_float_matrices(
    kernel: *const MMKernel,
    n: i32,
    m: i32,
    l: i32,
    a: *const f32,
    b: *const f32,
    result: *mut f32,
) -> MMStatus {
    kernel_multiply_raw(kernel, n, m, l, a, b, result)
}

/// `mm_multiply_double_matrices` on a kernel from `mm_kernel_create`.
///
/// # Safety
/// `kernel` must be a live kernel; buffers as for `mm_multiply_int_matrices`.
#[no_mangle]
pub unsafe extern "C" fn mm_kernel_multiply_double_matrices(
    kernel: *const MMKernel,
    n: i32,
    m: i32,
    l: i32,
    a: *const f64,
    b: *const f64,
    result: *mut f64,
) -> MMStatus {
    kernel_multiply_raw(kernel, n, m, l, a, b, result)
}

/// Retrieve the last error message.
///
/// Returns a pointer to a C string describing the most recent error on this
/// thread, or null if no error has occurred. The caller must free the
/// returned string with `mm_free_string`.
#[no_mangle]
pub extern "C" fn mm_last_error() -> *const c_char {
    match error::take_last_error() {
        Some(e) => e.into_raw(),
        None => std::ptr::null(),
    }
}

/// Free a string previously returned by `mm_last_error`.
#[no_mangle]
pub unsafe extern "C" fn mm_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;
    use std::ptr;

    fn last_error() -> String {
        let p = mm_last_error();
        assert!(!p.is_null());
        let msg = unsafe { CStr::from_ptr(p) }.to_str().unwrap().to_string();
        unsafe { mm_free_string(p as *mut c_char) };
        msg
    }

    #[test]
    fn test_multiply_all_types() {
        let (a, b) = ([1i32, 2, 3, 4], [5i32, 6, 7, 8]);
        let mut c = [0i32; 4];
        let status =
            unsafe { mm_multiply_int_matrices(2, 2, 2, a.as_ptr(), b.as_ptr(), c.as_mut_ptr()) };
        assert_eq!(status, MMStatus::Ok);
        assert_eq!(c, [19, 22, 43, 50]);

        let (a, b) = ([1.0f32, 2.0, 3.0, 4.0], [5.0f32, 6.0, 7.0, 8.0]);
        let mut c = [0.0f32; 4];
        let status =
            unsafe { mm_multiply_float_matrices(2, 2, 2, a.as_ptr(), b.as_ptr(), c.as_mut_ptr()) };
        assert_eq!(status, MMStatus::Ok);
        assert_eq!(c, [19.0, 22.0, 43.0, 50.0]);

        let (a, b) = ([1.0f64, 2.0, 3.0, 4.0], [5.0f64, 6.0, 7.0, 8.0]);
        let mut c = [0.0f64; 4];
        let status =
            unsafe { mm_multiply_double_matrices(2, 2, 2, a.as_ptr(), b.as_ptr(), c.as_mut_ptr()) };
        assert_eq!(status, MMStatus::Ok);
        assert_eq!(c, [19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_accumulates_into_result() {
        let (a, b) = ([1i32, 1, 1], [2i32, 2, 2]);
        let mut c = [10i32];
        let status =
            unsafe { mm_multiply_int_matrices(1, 3, 1, a.as_ptr(), b.as_ptr(), c.as_mut_ptr()) };
        assert_eq!(status, MMStatus::Ok);
        assert_eq!(c, [16]);
    }

    #[test]
    fn test_negative_dimension() {
        let (a, b) = ([1i32], [1i32]);
        let mut c = [0i32];
        let status =
            unsafe { mm_multiply_int_matrices(-1, 1, 1, a.as_ptr(), b.as_ptr(), c.as_mut_ptr()) };
        assert_eq!(status, MMStatus::ErrorInvalidDimension);
        assert_eq!(last_error(), "invalid dimension n=-1");
        assert_eq!(c, [0]);
    }

    #[test]
    fn test_null_pointer() {
        let b = [1.0f64];
        let mut c = [0.0f64];
        let status =
            unsafe { mm_multiply_double_matrices(1, 1, 1, ptr::null(), b.as_ptr(), c.as_mut_ptr()) };
        assert_eq!(status, MMStatus::ErrorInvalidArgument);
        assert_eq!(last_error(), "a is null");
    }

    #[test]
    fn test_empty_accepts_null() {
        let status = unsafe {
            mm_multiply_float_matrices(0, 3, 0, ptr::null(), ptr::null(), ptr::null_mut())
        };
        assert_eq!(status, MMStatus::Ok);
    }

    #[test]
    fn test_kernel_lifecycle() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut kernel: *mut MMKernel = ptr::null_mut();
        let params = MMKernelParams {
            num_threads: 2,
            min_rows_per_task: 1,
            overwrite_output: true,
        };
        assert_eq!(mm_kernel_create(params, &mut kernel), MMStatus::Ok);
        assert!(!kernel.is_null());

        let (a, b) = ([1i32, 1, 1], [2i32, 2, 2]);
        let mut c = [99i32];
        let status = unsafe {
            mm_kernel_multiply_int_matrices(kernel, 1, 3, 1, a.as_ptr(), b.as_ptr(), c.as_mut_ptr())
        };
        assert_eq!(status, MMStatus::Ok);
        assert_eq!(c, [6]);

        let (a, b) = ([1.0f32, 0.0, 0.0, 1.0], [3.0f32, 4.0, 5.0, 6.0]);
        let mut c = [7.0f32; 4];
        let status = unsafe {
            mm_kernel_multiply_float_matrices(kernel, 2, 2, 2, a.as_ptr(), b.as_ptr(), c.as_mut_ptr())
        };
        assert_eq!(status, MMStatus::Ok);
        assert_eq!(c, b);

        let (a, b) = ([2.0f64], [4.0f64]);
        let mut c = [0.0f64];
        let status = unsafe {
            mm_kernel_multiply_double_matrices(kernel, 1, 1, 1, a.as_ptr(), b.as_ptr(), c.as_mut_ptr())
        };
        assert_eq!(status, MMStatus::Ok);
        assert_eq!(c, [8.0]);

        assert_eq!(unsafe { mm_kernel_destroy(kernel) }, MMStatus::Ok);
    }

    #[test]
    fn test_kernel_create_errors() {
        let status = mm_kernel_create(MMKernelParams::default(), ptr::null_mut());
        assert_eq!(status, MMStatus::ErrorInvalidArgument);
        assert_eq!(last_error(), "kernel_out is null");

        let (a, b) = ([1i32], [1i32]);
        let mut c = [0i32];
        let status = unsafe {
            mm_kernel_multiply_int_matrices(ptr::null(), 1, 1, 1, a.as_ptr(), b.as_ptr(), c.as_mut_ptr())
        };
        assert_eq!(status, MMStatus::ErrorInvalidArgument);
        assert_eq!(last_error(), "kernel is null");
        assert_eq!(unsafe { mm_kernel_destroy(ptr::null_mut()) }, MMStatus::Ok);
    }
}
