use std::cell::RefCell;
use std::ffi::CString;

use log::debug;
use mm_kernel::KernelError;

use crate::types::MMStatus;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Store an error message for later retrieval via `mm_last_error`.
pub fn set_last_error(msg: String) {
    debug!("ffi error: {}", msg);
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Take the last error message, leaving `None` in its place.
pub fn take_last_error() -> Option<CString> {
    LAST_ERROR.with(|e| e.borrow_mut().take())
}

/// Record a kernel error and return the matching status.
pub fn report(e: KernelError) -> MMStatus {
    let status = MMStatus::from(&e);
    set_last_error(e.to_string());
    status
}
