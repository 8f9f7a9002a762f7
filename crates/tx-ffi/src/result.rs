use std::ffi::CString;
use std::os::raw::c_char;

/// C-compatible result envelope for all `txcmp_*` calls.
///
/// Both `data` and `error` are heap-allocated C strings owned by this struct.
/// The caller must free the entire envelope (including the inner strings) by
/// passing the pointer to `txcmp_free`.
#[repr(C)]
pub struct TxResult {
    /// `true` on success, `false` on failure.
    pub ok: bool,
    /// JSON payload on success; null pointer on failure.
    pub data: *mut c_char,
    /// Error message on failure; null pointer on success.
    pub error: *mut c_char,
}

impl TxResult {
    /// Allocate a successful result that takes ownership of `data`.
    ///
    /// Ownership of the returned pointer passes to the caller, who must
    /// eventually call `txcmp_free`.
    pub fn success(data: CString) -> *mut Self {
        Box::into_raw(Box::new(TxResult {
            ok: true,
            data: data.into_raw(),
            error: std::ptr::null_mut(),
        }))
    }

    /// Allocate a failure result whose error field holds `message`.
    ///
    /// Interior NUL bytes cannot cross the C boundary and are replaced.
    pub fn failure(message: &str) -> *mut Self {
        let error = CString::new(message.replace('\0', "\u{FFFD}")).unwrap_or_default();

        Box::into_raw(Box::new(TxResult {
            ok: false,
            data: std::ptr::null_mut(),
            error: error.into_raw(),
        }))
    }

    /// Reclaim ownership of the inner C strings and the struct itself.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a pointer produced by `TxResult::success` or
    /// `TxResult::failure` that has not been freed already.
    pub unsafe fn free(ptr: *mut Self) {
        if ptr.is_null() {
            return;
        }

        let result = Box::from_raw(ptr);

        if !result.data.is_null() {
            drop(CString::from_raw(result.data));
        }
        if !result.error.is_null() {
            drop(CString::from_raw(result.error));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn success_owns_data() {
        let data = CString::new(r#"{"ok":true}"#).unwrap();
        unsafe {
            let ptr = TxResult::success(data);
            assert!((*ptr).ok);
            assert!((*ptr).error.is_null());
            assert_eq!(CStr::from_ptr((*ptr).data).to_str().unwrap(), r#"{"ok":true}"#);
            TxResult::free(ptr);
        }
    }

    #[test]
    fn failure_replaces_interior_nul() {
        unsafe {
            let ptr = TxResult::failure("bad\0input");
            assert!(!(*ptr).ok);
            assert!((*ptr).data.is_null());
            assert_eq!(
                CStr::from_ptr((*ptr).error).to_str().unwrap(),
                "bad\u{FFFD}input"
            );
            TxResult::free(ptr);
        }
    }

    #[test]
    fn free_null_is_noop() {
        unsafe { TxResult::free(std::ptr::null_mut()) };
    }
}
