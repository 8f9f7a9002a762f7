use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use serde::de::DeserializeOwned;

/// Serialize `value` to a JSON string and wrap it in a `CString`.
///
/// Returns an error string if serialization fails or if the resulting JSON
/// contains interior null bytes (which cannot be represented in a C string).
pub fn json_to_cstring(value: &impl serde::Serialize) -> Result<CString, String> {
    let json = serde_json::to_string(value)
        .map_err(|e| format!("serialization failed: {}", e))?;

    CString::new(json).map_err(|e| format!("JSON contained a null byte: {}", e))
}

/// Parse `json` into `T`, flattening the serde error into a message.
pub fn deserialize_json<T: DeserializeOwned>(json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| e.to_string())
}

/// Borrow the null-terminated C string at `ptr` and return it as an owned
/// `String`.
///
/// # Safety
///
/// `ptr` must be null or a valid pointer to a null-terminated string that
/// remains alive for the duration of this call.
///
/// Returns an error string if `ptr` is null or if the bytes are not valid
/// UTF-8.
pub unsafe fn cstring_to_str(ptr: *const c_char) -> Result<String, String> {
    if ptr.is_null() {
        return Err("received null pointer".to_string());
    }

    CStr::from_ptr(ptr)
        .to_str()
        .map(|s| s.to_owned())
        .map_err(|e| format!("invalid UTF-8 in C string: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cstring_to_str_null_returns_err() {
        let result = unsafe { cstring_to_str(std::ptr::null()) };
        assert_eq!(result.unwrap_err(), "received null pointer");
    }

    #[test]
    fn cstring_to_str_valid_returns_ok() {
        let s = CString::new("héllo world").unwrap();
        let result = unsafe { cstring_to_str(s.as_ptr()) };
        assert_eq!(result.unwrap(), "héllo world");
    }

    #[test]
    fn cstring_to_str_rejects_invalid_utf8() {
        let s = CString::new(vec![0x66, 0xff, 0x6f]).unwrap();
        let result = unsafe { cstring_to_str(s.as_ptr()) };
        assert!(result.unwrap_err().starts_with("invalid UTF-8"));
    }

    #[test]
    fn deserialize_json_valid() {
        let value: serde_json::Value = deserialize_json(r#"{"key": 42}"#).unwrap();
        assert_eq!(value["key"], 42);
    }

    #[test]
    fn deserialize_json_invalid_returns_err() {
        let result: Result<serde_json::Value, _> = deserialize_json("not json {{{");
        assert!(result.is_err());
    }

    #[test]
    fn json_to_cstring_serializes() {
        let cstr = json_to_cstring(&vec![1, 2, 3]).unwrap();
        assert_eq!(cstr.to_str().unwrap(), "[1,2,3]");
    }
}
