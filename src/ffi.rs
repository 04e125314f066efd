//! FFI bindings for Correlation Lens
//!
//! This module provides C-compatible functions for calling Lens from other languages.
//! String results are allocated here and must be freed by the caller using
//! `lens_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use std::slice;

use crate::correlation::correlation_of;
use crate::pipeline::analyze_json;
use crate::sources::InputFormat;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

fn input_format_from_code(code: i32) -> Option<InputFormat> {
    match code {
        0 => Some(InputFormat::Json),
        1 => Some(InputFormat::Ndjson),
        2 => Some(InputFormat::Columns),
        _ => None,
    }
}

/// Analyze records and return the JSON report.
///
/// `format`: 0 = JSON array, 1 = NDJSON, 2 = column table.
///
/// # Safety
/// - `input` must be a valid null-terminated C string.
/// - `config_json` may be NULL (defaults apply) or a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `lens_free_string`.
/// - Returns NULL on error; call `lens_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn lens_analyze_json(
    input: *const c_char,
    format: i32,
    config_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let input_str = match cstr_to_string(input) {
        Some(s) => s,
        None => {
            set_last_error("Invalid input string pointer");
            return ptr::null_mut();
        }
    };

    let format = match input_format_from_code(format) {
        Some(f) => f,
        None => {
            set_last_error(&format!("Unknown input format code: {format}"));
            return ptr::null_mut();
        }
    };

    let config = if config_json.is_null() {
        None
    } else {
        match cstr_to_string(config_json) {
            Some(s) => Some(s),
            None => {
                set_last_error("Invalid config string");
                return ptr::null_mut();
            }
        }
    };

    match analyze_json(input_str, format, config) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Pearson correlation of two `f64` arrays of length `len`.
///
/// No filtering is applied. Returns 0.0 for fewer than two values, zero
/// variance, or NULL pointers.
///
/// # Safety
/// - `xs` and `ys` must each point to at least `len` readable `f64` values.
#[no_mangle]
pub unsafe extern "C" fn lens_correlation(xs: *const f64, ys: *const f64, len: usize) -> f64 {
    if xs.is_null() || ys.is_null() || len == 0 {
        return 0.0;
    }
    let xs = slice::from_raw_parts(xs, len);
    let ys = slice::from_raw_parts(ys, len);
    correlation_of(xs, ys)
}

/// Free a string returned by Lens.
///
/// # Safety
/// - `ptr` must have been returned by a Lens function, or be NULL.
/// - Must not be called twice on the same pointer.
#[no_mangle]
pub unsafe extern "C" fn lens_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Get the last error message.
///
/// # Safety
/// - The returned pointer is valid until the next Lens call on this thread.
/// - Returns NULL if there was no error.
#[no_mangle]
pub unsafe extern "C" fn lens_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match e.borrow().as_ref() {
        Some(s) => s.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the Lens version string.
///
/// # Safety
/// - Returns a static string; do not free it.
#[no_mangle]
pub unsafe extern "C" fn lens_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffi_analyze_json() {
        let input = CString::new(r#"[{"x": 1, "y": 8}, {"x": 2, "y": 6}, {"x": 3, "y": 4}]"#)
            .unwrap();

        unsafe {
            let result = lens_analyze_json(input.as_ptr(), 0, ptr::null());
            assert!(!result.is_null());

            let report = CStr::from_ptr(result).to_str().unwrap();
            let value: serde_json::Value = serde_json::from_str(report).unwrap();
            assert_eq!(value["correlation"]["bucket"], "strong_negative");

            lens_free_string(result);
        }
    }

    #[test]
    fn test_ffi_with_config() {
        let input = CString::new(r#"{"x": [1, 2, 3], "y": [2, 4, 6]}"#).unwrap();
        let config = CString::new(r#"{"labels": {"x": "price", "y": "rating"}}"#).unwrap();

        unsafe {
            let result = lens_analyze_json(input.as_ptr(), 2, config.as_ptr());
            assert!(!result.is_null());

            let report = CStr::from_ptr(result).to_str().unwrap();
            assert!(report.contains("higher price"));

            lens_free_string(result);
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        let input = CString::new("not valid json").unwrap();

        unsafe {
            let result = lens_analyze_json(input.as_ptr(), 0, ptr::null());
            assert!(result.is_null());

            let error = lens_last_error();
            assert!(!error.is_null());
            let msg = CStr::from_ptr(error).to_str().unwrap();
            assert!(!msg.is_empty());

            let result = lens_analyze_json(input.as_ptr(), 9, ptr::null());
            assert!(result.is_null());
            let msg = CStr::from_ptr(lens_last_error()).to_str().unwrap();
            assert!(msg.contains("format code"));
        }
    }

    #[test]
    fn test_ffi_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];

        unsafe {
            let r = lens_correlation(xs.as_ptr(), ys.as_ptr(), xs.len());
            assert!((r - 1.0).abs() < 1e-9);

            assert_eq!(lens_correlation(ptr::null(), ys.as_ptr(), 4), 0.0);
            assert_eq!(lens_correlation(xs.as_ptr(), ys.as_ptr(), 1), 0.0);
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = lens_version();
            assert!(!version.is_null());
            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert!(!version_str.is_empty());
        }
    }
}
