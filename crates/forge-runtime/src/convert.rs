use std::collections::BTreeMap;
use std::ffi::{c_void, CString};
use std::os::raw::c_char;
use std::ptr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Copies `text` into a caller-owned C string. Interior NUL bytes are dropped.
pub fn c_string(text: &str) -> *const c_char {
    let cleaned: String = text.chars().filter(|c| *c != '\0').collect();
    CString::new(cleaned).map_or(ptr::null(), |s| s.into_raw().cast_const())
}

/// Frees a pointer previously handed out by this runtime.
///
/// # Safety
///
/// `ptr` must be null or a value returned by [`c_string`], [`json_document`] or
/// [`crate::ErrorChannel::last_error_json_ptr`], and must not be released twice.
pub unsafe fn release(ptr: *mut c_void) {
    if ptr.is_null() {
        return;
    }
    drop(CString::from_raw(ptr.cast::<c_char>()));
}

/// Whole seconds since the unix epoch, rounded towards negative infinity.
pub fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
        Err(before) => {
            let before = before.duration();
            let secs = i64::try_from(before.as_secs()).unwrap_or(i64::MAX);
            if before.subsec_nanos() > 0 {
                -secs - 1
            } else {
                -secs
            }
        }
    }
}

/// Encodes a string-keyed map as a JSON object with sorted keys, as a caller-owned C string.
pub fn json_document<'a, I>(entries: I) -> *const c_char
where
    I: IntoIterator<Item = (&'a String, &'a i64)>,
{
    let sorted: BTreeMap<&str, i64> = entries
        .into_iter()
        .map(|(key, value)| (key.as_str(), *value))
        .collect();
    let json = serde_json::to_string(&sorted).unwrap_or_else(|_| "{}".to_string());
    c_string(&json)
}
