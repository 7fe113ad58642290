//! Private copy of the `forge-runtime` helpers, pasted into shims built with
//! [`ChannelMode::Inline`](crate::ChannelMode::Inline). Keep in step with that crate.

pub const INLINE_IMPORTS: &str = r#"use std::any::Any;
use std::collections::BTreeMap;
use std::ffi::CString;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};"#;

pub const INLINE_RUNTIME: &str = r#"struct ErrorChannel {
    slot: Mutex<Option<String>>,
}

impl ErrorChannel {
    const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    fn record<T>(&self, outcome: &Outcome<T>) {
        *self.lock() = match outcome {
            Outcome::Succeeded(_) => None,
            Outcome::Failed(message) => Some(message.clone()),
        };
    }

    fn last_error_json_ptr(&self) -> *const c_char {
        let json = match self.lock().as_deref() {
            None => "{}".to_string(),
            Some(message) => serde_json::json!({ "error": message }).to_string(),
        };
        c_string(&json)
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

enum Outcome<T> {
    Succeeded(T),
    Failed(String),
}

fn guarded_call<T, E, F>(f: F) -> Outcome<T>
where
    E: std::fmt::Display,
    F: FnOnce() -> Result<T, E>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Outcome::Succeeded(value),
        Ok(Err(err)) => Outcome::Failed(err.to_string()),
        Err(payload) => Outcome::Failed(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(err) = payload.downcast_ref::<Box<dyn std::error::Error + Send + Sync>>() {
        return err.to_string();
    }
    if let Some(err) = payload.downcast_ref::<Box<dyn std::error::Error + Send>>() {
        return err.to_string();
    }
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        return (*text).to_string();
    }
    if let Some(text) = payload.downcast_ref::<String>() {
        return text.clone();
    }
    "panic".to_string()
}

fn c_string(text: &str) -> *const c_char {
    let cleaned: String = text.chars().filter(|c| *c != '\0').collect();
    CString::new(cleaned).map_or(std::ptr::null(), |s| s.into_raw().cast_const())
}

unsafe fn release(ptr: *mut c_void) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr.cast::<c_char>()) });
    }
}

fn unix_seconds(time: SystemTime) -> i64 {
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

fn json_document<'a, I>(entries: I) -> *const c_char
where
    I: IntoIterator<Item = (&'a String, &'a i64)>,
{
    let sorted: BTreeMap<&str, i64> = entries
        .into_iter()
        .map(|(key, value)| (key.as_str(), *value))
        .collect();
    let json = serde_json::to_string(&sorted).unwrap_or_else(|_| "{}".to_string());
    c_string(&json)
}"#;
