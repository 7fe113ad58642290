use crate::convert::c_string;
use crate::guard::Outcome;
use std::os::raw::c_char;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Single-slot store for the most recent failure of an export surface.
///
/// Every call overwrites the slot: a failure stores its message, a success clears it. Callers
/// racing on the same channel see whichever write happened last, so the status code returned
/// by a call is the authoritative result and the channel is advisory.
#[derive(Debug, Default)]
pub struct ErrorChannel {
    slot: Mutex<Option<String>>,
}

impl ErrorChannel {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    pub fn set(&self, message: impl Into<String>) {
        *self.lock() = Some(message.into());
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    pub fn record<T>(&self, outcome: &Outcome<T>) {
        match outcome {
            Outcome::Succeeded(_) => self.clear(),
            Outcome::Failed(message) => self.set(message.as_str()),
        }
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().clone()
    }

    /// `{}` when the last call succeeded, `{"error":"<message>"}` otherwise.
    pub fn last_error_json(&self) -> String {
        match self.lock().as_deref() {
            None => "{}".to_string(),
            Some(message) => serde_json::json!({ "error": message }).to_string(),
        }
    }

    /// [`Self::last_error_json`] as a C string the caller releases with [`crate::release`].
    pub fn last_error_json_ptr(&self) -> *const c_char {
        c_string(&self.last_error_json())
    }

    // A panic while the lock is held cannot leave the slot half-written.
    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
