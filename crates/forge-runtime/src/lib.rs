/*! Runtime linked into every generated export surface.
 *
 * A panic that unwinds into C is undefined behaviour, and a C caller has no way to receive a Rust
 * error value. Generated wrappers therefore run each call through [`guarded_call`], turn the
 * outcome into a status code, and leave the message in an [`ErrorChannel`] the caller can read
 * back as JSON.
 *
 * Unwinding is only intercepted when the library is built with `panic = "unwind"` (the default).
 */

pub mod channel;
pub mod convert;
pub mod guard;

pub use channel::ErrorChannel;
pub use convert::{c_string, json_document, release, unix_seconds};
pub use guard::{guarded_call, panic_message, Outcome};
