/*! Rendering of export units into the two artifacts of a C boundary.
 *
 * [`ShimEmitter`] produces the Rust file holding the `extern "C"` wrappers and the
 * `#[repr(C)]` mirrors, [`HeaderEmitter`] produces the C header declaring the same symbols.
 * [`ExportCompiler`] drives both from a single sorted unit and [`ArtifactWriter`] puts the
 * results on disk.
 */

pub mod compiler;
pub mod config;
pub mod emitter;
pub mod header;
pub mod inline_runtime;
pub mod shim;
pub mod writer;

pub use compiler::{Artifacts, ExportCompiler};
pub use config::{ChannelMode, ExportConfig, IndentStyle, DEFAULT_MODULE, DEFAULT_PREFIX};
pub use emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
pub use header::HeaderEmitter;
pub use shim::ShimEmitter;
pub use writer::ArtifactWriter;

pub const BANNER: &str = "Code generated by forge; DO NOT EDIT.";
pub const FREE_SYMBOL: &str = "capi_free";
pub const LAST_ERROR_SYMBOL: &str = "capi_last_error_json";
