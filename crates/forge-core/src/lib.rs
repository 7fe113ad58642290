/*! Core types for describing a C export boundary.
 *
 * A boundary is described twice, once as Rust wrappers and once as a C header, and the two
 * descriptions have to agree on every symbol, parameter and field. This crate holds the single
 * intermediate representation both are rendered from, the type mapping that decides how each
 * source type crosses the boundary, and the error taxonomy shared by the whole pipeline.
 */

pub mod function;
pub mod names;
pub mod record;
pub mod types;
pub mod unit;

pub use function::{ExportedFunction, Param, ReturnShape};
pub use names::is_c_reserved;
pub use record::{ExportedStruct, Field};
pub use types::{AbiType, MapKind, ScalarType, SourceType, TimestampKind, TypeMapper};
pub use unit::{CompilationUnit, SortedUnit};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("Scan error at {}: {message}", path.display())]
    ScanIo { path: PathBuf, message: String },
    #[error("{decl}: {reason}")]
    InvalidSignature { decl: String, reason: String },
    #[error("{decl}: unsupported type: {ty}")]
    UnsupportedType { decl: String, ty: String },
    #[error("Generated {artifact} is malformed: {message}")]
    Format { artifact: String, message: String },
    #[error("Write error at {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ForgeError {
    pub fn invalid_signature(decl: impl Into<String>, reason: impl Into<String>) -> Self {
        ForgeError::InvalidSignature {
            decl: decl.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported_type(decl: impl Into<String>, ty: impl Into<String>) -> Self {
        ForgeError::UnsupportedType {
            decl: decl.into(),
            ty: ty.into(),
        }
    }

    pub fn scan_io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ForgeError::ScanIo {
            path: path.into(),
            message: message.into(),
        }
    }

    /// True for errors raised while validating declarations, as opposed to I/O failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ForgeError::InvalidSignature { .. } | ForgeError::UnsupportedType { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;

#[cfg(test)]
mod tests;
