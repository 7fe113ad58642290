/*! Unified interface for generating a C boundary from a Rust source tree.
 *
 * Single import for the whole pipeline: scanning marked declarations, rendering the shim and
 * header, and the runtime the generated shim links against. [`compile`] runs everything in one
 * call from a [`ForgeConfig`].
 */

pub use forge_core as core;
pub use forge_emit as emit;
pub use forge_runtime as runtime;
pub use forge_scan as scan;

pub use forge_core::{
    CompilationUnit, ExportedFunction, ExportedStruct, ForgeError, Result, SortedUnit,
};
pub use forge_emit::{Artifacts, ArtifactWriter, ChannelMode, ExportCompiler, ExportConfig};
pub use forge_runtime::ErrorChannel;
pub use forge_scan::Scanner;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SHIM_OUT: &str = "./src/exports.rs";
pub const DEFAULT_HEADER_OUT: &str = "./forgec.h";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    pub source_dir: PathBuf,
    pub shim_out: PathBuf,
    pub header_out: PathBuf,
    #[serde(flatten)]
    pub export: ExportConfig,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            shim_out: PathBuf::from(DEFAULT_SHIM_OUT),
            header_out: PathBuf::from(DEFAULT_HEADER_OUT),
            export: ExportConfig::default(),
        }
    }
}

impl ForgeConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ForgeError::Config(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| ForgeError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
            .map_err(|e| ForgeError::Config(format!("{}: {}", path.display(), e)))
    }
}

/// What a [`compile`] run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileReport {
    pub shim_out: PathBuf,
    pub header_out: PathBuf,
    pub functions: usize,
    pub structs: usize,
    /// False when there was nothing to export and no file was touched.
    pub written: bool,
}

impl fmt::Display for CompileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Generated {}, {} (functions: {}, structs: {})",
            self.shim_out.display(),
            self.header_out.display(),
            self.functions,
            self.structs
        )
    }
}

/// Scans and validates without rendering. Returns the unit in emission order.
pub fn check(config: &ForgeConfig) -> Result<SortedUnit> {
    config.export.validate()?;
    let unit = Scanner::new(&config.source_dir).scan()?;
    Ok(unit.sorted())
}

/// Scan, render and write. Nothing is written unless every declaration is valid.
pub fn compile(config: &ForgeConfig) -> Result<CompileReport> {
    config.export.validate()?;

    let unit = Scanner::new(&config.source_dir).scan()?;
    let mut report = CompileReport {
        shim_out: config.shim_out.clone(),
        header_out: config.header_out.clone(),
        functions: unit.functions().len(),
        structs: unit.structs().len(),
        written: false,
    };

    if unit.is_empty_of_functions() {
        tracing::warn!(
            source = %config.source_dir.display(),
            "No exported functions found, nothing written"
        );
        return Ok(report);
    }

    tracing::info!("Rendering shim and header");
    let artifacts = ExportCompiler::new(config.export.clone()).render(unit)?;
    ArtifactWriter::new(&config.shim_out, &config.header_out).write(&artifacts)?;

    report.written = true;
    Ok(report)
}
