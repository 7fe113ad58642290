/*! Find the declarations a crate wants to expose over the C ABI.
 *
 * Exported items are chosen by a `capi:export` doc comment, and only a narrow set of signatures
 * can cross the boundary safely. The scanner walks a source directory, parses every Rust file,
 * and turns the marked items into a compilation unit, stopping at the first declaration that
 * does not fit.
 */

pub mod declaration;
pub mod type_resolver;
pub mod validate;

pub use declaration::{Declaration, EXPORT_MARKER};
pub use type_resolver::TypeResolver;

use forge_core::{CompilationUnit, ForgeError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const SKIPPED_DIRS: &[&str] = &["target", "vendor"];

pub struct Scanner {
    root: PathBuf,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn scan(&self) -> Result<CompilationUnit> {
        let metadata =
            fs::metadata(&self.root).map_err(|e| ForgeError::scan_io(&self.root, e.to_string()))?;
        if !metadata.is_dir() {
            return Err(ForgeError::scan_io(&self.root, "not a directory"));
        }

        let files = self.source_files()?;
        tracing::info!(root = %self.root.display(), files = files.len(), "scanning sources");

        let mut unit = CompilationUnit::new();
        for path in &files {
            let source = fs::read_to_string(path)
                .map_err(|e| ForgeError::scan_io(path, e.to_string()))?;
            scan_source_into(path, &source, &mut unit)?;
        }

        tracing::info!(
            functions = unit.functions().len(),
            structs = unit.structs().len(),
            "scan complete"
        );
        Ok(unit)
    }

    fn source_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.root.as_path()).to_path_buf();
                ForgeError::scan_io(path, e.to_string())
            })?;
            if entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "rs")
            {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}

/// Parses one file and adds its exported declarations to `unit`.
pub fn scan_source_into(path: &Path, source: &str, unit: &mut CompilationUnit) -> Result<()> {
    let file = syn::parse_file(source).map_err(|e| {
        let start = e.span().start();
        ForgeError::scan_io(
            path,
            format!("line {}, column {}: {}", start.line, start.column + 1, e),
        )
    })?;

    for item in &file.items {
        match Declaration::classify(item) {
            Declaration::Function(function) => {
                let exported = validate::function_from_item(function, path)?;
                tracing::debug!(name = %exported.name, params = exported.params.len(), "exported function");
                unit.add_function(exported)?;
            }
            Declaration::StructType(record) => {
                let exported = validate::struct_from_item(record, path)?;
                tracing::debug!(name = %exported.name, fields = exported.fields.len(), "exported struct");
                unit.add_struct(exported)?;
            }
            Declaration::Ignored => {}
        }
    }
    Ok(())
}

/// Scans a directory of Rust sources for `capi:export` declarations.
pub fn scan_exported(dir: impl AsRef<Path>) -> Result<CompilationUnit> {
    Scanner::new(dir.as_ref()).scan()
}

/// Scans a single in-memory source file.
pub fn scan_source(source: &str) -> Result<CompilationUnit> {
    let mut unit = CompilationUnit::new();
    scan_source_into(Path::new("<memory>"), source, &mut unit)?;
    Ok(unit)
}
