use crate::compiler::Artifacts;
use forge_core::{ForgeError, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes the shim and the header together: either both land or neither is replaced.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    shim_path: PathBuf,
    header_path: PathBuf,
}

impl ArtifactWriter {
    pub fn new(shim_path: impl Into<PathBuf>, header_path: impl Into<PathBuf>) -> Self {
        Self {
            shim_path: shim_path.into(),
            header_path: header_path.into(),
        }
    }

    pub fn shim_path(&self) -> &Path {
        &self.shim_path
    }

    pub fn header_path(&self) -> &Path {
        &self.header_path
    }

    pub fn write(&self, artifacts: &Artifacts) -> Result<()> {
        if normalize(&self.shim_path) == normalize(&self.header_path) {
            return Err(ForgeError::Config(format!(
                "shim and header would both be written to {}",
                self.shim_path.display()
            )));
        }

        let shim = stage(&self.shim_path, &artifacts.shim)?;
        let header = stage(&self.header_path, &artifacts.header)?;
        let previous_shim = previous_contents(&self.shim_path)?;
        previous_contents(&self.header_path)?;

        // A failed persist drops the remaining temporary, which deletes it.
        shim.persist(&self.shim_path).map_err(|e| ForgeError::Write {
            path: self.shim_path.clone(),
            source: e.error,
        })?;
        if let Err(e) = header.persist(&self.header_path) {
            if let Err(restore) = restore(&self.shim_path, previous_shim) {
                tracing::warn!(
                    shim = %self.shim_path.display(),
                    error = %restore,
                    "Could not restore the previous shim"
                );
            }
            return Err(ForgeError::Write {
                path: self.header_path.clone(),
                source: e.error,
            });
        }

        tracing::info!(
            shim = %self.shim_path.display(),
            header = %self.header_path.display(),
            "Wrote export artifacts"
        );
        Ok(())
    }
}

/// What `target` held before this write; `None` if it did not exist.
fn previous_contents(target: &Path) -> Result<Option<Vec<u8>>> {
    let write_error = |source: io::Error| ForgeError::Write {
        path: target.to_path_buf(),
        source,
    };
    match fs::symlink_metadata(target) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(write_error(e)),
        Ok(metadata) if metadata.is_dir() => Err(write_error(io::Error::new(
            io::ErrorKind::Other,
            "target is a directory",
        ))),
        Ok(_) => fs::read(target).map(Some).map_err(write_error),
    }
}

fn restore(target: &Path, previous: Option<Vec<u8>>) -> io::Result<()> {
    match previous {
        Some(contents) => fs::write(target, contents),
        None => fs::remove_file(target),
    }
}

/// Lexical form used to compare targets: absolute, without `.` and with `..` applied.
fn normalize(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn stage(target: &Path, contents: &str) -> Result<NamedTempFile> {
    let write_error = |source: io::Error| ForgeError::Write {
        path: target.to_path_buf(),
        source,
    };

    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(write_error)?;

    let mut file = NamedTempFile::new_in(parent).map_err(write_error)?;
    file.write_all(contents.as_bytes()).map_err(write_error)?;
    file.flush().map_err(write_error)?;
    Ok(file)
}
