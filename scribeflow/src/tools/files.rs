//! Output directory and file helpers.

use crate::errors::ScribeflowError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// A directory that generated artifacts are written into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    /// Creates a handle; the directory is created lazily on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path a file name resolves to.
    #[must_use]
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Writes a file, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, filename: &str, content: &str) -> Result<PathBuf, ScribeflowError> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(filename);
        fs::write(&path, content)?;
        Ok(path)
    }
}

/// Saves content and returns a confirmation message.
///
/// On failure the error is logged and described in the returned message.
pub fn save_to_file(dir: &OutputDir, filename: &str, content: &str) -> String {
    match dir.save(filename, content) {
        Ok(path) => {
            info!(path = %path.display(), bytes = content.len(), "Saved file");
            format!("Content saved to {}", path.display())
        }
        Err(e) => {
            let path = dir.path_for(filename);
            error!(path = %path.display(), error = %e, "Failed to save file");
            format!("Error saving content to {}: {e}", path.display())
        }
    }
}

/// Reads a file, or describes why it could not be read.
#[must_use]
pub fn read_file(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            format!("File not found: {}", path.display())
        }
        Err(e) => format!("Error reading {}: {e}", path.display()),
    }
}
