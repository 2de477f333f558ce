//! Roadmap and post files on disk.

use super::{decode, Roadmap};
use crate::errors::ScribeflowError;
use crate::tools::OutputDir;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name the roadmap is saved under.
pub const ROADMAP_FILENAME: &str = "Blog_Series_Roadmap.md";

/// Writes the roadmap document into the output directory.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_roadmap(dir: &OutputDir, roadmap: &Roadmap) -> Result<PathBuf, ScribeflowError> {
    let path = dir.save(ROADMAP_FILENAME, &roadmap.to_markdown())?;
    info!(path = %path.display(), posts = roadmap.len(), "Saved roadmap");
    Ok(path)
}

/// Reads and parses a roadmap document.
///
/// # Errors
///
/// Returns an error if the file cannot be read. Parsing itself never fails.
pub fn load_roadmap(path: impl AsRef<Path>) -> Result<Roadmap, ScribeflowError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let roadmap = decode(&text);
    info!(path = %path.display(), posts = roadmap.len(), "Loaded roadmap");
    Ok(roadmap)
}

/// File name for the post at zero-based `index`.
///
/// Spaces become underscores; path separators are replaced too so the file
/// always lands inside the output directory.
#[must_use]
pub fn post_filename(index: usize, title: &str) -> String {
    let slug: String = title
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    format!("Blog_Post_{}_{slug}.md", index + 1)
}
