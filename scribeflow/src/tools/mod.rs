//! File tools used by the generators.
//!
//! Writes during a run are best-effort: [`save_to_file`] logs failures and
//! returns a message instead of an error, so a full disk never stops a
//! pipeline. Callers that need the error use [`OutputDir::save`] directly.

mod files;

pub use files::{read_file, save_to_file, OutputDir};
