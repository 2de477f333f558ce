//! Blog series roadmaps and their markdown form.
//!
//! The markdown document is the one durable interface between planning and
//! writing: it is saved after planning and can be loaded to skip it.

mod codec;
mod store;

pub use codec::{decode, encode, Roadmap, RoadmapEntry, ROADMAP_HEADER};
pub use store::{load_roadmap, post_filename, save_roadmap, ROADMAP_FILENAME};
