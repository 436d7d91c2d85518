//! Virtual file system over a flat archive listing.
//!
//! - `VfsIndex`: name-to-entry map built from the archive
//! - `path`: cursor-relative path resolution and directory existence
//! - `listing`: immediate children of a directory prefix

mod index;
mod listing;
mod path;

pub use index::VfsIndex;
pub use listing::{list, Listing};
pub use path::{change_dir, directory_exists, display_arg, resolve_dir, resolve_file, ROOT};
