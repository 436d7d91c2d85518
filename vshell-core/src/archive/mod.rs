//! Archive access for the virtual file system.
//!
//! - `Backing`: where the archive bytes live (`FileBacking`, `MemoryBacking`)
//! - `ArchiveContainer`: ZIP read view with in-place append
//! - `central_directory`: raw record scan used to reject duplicate names

mod backing;
mod central_directory;
mod container;

pub use backing::{Backing, FileBacking, MemoryBacking};
pub use container::{writable_method, ArchiveContainer, Entry, EntryHandle};
