//! Virtual File System Shell Core
//!
//! This crate provides a small command shell whose file system is a ZIP
//! archive:
//! - Archive container with in-place append (file or in-memory storage)
//! - VFS index with directories inferred from entry names
//! - Path resolution, directory listing and copy over the index
//! - Command dispatch, startup scripts and an action log
//!
//! # Architecture
//!
//! The shell uses a layered design:
//! - `Backing` trait: where the archive bytes live
//! - `ArchiveContainer`: ZIP read view that survives appends
//! - `VfsIndex`: name-to-entry map; the single source of truth for what exists
//! - `Session`: index + container + current directory
//! - `Shell`: parses lines, records actions, routes to the session

pub mod action_log;
pub mod archive;
pub mod command;
pub mod config;
pub mod error;
pub mod session;
pub mod shell;
pub mod vfs;

pub use action_log::{ActionLog, MemoryActionLog, NullActionLog, XmlActionLog};
pub use archive::{ArchiveContainer, Backing, Entry, EntryHandle, FileBacking, MemoryBacking};
pub use command::{Command, Outcome};
pub use config::Config;
pub use error::{VshError, VshResult};
pub use session::{Identity, Session};
pub use shell::Shell;
pub use vfs::{Listing, VfsIndex, ROOT};
