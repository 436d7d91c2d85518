//! Path resolution against the session cursor.
//!
//! Paths are archive-relative strings under the root marker [`ROOT`]. A
//! directory path always ends with `/`; a file path never does.

use super::index::VfsIndex;
use crate::error::{VshError, VshResult};

/// Root marker: every VFS name lives under this prefix.
pub const ROOT: &str = "vfs/";

/// Join `current_dir` and `arg` into normalized path segments below the root.
///
/// - empty segments and `.` are dropped
/// - `..` pops one segment and never climbs above the root
/// - an argument starting with `/` starts from the root instead of the cursor
fn segments<'a>(current_dir: &'a str, arg: &'a str) -> Vec<&'a str> {
    let base = if arg.starts_with('/') {
        ""
    } else {
        current_dir.strip_prefix(ROOT).unwrap_or(current_dir)
    };

    let mut parts = Vec::new();
    for seg in base.split('/').chain(arg.split('/')) {
        match seg {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    parts
}

/// Resolve `arg` as a directory: canonical, `/`-terminated prefix.
///
/// # Examples
/// ```
/// use vshell_core::vfs::resolve_dir;
/// assert_eq!(resolve_dir("vfs/", "folder1"), "vfs/folder1/");
/// assert_eq!(resolve_dir("vfs/folder1/", "/"), "vfs/");
/// assert_eq!(resolve_dir("vfs/folder1/", "../folder2//"), "vfs/folder2/");
/// ```
pub fn resolve_dir(current_dir: &str, arg: &str) -> String {
    let parts = segments(current_dir, arg);
    if parts.is_empty() {
        ROOT.to_string()
    } else {
        format!("{}{}/", ROOT, parts.join("/"))
    }
}

/// Resolve `arg` as a file: the literal candidate name to look up.
///
/// # Examples
/// ```
/// use vshell_core::vfs::resolve_file;
/// assert_eq!(resolve_file("vfs/", "folder1/file1.txt"), "vfs/folder1/file1.txt");
/// assert_eq!(resolve_file("vfs/folder1/", "./file1.txt"), "vfs/folder1/file1.txt");
/// ```
pub fn resolve_file(current_dir: &str, arg: &str) -> String {
    let parts = segments(current_dir, arg);
    format!("{}{}", ROOT, parts.join("/"))
}

/// A directory exists when it is the root or some name lies beneath it.
pub fn directory_exists(index: &VfsIndex, prefix: &str) -> bool {
    prefix == ROOT || index.has_prefix(prefix)
}

/// Argument as shown in messages: surrounding separators stripped.
pub fn display_arg(arg: &str) -> &str {
    arg.trim_matches('/')
}

/// Resolve a `cd` target, failing if nothing lives under it.
pub fn change_dir(index: &VfsIndex, current_dir: &str, arg: &str) -> VshResult<String> {
    let target = resolve_dir(current_dir, arg);
    if directory_exists(index, &target) {
        Ok(target)
    } else {
        Err(VshError::NoSuchDirectory(display_arg(arg).to_string()))
    }
}
