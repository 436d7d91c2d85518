//! Directory listing derived from entry names.

use std::collections::BTreeSet;
use std::fmt;

use super::index::VfsIndex;

/// Result of listing a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// Nothing lives under the directory.
    Empty,
    /// Immediate children, sorted and deduplicated.
    Names(Vec<String>),
}

impl Listing {
    pub fn names(&self) -> &[String] {
        match self {
            Listing::Empty => &[],
            Listing::Names(names) => names,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Listing::Empty)
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listing::Empty => f.write_str("Empty directory"),
            Listing::Names(names) => f.write_str(&names.join("\n")),
        }
    }
}

/// List the immediate children of `current_dir` (a `/`-terminated prefix).
///
/// A name directly under the directory is a file child unless it starts
/// with `.`; a deeper name contributes only its first segment, so each
/// sub-directory appears once however many entries it holds.
pub fn list(index: &VfsIndex, current_dir: &str) -> Listing {
    let mut children = BTreeSet::new();

    for name in index.with_prefix(current_dir) {
        if name == current_dir {
            continue;
        }
        let relative = name[current_dir.len()..].trim_matches('/');
        match relative.split_once('/') {
            Some((first, _)) => {
                children.insert(first.to_string());
            }
            None if !relative.is_empty() && !relative.starts_with('.') => {
                children.insert(relative.to_string());
            }
            None => {}
        }
    }

    if children.is_empty() {
        Listing::Empty
    } else {
        Listing::Names(children.into_iter().collect())
    }
}
