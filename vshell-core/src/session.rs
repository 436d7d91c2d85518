//! Shell session - one open archive, its index, and the current directory.
//!
//! A `Session` is the explicit context every VFS operation runs against.
//! Several sessions over different archives can live side by side.

use std::path::Path;

use crate::archive::{ArchiveContainer, Backing, FileBacking, MemoryBacking};
use crate::error::{VshError, VshResult};
use crate::vfs::{self, Listing, VfsIndex, ROOT};

/// Who the prompt says is logged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user: String,
    pub host: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            user: "user".to_string(),
            host: "localhost".to_string(),
        }
    }
}

/// Open archive plus shell state.
pub struct Session<B: Backing> {
    container: ArchiveContainer<B>,
    index: VfsIndex,
    current_dir: String,
    identity: Identity,
}

impl Session<FileBacking> {
    /// Open a session over an archive file on disk.
    pub fn open_path(path: impl AsRef<Path>, identity: Identity) -> VshResult<Self> {
        Self::open(FileBacking::new(path.as_ref()), identity)
    }
}

impl Session<MemoryBacking> {
    /// Open a session over an in-memory archive.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>, identity: Identity) -> VshResult<Self> {
        Self::open(MemoryBacking::new(bytes), identity)
    }
}

impl<B: Backing> Session<B> {
    /// Open the archive and index its entries. The cursor starts at the root.
    pub fn open(backing: B, identity: Identity) -> VshResult<Self> {
        let mut container = ArchiveContainer::open(backing)?;
        let index = VfsIndex::build(container.entries()?)?;
        Ok(Self {
            container,
            index,
            current_dir: ROOT.to_string(),
            identity,
        })
    }

    pub fn current_dir(&self) -> &str {
        &self.current_dir
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn index(&self) -> &VfsIndex {
        &self.index
    }

    /// Prompt string: `user@host:vfs/dir/$ `.
    pub fn prompt(&self) -> String {
        format!(
            "{}@{}:{}$ ",
            self.identity.user, self.identity.host, self.current_dir
        )
    }

    /// Change the current directory. On failure the cursor stays put.
    pub fn cd(&mut self, arg: &str) -> VshResult<()> {
        let target = vfs::change_dir(&self.index, &self.current_dir, arg)?;
        tracing::debug!(from = %self.current_dir, to = %target, "cd");
        self.current_dir = target;
        Ok(())
    }

    /// List the current directory.
    pub fn ls(&self) -> Listing {
        vfs::list(&self.index, &self.current_dir)
    }

    /// Raw content of a file.
    pub fn read_bytes(&mut self, arg: &str) -> VshResult<Vec<u8>> {
        let path = vfs::resolve_file(&self.current_dir, arg);
        let entry = self
            .index
            .file(&path)
            .ok_or_else(|| VshError::NoSuchFile(arg.to_string()))?;
        self.container.read(entry)
    }

    /// Content of a file decoded as UTF-8 text.
    pub fn cat(&mut self, arg: &str) -> VshResult<String> {
        let bytes = self.read_bytes(arg)?;
        String::from_utf8(bytes).map_err(|_| VshError::NotText(arg.to_string()))
    }

    /// Copy `src` to a new entry `dst`, both relative to the cursor.
    ///
    /// The new member is appended to the archive and indexed; the archive
    /// and index are untouched when validation fails. The copy keeps the
    /// source's compression when the writer supports it, Deflate otherwise.
    pub fn cp(&mut self, src: &str, dst: &str) -> VshResult<String> {
        let source_path = vfs::resolve_file(&self.current_dir, src);
        let dest_path = vfs::resolve_file(&self.current_dir, dst);

        let source = self
            .index
            .file(&source_path)
            .ok_or_else(|| VshError::NoSuchFile(src.to_string()))?
            .clone();
        self.check_destination(&dest_path, dst)?;

        let data = self.container.read(&source)?;
        let entry = self
            .container
            .append(&dest_path, &data, source.compression)?;
        self.index.insert(entry)?;

        tracing::debug!(from = %source_path, to = %dest_path, bytes = data.len(), "copied entry");
        Ok(format!("Copied {} to {}", src, dst))
    }

    /// Reject destinations that would break the file/directory split.
    fn check_destination(&self, dest_path: &str, dst: &str) -> VshResult<()> {
        if self.index.contains(dest_path)
            || dest_path == ROOT
            || vfs::directory_exists(&self.index, &format!("{}/", dest_path))
        {
            tracing::warn!(dest = %dest_path, "copy destination exists");
            return Err(VshError::DestinationExists(dst.to_string()));
        }

        // No ancestor of the destination may be a regular file.
        let mut ancestor = dest_path;
        while let Some((parent, _)) = ancestor.rsplit_once('/') {
            if self.index.file(parent).is_some() {
                tracing::warn!(dest = %dest_path, parent, "copy destination under a file");
                return Err(VshError::NotADirectory(dst.to_string()));
            }
            ancestor = parent;
        }
        Ok(())
    }

    /// Close the archive and return its storage.
    pub fn close(self) -> B {
        self.container.close()
    }
}
