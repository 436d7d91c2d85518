//! Owned, append-capable view of a ZIP archive.

use std::io::{Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::backing::Backing;
use super::central_directory;
use crate::error::{VshError, VshResult};

/// Position of a member inside the archive's central directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryHandle(usize);

impl EntryHandle {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// One archive member as seen by the VFS.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Full archive-relative name, e.g. `vfs/folder1/file1.txt`.
    pub name: String,
    pub handle: EntryHandle,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Explicit directory record (name ends with `/`).
    pub is_dir: bool,
    pub compression: CompressionMethod,
}

/// Method to store a new member with, given the method it was read with.
///
/// Methods that can be read but not written (Deflate64, LZMA, AES and
/// anything unknown) are stored as Deflate.
pub fn writable_method(method: CompressionMethod) -> CompressionMethod {
    match method {
        CompressionMethod::Stored
        | CompressionMethod::Deflated
        | CompressionMethod::Bzip2
        | CompressionMethod::Zstd => method,
        _ => CompressionMethod::Deflated,
    }
}

/// ZIP archive plus the storage it lives in.
///
/// The read view is always open between calls. `append` swaps it for a
/// writer, adds one member, and reopens it, so readers never observe a stale
/// central directory.
pub struct ArchiveContainer<B: Backing> {
    backing: B,
    archive: Option<ZipArchive<B::Reader>>,
}

impl<B: Backing> ArchiveContainer<B> {
    /// Open the read view over `backing`.
    ///
    /// Archives that declare the same member name twice are rejected with
    /// `DuplicateEntry`.
    pub fn open(mut backing: B) -> VshResult<Self> {
        let mut reader = backing.open_reader()?;
        central_directory::reject_duplicate_names(&mut reader)?;
        let archive = ZipArchive::new(reader)?;
        tracing::debug!(
            archive = %backing.describe(),
            members = archive.len(),
            "opened archive"
        );
        Ok(Self {
            backing,
            archive: Some(archive),
        })
    }

    fn archive(&mut self) -> VshResult<&mut ZipArchive<B::Reader>> {
        self.archive.as_mut().ok_or(VshError::ArchiveClosed)
    }

    /// Number of members in the archive.
    pub fn len(&self) -> usize {
        self.archive.as_ref().map_or(0, |a| a.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enumerate every member in central-directory order.
    pub fn entries(&mut self) -> VshResult<Vec<Entry>> {
        let archive = self.archive()?;
        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let file = archive.by_index(i)?;
            entries.push(Entry {
                name: file.name().to_string(),
                handle: EntryHandle::new(i),
                size: file.size(),
                is_dir: file.is_dir(),
                compression: file.compression(),
            });
        }
        Ok(entries)
    }

    /// Read the full decompressed content of a member.
    pub fn read(&mut self, entry: &Entry) -> VshResult<Vec<u8>> {
        let archive = self.archive()?;
        let mut file = archive.by_index(entry.handle.index())?;
        // The declared size is not trusted for preallocation.
        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        Ok(content)
    }

    /// Append a new member named `name` and return its entry.
    ///
    /// `compression` is passed through `writable_method` first. The read
    /// view is reopened whether or not the write succeeded; a failed write
    /// reports its own error, not a later reopen failure.
    pub fn append(
        &mut self,
        name: &str,
        data: &[u8],
        compression: CompressionMethod,
    ) -> VshResult<Entry> {
        let compression = writable_method(compression);
        let stale = self
            .archive
            .take()
            .ok_or(VshError::ArchiveClosed)?
            .into_inner();
        let written = self.write_member(stale, name, data, compression);
        let reopened = self
            .backing
            .open_reader()
            .and_then(|reader| ZipArchive::new(reader).map_err(VshError::from));
        match reopened {
            Ok(archive) => self.archive = Some(archive),
            Err(e) => {
                written?;
                return Err(e);
            }
        }
        if let Err(e) = written {
            tracing::warn!(name, error = %e, "append failed");
            return Err(e);
        }

        let archive = self.archive()?;
        let index = archive
            .index_for_name(name)
            .ok_or_else(|| VshError::NoSuchFile(name.to_string()))?;
        tracing::debug!(name, index, bytes = data.len(), "appended archive member");
        Ok(Entry {
            name: name.to_string(),
            handle: EntryHandle::new(index),
            size: data.len() as u64,
            is_dir: false,
            compression,
        })
    }

    fn write_member(
        &mut self,
        stale: B::Reader,
        name: &str,
        data: &[u8],
        compression: CompressionMethod,
    ) -> VshResult<()> {
        let writer = self.backing.open_writer(stale)?;
        let mut zip = ZipWriter::new_append(writer)?;
        let options = SimpleFileOptions::default().compression_method(compression);
        zip.start_file(name, options)?;
        zip.write_all(data)?;
        let writer = zip.finish()?;
        self.backing.close_writer(writer)
    }

    /// Release the read view and hand back the storage.
    pub fn close(mut self) -> B {
        if let Some(archive) = self.archive.take() {
            self.backing.close_reader(archive.into_inner());
        }
        self.backing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::MemoryBacking;
    use std::io::Cursor;

    fn build_zip(members: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in members {
            if name.ends_with('/') {
                zip.add_directory(*name, SimpleFileOptions::default())
                    .unwrap();
            } else {
                zip.start_file(*name, SimpleFileOptions::default()).unwrap();
                zip.write_all(data.as_bytes()).unwrap();
            }
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_entries_and_read() {
        let bytes = build_zip(&[("vfs/a/", ""), ("vfs/a/x.txt", "Hello World\n")]);
        let mut container = ArchiveContainer::open(MemoryBacking::new(bytes)).unwrap();

        let entries = container.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_dir);
        assert_eq!(entries[1].name, "vfs/a/x.txt");
        assert_eq!(entries[1].size, 12);

        let content = container.read(&entries[1]).unwrap();
        assert_eq!(content, b"Hello World\n");
    }

    #[test]
    fn test_append_visible_to_reader() {
        let bytes = build_zip(&[("vfs/a.txt", "one")]);
        let mut container = ArchiveContainer::open(MemoryBacking::new(bytes)).unwrap();

        let entry = container
            .append("vfs/b.txt", b"two", CompressionMethod::Stored)
            .unwrap();
        assert_eq!(entry.handle.index(), 1);
        assert_eq!(container.len(), 2);
        assert_eq!(container.read(&entry).unwrap(), b"two");

        // Existing members survive the append untouched.
        let first = container.entries().unwrap().remove(0);
        assert_eq!(container.read(&first).unwrap(), b"one");
    }

    #[test]
    fn test_close_returns_updated_bytes() {
        let bytes = build_zip(&[("vfs/a.txt", "one")]);
        let mut container = ArchiveContainer::open(MemoryBacking::new(bytes)).unwrap();
        container
            .append("vfs/c.txt", b"three", CompressionMethod::Deflated)
            .unwrap();

        let bytes = container.close().into_bytes();
        let mut reopened = ArchiveContainer::open(MemoryBacking::new(bytes)).unwrap();
        let names: Vec<String> = reopened
            .entries()
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["vfs/a.txt", "vfs/c.txt"]);
    }

    #[test]
    fn test_writable_method() {
        assert_eq!(writable_method(CompressionMethod::Stored), CompressionMethod::Stored);
        assert_eq!(writable_method(CompressionMethod::Deflated), CompressionMethod::Deflated);
        assert_eq!(writable_method(CompressionMethod::Deflate64), CompressionMethod::Deflated);
        assert_eq!(writable_method(CompressionMethod::Lzma), CompressionMethod::Deflated);
        assert_eq!(writable_method(CompressionMethod::Aes), CompressionMethod::Deflated);
    }

    #[test]
    fn test_append_with_read_only_method() {
        let bytes = build_zip(&[("vfs/a.txt", "one")]);
        let mut container = ArchiveContainer::open(MemoryBacking::new(bytes)).unwrap();

        let entry = container
            .append("vfs/b.txt", b"two", CompressionMethod::Deflate64)
            .unwrap();
        assert_eq!(entry.compression, CompressionMethod::Deflated);
        assert_eq!(container.read(&entry).unwrap(), b"two");
    }

    #[test]
    fn test_failed_append_keeps_archive_readable() {
        let bytes = build_zip(&[("vfs/a.txt", "one")]);
        let mut container = ArchiveContainer::open(MemoryBacking::new(bytes.clone())).unwrap();

        // The writer refuses a second member with an existing name.
        let err = container
            .append("vfs/a.txt", b"again", CompressionMethod::Stored)
            .unwrap_err();
        assert!(matches!(err, VshError::Zip(_)), "{err:?}");

        let entries = container.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(container.read(&entries[0]).unwrap(), b"one");

        let entry = container
            .append("vfs/b.txt", b"two", CompressionMethod::Stored)
            .unwrap();
        assert_eq!(container.read(&entry).unwrap(), b"two");
    }

    #[test]
    fn test_open_rejects_duplicate_names() {
        let mut bytes = build_zip(&[("vfs/a.txt", "first\n"), ("vfs/b.txt", "second\n")]);
        // Same-length rename of the second member in its local header and
        // central record.
        let mut at = 0;
        while let Some(pos) = bytes[at..].windows(9).position(|w| w == b"vfs/b.txt") {
            bytes[at + pos..at + pos + 9].copy_from_slice(b"vfs/a.txt");
            at += pos + 9;
        }

        let result = ArchiveContainer::open(MemoryBacking::new(bytes));
        assert!(matches!(result, Err(VshError::DuplicateEntry(n)) if n == "vfs/a.txt"));
    }

    #[test]
    fn test_read_does_not_trust_declared_size() {
        let bytes = build_zip(&[("vfs/a.txt", "Hello World\n")]);
        let mut container = ArchiveContainer::open(MemoryBacking::new(bytes)).unwrap();
        let mut entry = container.entries().unwrap().remove(0);
        entry.size = u64::MAX;
        assert_eq!(container.read(&entry).unwrap(), b"Hello World\n");
    }

    #[test]
    fn test_open_rejects_garbage() {
        let result = ArchiveContainer::open(MemoryBacking::new(b"not a zip".to_vec()));
        assert!(matches!(result, Err(VshError::Zip(_))));
    }
}
