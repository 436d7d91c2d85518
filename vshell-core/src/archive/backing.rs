//! Backing trait - storage behind an archive container.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};

use crate::error::VshResult;

/// Storage that holds the raw bytes of a ZIP archive.
///
/// A container keeps exactly one handle open at a time: a reader while the
/// archive is being queried, or a writer for the duration of one append.
/// The stale reader is handed back before a writer is opened, and the writer
/// is handed back before the next reader is opened.
pub trait Backing {
    /// Handle used for the read view.
    type Reader: Read + Seek;

    /// Handle used while appending members.
    type Writer: Read + Write + Seek;

    /// Open a fresh read handle positioned anywhere (ZIP readers seek).
    fn open_reader(&mut self) -> VshResult<Self::Reader>;

    /// Retire `stale` and open a handle that supports appending.
    fn open_writer(&mut self, stale: Self::Reader) -> VshResult<Self::Writer>;

    /// Flush and release a writer returned by `open_writer`.
    fn close_writer(&mut self, writer: Self::Writer) -> VshResult<()>;

    /// Release a reader for good.
    fn close_reader(&mut self, reader: Self::Reader) {
        drop(reader);
    }

    /// Human-readable location, used in diagnostics.
    fn describe(&self) -> String;
}

/// Archive stored in a file on disk.
#[derive(Debug, Clone)]
pub struct FileBacking {
    path: PathBuf,
}

impl FileBacking {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Backing for FileBacking {
    type Reader = BufReader<File>;
    type Writer = File;

    fn open_reader(&mut self) -> VshResult<Self::Reader> {
        Ok(BufReader::new(File::open(&self.path)?))
    }

    fn open_writer(&mut self, stale: Self::Reader) -> VshResult<Self::Writer> {
        drop(stale);
        let file = OpenOptions::new().read(true).write(true).open(&self.path)?;
        Ok(file)
    }

    fn close_writer(&mut self, mut writer: Self::Writer) -> VshResult<()> {
        writer.flush()?;
        writer.sync_all()?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Archive held in memory.
///
/// `bytes` is the committed archive. Readers and writers work on their own
/// copy; only `close_writer` replaces the committed bytes, so a writer that
/// is dropped after a failed append leaves the archive as it was.
#[derive(Debug, Clone, Default)]
pub struct MemoryBacking {
    bytes: Vec<u8>,
}

impl MemoryBacking {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Consume the backing and return the archive bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl Backing for MemoryBacking {
    type Reader = Cursor<Vec<u8>>;
    type Writer = Cursor<Vec<u8>>;

    fn open_reader(&mut self) -> VshResult<Self::Reader> {
        Ok(Cursor::new(self.bytes.clone()))
    }

    fn open_writer(&mut self, stale: Self::Reader) -> VshResult<Self::Writer> {
        // The stale reader already holds a copy of the committed bytes.
        Ok(Cursor::new(stale.into_inner()))
    }

    fn close_writer(&mut self, writer: Self::Writer) -> VshResult<()> {
        self.bytes = writer.into_inner();
        Ok(())
    }

    fn describe(&self) -> String {
        format!("<memory, {} bytes>", self.bytes.len())
    }
}
