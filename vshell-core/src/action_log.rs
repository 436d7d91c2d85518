//! Action log - append-only record of executed commands.
//!
//! The `ActionLog` trait lets the shell record actions the same way whether
//! they go to an XML file or stay in memory for tests.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::VshResult;

/// Sink for executed-command descriptions.
pub trait ActionLog {
    /// Record one action.
    fn record(&mut self, action: &str) -> VshResult<()>;
}

/// Appends one `<log>` element per action to a file.
///
/// ```text
/// <log><action>cd folder1<timestamp>2024-05-01 12:00:00</timestamp></action></log>
/// ```
pub struct XmlActionLog {
    path: PathBuf,
    file: File,
}

impl XmlActionLog {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> VshResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ActionLog for XmlActionLog {
    fn record(&mut self, action: &str) -> VshResult<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        write!(
            self.file,
            "<log><action>{}<timestamp>{}</timestamp></action></log>",
            escape_xml(action),
            timestamp
        )?;
        self.file.flush()?;
        Ok(())
    }
}

/// Keeps actions in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryActionLog {
    actions: Vec<String>,
}

impl MemoryActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }
}

impl ActionLog for MemoryActionLog {
    fn record(&mut self, action: &str) -> VshResult<()> {
        self.actions.push(action.to_string());
        Ok(())
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullActionLog;

impl ActionLog for NullActionLog {
    fn record(&mut self, _action: &str) -> VshResult<()> {
        Ok(())
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
