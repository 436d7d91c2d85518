//! Raw central-directory scan.
//!
//! `ZipArchive` keys its members by name, so a second record with the same
//! name silently replaces the first. Walking the central directory directly
//! is the only way to see every record the archive declares.

use std::collections::HashSet;
use std::io::{self, Read, Seek, SeekFrom};

use crate::error::{VshError, VshResult};

const EOCD_SIGNATURE: [u8; 4] = *b"PK\x05\x06";
const CENTRAL_SIGNATURE: [u8; 4] = *b"PK\x01\x02";
const EOCD_LEN: usize = 22;
const CENTRAL_HEADER_LEN: usize = 46;
const MAX_COMMENT_LEN: usize = u16::MAX as usize;

fn u16_at(buf: &[u8], at: usize) -> usize {
    u16::from_le_bytes([buf[at], buf[at + 1]]) as usize
}

fn u32_at(buf: &[u8], at: usize) -> u64 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]]) as u64
}

/// Names of every central-directory record, in record order.
///
/// Returns `None` when the archive is not laid out as a plain ZIP (no end
/// record, zip64 markers, leading data before the first member). Those
/// archives are left to `ZipArchive` to accept or reject.
pub(crate) fn record_names<R: Read + Seek>(reader: &mut R) -> io::Result<Option<Vec<Vec<u8>>>> {
    let len = reader.seek(SeekFrom::End(0))?;
    let tail_len = len.min((EOCD_LEN + MAX_COMMENT_LEN) as u64);
    reader.seek(SeekFrom::Start(len - tail_len))?;
    let mut tail = vec![0; tail_len as usize];
    reader.read_exact(&mut tail)?;

    // The end record is the last signature whose comment length reaches
    // exactly to the end of the file.
    let eocd = (0..tail.len().saturating_sub(EOCD_LEN - 1))
        .rev()
        .map(|at| &tail[at..])
        .find(|rec| rec.starts_with(&EOCD_SIGNATURE) && rec.len() == EOCD_LEN + u16_at(rec, 20));
    let Some(eocd) = eocd else {
        return Ok(None);
    };

    let count = u16_at(eocd, 10);
    let cd_size = u32_at(eocd, 12);
    let cd_offset = u32_at(eocd, 16);
    if count == u16::MAX as usize || cd_offset == u32::MAX as u64 || cd_offset + cd_size > len {
        return Ok(None);
    }

    reader.seek(SeekFrom::Start(cd_offset))?;
    let mut cd = vec![0; cd_size as usize];
    reader.read_exact(&mut cd)?;

    let mut names = Vec::with_capacity(count);
    let mut at = 0;
    for _ in 0..count {
        let Some(header) = cd.get(at..at + CENTRAL_HEADER_LEN) else {
            return Ok(None);
        };
        if !header.starts_with(&CENTRAL_SIGNATURE) {
            return Ok(None);
        }
        let name_len = u16_at(header, 28);
        let extra_len = u16_at(header, 30);
        let comment_len = u16_at(header, 32);

        let name_start = at + CENTRAL_HEADER_LEN;
        let Some(name) = cd.get(name_start..name_start + name_len) else {
            return Ok(None);
        };
        names.push(name.to_vec());
        at = name_start + name_len + extra_len + comment_len;
    }
    Ok(Some(names))
}

/// Fail with `DuplicateEntry` if two central-directory records share a name.
pub(crate) fn reject_duplicate_names<R: Read + Seek>(reader: &mut R) -> VshResult<()> {
    let Some(names) = record_names(reader)? else {
        return Ok(());
    };
    let mut seen = HashSet::with_capacity(names.len());
    for name in &names {
        if !seen.insert(name.as_slice()) {
            let name = String::from_utf8_lossy(name).into_owned();
            tracing::warn!(name = %name, "archive declares a name twice");
            return Err(VshError::DuplicateEntry(name));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_zip(names: &[&str], comment: &str) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for name in names {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(name.as_bytes()).unwrap();
        }
        zip.set_comment(comment);
        zip.finish().unwrap().into_inner()
    }

    /// Rewrite every occurrence of `from` (local headers, central records
    /// and data) with `to`, which must have the same length.
    fn rename_all(bytes: &mut [u8], from: &[u8], to: &[u8]) {
        assert_eq!(from.len(), to.len());
        let mut at = 0;
        while at + from.len() <= bytes.len() {
            if &bytes[at..at + from.len()] == from {
                bytes[at..at + from.len()].copy_from_slice(to);
                at += from.len();
            } else {
                at += 1;
            }
        }
    }

    #[test]
    fn test_record_names_in_order() {
        let bytes = build_zip(&["vfs/b.txt", "vfs/a/", "vfs/a/c.txt"], "");
        let names = record_names(&mut Cursor::new(bytes)).unwrap().unwrap();
        assert_eq!(
            names,
            vec![b"vfs/b.txt".to_vec(), b"vfs/a/".to_vec(), b"vfs/a/c.txt".to_vec()]
        );
    }

    #[test]
    fn test_record_names_with_comment_holding_signature() {
        let bytes = build_zip(&["vfs/a.txt"], "PK\x05\x06 not an end record");
        let names = record_names(&mut Cursor::new(bytes)).unwrap().unwrap();
        assert_eq!(names, vec![b"vfs/a.txt".to_vec()]);
    }

    #[test]
    fn test_record_names_on_non_zip() {
        assert!(record_names(&mut Cursor::new(b"not a zip".to_vec()))
            .unwrap()
            .is_none());
        assert!(record_names(&mut Cursor::new(Vec::new())).unwrap().is_none());
    }

    #[test]
    fn test_reject_duplicate_names() {
        let mut bytes = build_zip(&["vfs/a.txt", "vfs/b.txt"], "");
        reject_duplicate_names(&mut Cursor::new(bytes.clone())).unwrap();

        rename_all(&mut bytes, b"vfs/b.txt", b"vfs/a.txt");
        let result = reject_duplicate_names(&mut Cursor::new(bytes));
        assert!(matches!(result, Err(VshError::DuplicateEntry(n)) if n == "vfs/a.txt"));
    }
}
