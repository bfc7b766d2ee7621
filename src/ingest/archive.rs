//! Archive decoding
//!
//! Dataset content arrives as a zip or tar archive, either as raw bytes
//! or as base64 text of those bytes. The format is picked by the zip
//! signature. Only regular files are returned.

use std::io::{Cursor, Read};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tar::{Archive, EntryType};
use zip::ZipArchive;

use super::errors::{IngestError, IngestResult};

/// A regular file read out of an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    /// Path inside the archive, without a leading `./`
    pub path: String,
    pub contents: Vec<u8>,
}

/// Local file header signature opening every non-empty zip archive
const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";

/// Reads every regular file out of raw or base64-encoded archive content
pub fn read_archive(content: &[u8]) -> IngestResult<Vec<ArchiveFile>> {
    match read_bytes(content) {
        Ok(files) => Ok(files),
        Err(raw_err) => match decode_base64(content) {
            Some(bytes) => read_bytes(&bytes),
            None => Err(raw_err),
        },
    }
}

fn read_bytes(bytes: &[u8]) -> IngestResult<Vec<ArchiveFile>> {
    let files = if bytes.starts_with(ZIP_SIGNATURE) {
        read_zip(bytes)?
    } else {
        read_tar(bytes)?
    };
    if files.is_empty() {
        return Err(IngestError::InvalidArchive("archive is empty".to_string()));
    }
    Ok(files)
}

fn read_zip(bytes: &[u8]) -> IngestResult<Vec<ArchiveFile>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| IngestError::InvalidArchive(e.to_string()))?;

    let mut files = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| IngestError::InvalidArchive(e.to_string()))?;
        if entry.is_dir() {
            continue;
        }
        let path = entry.name().trim_start_matches("./").to_string();
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;
        files.push(ArchiveFile { path, contents });
    }
    Ok(files)
}

fn read_tar(bytes: &[u8]) -> IngestResult<Vec<ArchiveFile>> {
    let mut archive = Archive::new(Cursor::new(bytes));
    let entries = archive
        .entries()
        .map_err(|e| IngestError::InvalidArchive(e.to_string()))?;

    let mut files = Vec::new();
    for entry in entries {
        let mut entry = entry.map_err(|e| IngestError::InvalidArchive(e.to_string()))?;
        if entry.header().entry_type() != EntryType::Regular {
            continue;
        }
        let path = entry
            .path()
            .map_err(|e| IngestError::InvalidArchive(e.to_string()))?
            .to_string_lossy()
            .trim_start_matches("./")
            .to_string();
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;
        files.push(ArchiveFile { path, contents });
    }
    Ok(files)
}

fn decode_base64(content: &[u8]) -> Option<Vec<u8>> {
    let text: Vec<u8> = content
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if text.is_empty() {
        return None;
    }
    STANDARD.decode(text).ok()
}
