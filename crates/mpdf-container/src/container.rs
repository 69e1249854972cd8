use crate::{fsync_dir, ContainerError};
use std::fmt;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// Flat, ordered namespace of named byte blobs.
///
/// Entry order is preserved exactly as added, and is the order entries
/// appear in the written archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    entries: Vec<(String, Vec<u8>)>,
}

/// Archive-relative names only: no absolute paths, no `..` segments, no
/// backslashes, no directory entries.
pub fn is_valid_entry_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('/')
        && !name.ends_with('/')
        && !name.contains('\\')
        && name.split('/').all(|seg| !seg.is_empty() && seg != "." && seg != "..")
}

/// An archive entry that was read but not admitted into a [`Container`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryIssue {
    InvalidName(String),
    Duplicate(String),
}

impl fmt::Display for EntryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryIssue::InvalidName(name) => write!(f, "Invalid entry name: {name}"),
            EntryIssue::Duplicate(name) => write!(f, "Duplicate entry: {name}"),
        }
    }
}

impl From<EntryIssue> for ContainerError {
    fn from(issue: EntryIssue) -> Self {
        match issue {
            EntryIssue::InvalidName(name) => ContainerError::InvalidEntryName(name),
            EntryIssue::Duplicate(name) => ContainerError::DuplicateEntry(name),
        }
    }
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Fails if the name is already present or malformed.
    pub fn add(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Result<(), ContainerError> {
        let name = name.into();
        if !is_valid_entry_name(&name) {
            return Err(ContainerError::InvalidEntryName(name));
        }
        if self.contains(&name) {
            return Err(ContainerError::DuplicateEntry(name));
        }
        self.entries.push((name, data.into()));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data.as_slice())
    }

    /// Fetch an entry that must exist and decode it as UTF-8.
    pub fn require_str(&self, name: &str) -> Result<&str, ContainerError> {
        let data = self
            .get(name)
            .ok_or_else(|| ContainerError::MissingEntry(name.to_owned()))?;
        std::str::from_utf8(data).map_err(|_| ContainerError::NotUtf8(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Entry names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Entries whose name starts with `prefix`, in order.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a [u8])> + 'a {
        self.iter().filter(move |(n, _)| n.starts_with(prefix))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries
            .iter()
            .map(|(n, data)| (n.as_str(), data.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to ZIP bytes. Every entry is Deflate-compressed and stamped
    /// 1980-01-01 00:00:00, so equal containers produce equal archives.
    pub fn to_zip_bytes(&self) -> Result<Vec<u8>, ContainerError> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644);

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in &self.entries {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(data)?;
        }
        Ok(writer.finish()?.into_inner())
    }

    /// Parse ZIP bytes, failing on the first malformed or duplicate entry name.
    pub fn from_zip_bytes(bytes: &[u8]) -> Result<Self, ContainerError> {
        let (container, issues) = Self::scan_zip_bytes(bytes)?;
        match issues.into_iter().next() {
            Some(issue) => Err(issue.into()),
            None => Ok(container),
        }
    }

    /// Parse ZIP bytes without rejecting entries. Directory entries are
    /// skipped; entries with unsafe names, and repeats of a name already
    /// seen, are left out of the container and returned as issues. Only a
    /// broken archive is an error.
    pub fn scan_zip_bytes(bytes: &[u8]) -> Result<(Self, Vec<EntryIssue>), ContainerError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut container = Container::new();
        let mut issues = Vec::new();
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_owned();
            if !is_valid_entry_name(&name) {
                issues.push(EntryIssue::InvalidName(name));
                continue;
            }
            if container.contains(&name) {
                issues.push(EntryIssue::Duplicate(name));
                continue;
            }
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            container.entries.push((name, data));
        }
        Ok((container, issues))
    }

    /// [`scan_zip_bytes`](Self::scan_zip_bytes) over a file on disk.
    pub fn scan_file(path: &Path) -> Result<(Self, Vec<EntryIssue>), ContainerError> {
        let bytes = fs::read(path)?;
        let (container, issues) = Self::scan_zip_bytes(&bytes)?;
        debug!(
            "scanned {} entries ({} rejected) from {}",
            container.len(),
            issues.len(),
            path.display()
        );
        Ok((container, issues))
    }

    pub fn read_file(path: &Path) -> Result<Self, ContainerError> {
        let bytes = fs::read(path)?;
        let container = Self::from_zip_bytes(&bytes)?;
        debug!("read {} entries from {}", container.len(), path.display());
        Ok(container)
    }

    /// Write the archive to `path` atomically: temp file in the same
    /// directory, fsync, rename.
    pub fn write_file(&self, path: &Path) -> Result<(), ContainerError> {
        let bytes = self.to_zip_bytes()?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => std::env::current_dir()?,
        };
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| ContainerError::Io(e.error))?;
        fsync_dir(&dir)?;
        debug!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}
