//! Where feed tables are read from.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use zip::ZipArchive;

use super::fetch::fetch_bytes;

/// Opens named tables (`trips.txt`, ...) of one feed.
pub trait TableSource {
    /// Returns `None` when the feed has no such table.
    fn open(&mut self, name: &str) -> Result<Option<Box<dyn Read + '_>>>;

    fn contains(&mut self, name: &str) -> bool;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// An unpacked feed: one `.txt` file per table.
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TableSource for DirectorySource {
    fn open(&mut self, name: &str) -> Result<Option<Box<dyn Read + '_>>> {
        let path = self.dir.join(name);
        if !path.is_file() {
            return Ok(None);
        }
        let file =
            File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
        Ok(Some(Box::new(file)))
    }

    fn contains(&mut self, name: &str) -> bool {
        self.dir.join(name).is_file()
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// A zipped feed. Tables are matched on file name, so archives that wrap the
/// feed in a top-level folder load too.
pub struct ArchiveSource<R> {
    archive: ZipArchive<R>,
    label: String,
}

impl<R: Read + Seek> ArchiveSource<R> {
    pub fn new(reader: R, label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let archive =
            ZipArchive::new(reader).with_context(|| format!("Failed to read zip archive {label}"))?;
        Ok(Self { archive, label })
    }

    fn entry_name(&self, name: &str) -> Option<String> {
        self.archive
            .file_names()
            .filter(|entry| !entry.starts_with("__MACOSX"))
            .find(|entry| Path::new(entry).file_name() == Some(OsStr::new(name)))
            .map(str::to_string)
    }
}

impl<R: Read + Seek> TableSource for ArchiveSource<R> {
    fn open(&mut self, name: &str) -> Result<Option<Box<dyn Read + '_>>> {
        let Some(entry) = self.entry_name(name) else {
            return Ok(None);
        };
        let file = self
            .archive
            .by_name(&entry)
            .with_context(|| format!("Failed to open {entry} in {}", self.label))?;
        Ok(Some(Box::new(file)))
    }

    fn contains(&mut self, name: &str) -> bool {
        self.entry_name(name).is_some()
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// Location of a feed as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Directory(PathBuf),
    Archive(PathBuf),
    /// `http(s)://` URL of a zipped feed.
    Remote(String),
}

impl FeedSource {
    pub fn from_arg(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            return FeedSource::Remote(arg.to_string());
        }
        let path = PathBuf::from(arg);
        if path.is_dir() {
            FeedSource::Directory(path)
        } else {
            FeedSource::Archive(path)
        }
    }

    pub fn open(&self) -> Result<Box<dyn TableSource>> {
        let source: Box<dyn TableSource> = match self {
            FeedSource::Directory(dir) => Box::new(DirectorySource::new(dir)),
            FeedSource::Archive(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open feed archive {}", path.display()))?;
                Box::new(ArchiveSource::new(file, path.display().to_string())?)
            }
            FeedSource::Remote(url) => {
                let bytes = fetch_bytes(url)?;
                Box::new(ArchiveSource::new(Cursor::new(bytes), url.clone())?)
            }
        };
        Ok(source)
    }
}
