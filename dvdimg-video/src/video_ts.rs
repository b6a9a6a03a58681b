//! Title files in a `VIDEO_TS` directory on the host filesystem.
//!
//! This is the independent view used to cross-check a layout discovered
//! through UDF: a mounted disc, or a copy whose files were decrypted by
//! other means.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use dvdimg_core::naming::{file_name, title_vob_part};
use dvdimg_core::{DiscError, Domain, SECTOR_SIZE, TitleFile, TitleReader, VOB_PARTS_MAX};

/// A `VIDEO_TS` directory whose files are matched case-insensitively.
#[derive(Debug, Clone)]
pub struct VideoTsDir {
    files: Vec<(String, PathBuf)>,
}

impl VideoTsDir {
    /// List the regular files of `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, DiscError> {
        let root = root.as_ref().to_path_buf();
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                let name = entry.file_name().to_string_lossy().to_uppercase();
                files.push((name, entry.path()));
            }
        }
        files.sort();
        log::debug!("{} holds {} files", root.display(), files.len());
        Ok(Self { files })
    }

    fn lookup(&self, name: &str) -> Option<&Path> {
        self.files
            .iter()
            .find(|(upper, _)| upper.eq_ignore_ascii_case(name))
            .map(|(_, path)| path.as_path())
    }

    /// Paths backing `domain` of `title`, in read order.
    ///
    /// Title VOB parts are taken up to the first missing part.
    fn paths_for(&self, title: u8, domain: Domain) -> Vec<PathBuf> {
        if domain == Domain::TitleVobs {
            let mut paths = Vec::new();
            for part in 1..=VOB_PARTS_MAX {
                let Some(name) = title_vob_part(title, part) else {
                    break;
                };
                match self.lookup(&name) {
                    Some(path) => paths.push(path.to_path_buf()),
                    None => break,
                }
            }
            return paths;
        }
        file_name(title, domain)
            .and_then(|name| self.lookup(&name))
            .map(|path| vec![path.to_path_buf()])
            .unwrap_or_default()
    }
}

impl TitleReader for VideoTsDir {
    fn open(&mut self, title: u8, domain: Domain) -> Result<Option<Box<dyn TitleFile>>, DiscError> {
        let paths = self.paths_for(title, domain);
        if paths.is_empty() {
            return Ok(None);
        }
        let mut parts = Vec::with_capacity(paths.len());
        for path in paths {
            let file = File::open(&path)?;
            let size = file.metadata()?.len();
            parts.push(PartFile { file, size });
        }
        Ok(Some(Box::new(ConcatenatedFile::new(parts))))
    }
}

struct PartFile {
    file: File,
    size: u64,
}

/// One or more files read back to back as a single byte stream.
struct ConcatenatedFile {
    parts: Vec<PartFile>,
    total: u64,
}

impl ConcatenatedFile {
    fn new(parts: Vec<PartFile>) -> Self {
        let total = parts.iter().map(|p| p.size).sum();
        Self { parts, total }
    }
}

impl TitleFile for ConcatenatedFile {
    fn size_bytes(&self) -> u64 {
        self.total
    }

    fn read_block(&mut self, index: u64, buf: &mut [u8]) -> Result<(), DiscError> {
        let mut offset = index * SECTOR_SIZE as u64;
        if offset + buf.len() as u64 > self.total {
            return Err(DiscError::OutOfRange(index));
        }

        let mut filled = 0;
        for part in &mut self.parts {
            if filled == buf.len() {
                break;
            }
            if offset >= part.size {
                offset -= part.size;
                continue;
            }
            let take = ((part.size - offset) as usize).min(buf.len() - filled);
            part.file.seek(SeekFrom::Start(offset))?;
            part.file.read_exact(&mut buf[filled..filled + take])?;
            filled += take;
            offset = 0;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/video_ts_tests.rs"]
mod tests;
