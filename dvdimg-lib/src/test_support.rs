//! In-memory collaborators shared by the unit tests.

use std::collections::HashMap;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::ops::Range;

use dvdimg_core::naming::disc_path;
use dvdimg_core::{
    DiscError, Domain, FileExtent, FileLocator, SECTOR_SIZE, SectorSource, TitleFile, TitleReader,
};

use crate::copy::{SCRAMBLING_BYTE, SCRAMBLING_MASK, is_scrambled};

pub(crate) const UNTOUCHED: u8 = 0xEE;

/// Deterministic sector content with clear scrambling bits.
pub(crate) fn plain_sector(seed: u64) -> Vec<u8> {
    let mut sector: Vec<u8> = (0..SECTOR_SIZE)
        .map(|i| ((seed * 31 + i as u64) % 251) as u8)
        .collect();
    sector[SCRAMBLING_BYTE] &= !SCRAMBLING_MASK;
    sector
}

pub(crate) fn scramble(sector: &mut [u8]) {
    for b in &mut sector[0x80..] {
        *b ^= 0x5A;
    }
    sector[SCRAMBLING_BYTE] |= SCRAMBLING_MASK;
}

pub(crate) fn descramble(sector: &mut [u8]) {
    for b in &mut sector[0x80..] {
        *b ^= 0x5A;
    }
    sector[SCRAMBLING_BYTE] &= !SCRAMBLING_MASK;
}

/// A disc in memory. Sectors in `protected` are stored scrambled and read
/// back in plain only after a successful key request.
pub(crate) struct MemoryDisc {
    pub sectors: Vec<Vec<u8>>,
    pub key_available: bool,
    pub key_loaded: bool,
    pub key_requests: Vec<u64>,
    pub fail_read_at: Option<u64>,
}

impl MemoryDisc {
    pub fn new(count: u64, protected: Range<u64>) -> Self {
        Self::with_protected(count, &[protected])
    }

    pub fn with_protected(count: u64, protected: &[Range<u64>]) -> Self {
        let sectors = (0..count)
            .map(|i| {
                let mut sector = plain_sector(i);
                if protected.iter().any(|range| range.contains(&i)) {
                    scramble(&mut sector);
                }
                sector
            })
            .collect();
        Self {
            sectors,
            key_available: true,
            key_loaded: false,
            key_requests: Vec::new(),
            fail_read_at: None,
        }
    }

    /// Every sector in plain form, concatenated.
    pub fn plaintext(&self) -> Vec<u8> {
        self.sectors
            .iter()
            .flat_map(|stored| {
                let mut sector = stored.clone();
                if is_scrambled(&sector) {
                    descramble(&mut sector);
                }
                sector
            })
            .collect()
    }
}

impl SectorSource for MemoryDisc {
    fn request_key(&mut self, sector: u64) -> Result<(), DiscError> {
        self.key_requests.push(sector);
        if self.key_available {
            self.key_loaded = true;
            Ok(())
        } else {
            Err(DiscError::key_unavailable(sector, "authentication failed"))
        }
    }

    fn read_sector(&mut self, sector: u64, decrypt: bool, buf: &mut [u8]) -> Result<(), DiscError> {
        if self.fail_read_at == Some(sector) {
            return Err(DiscError::Io(io::Error::other("medium error")));
        }
        let stored = self
            .sectors
            .get(sector as usize)
            .ok_or(DiscError::OutOfRange(sector))?;
        buf.copy_from_slice(stored);
        if decrypt && self.key_loaded && is_scrambled(buf) {
            descramble(buf);
        }
        Ok(())
    }
}

/// An image that can be told to fail its n-th write or every seek.
pub(crate) struct FlakyImage {
    pub inner: Cursor<Vec<u8>>,
    pub writes: usize,
    pub fail_write: Option<usize>,
    pub fail_seek: bool,
}

impl FlakyImage {
    pub fn new(sectors: usize) -> Self {
        Self {
            inner: Cursor::new(vec![UNTOUCHED; sectors * SECTOR_SIZE]),
            writes: 0,
            fail_write: None,
            fail_seek: false,
        }
    }

    pub fn sector(&self, index: u64) -> &[u8] {
        let start = index as usize * SECTOR_SIZE;
        &self.inner.get_ref()[start..start + SECTOR_SIZE]
    }

    pub fn is_untouched(&self, index: u64) -> bool {
        self.sector(index).iter().all(|&b| b == UNTOUCHED)
    }
}

impl Write for FlakyImage {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let attempt = self.writes;
        self.writes += 1;
        if self.fail_write == Some(attempt) {
            return Err(io::Error::other("disk full"));
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl Seek for FlakyImage {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        if self.fail_seek {
            return Err(io::Error::other("seek refused"));
        }
        self.inner.seek(pos)
    }
}

#[derive(Clone)]
pub(crate) struct MemoryTitleFile {
    pub data: Vec<u8>,
}

impl TitleFile for MemoryTitleFile {
    fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_block(&mut self, index: u64, buf: &mut [u8]) -> Result<(), DiscError> {
        let mut cursor = Cursor::new(&self.data);
        cursor.seek(SeekFrom::Start(index * SECTOR_SIZE as u64))?;
        cursor.read_exact(buf)?;
        Ok(())
    }
}

/// Title files keyed by title and domain.
#[derive(Default)]
pub(crate) struct MemoryReader {
    pub files: HashMap<(u8, Domain), Vec<u8>>,
    pub opened: Vec<(u8, Domain)>,
}

impl TitleReader for MemoryReader {
    fn open(&mut self, title: u8, domain: Domain) -> Result<Option<Box<dyn TitleFile>>, DiscError> {
        self.opened.push((title, domain));
        Ok(self.files.get(&(title, domain)).map(|data| {
            Box::new(MemoryTitleFile { data: data.clone() }) as Box<dyn TitleFile>
        }))
    }
}

/// A filesystem listing of `/VIDEO_TS` file names.
#[derive(Default)]
pub(crate) struct FakeFilesystem {
    pub files: HashMap<String, FileExtent>,
}

impl FakeFilesystem {
    pub fn with(mut self, name: &str, start: u64, sectors: u64) -> Self {
        self.files.insert(
            disc_path(name),
            FileExtent::new(start, sectors * SECTOR_SIZE as u64),
        );
        self
    }
}

impl FileLocator for FakeFilesystem {
    fn find_file(&mut self, path: &str) -> Result<Option<FileExtent>, DiscError> {
        Ok(self.files.get(path).copied())
    }
}
