//! UDF path resolution for DVD-Video discs.
//!
//! Covers what DVD-Video mastering produces: a single partition with
//! 2048-byte logical blocks, directories and files described by File
//! Entries or Extended File Entries with short or long allocation
//! descriptors. Every descriptor tag is checked (header checksum, CRC of
//! the descriptor body and recorded location) before its contents are used.

use std::collections::HashMap;

use dvdimg_core::{DiscError, FileExtent, FileLocator, ReadSeek, SECTOR_SIZE};

use crate::image::read_sector_into;

/// CRC-ITU-T over descriptor bodies (ECMA-167 7.2.6).
const TAG_CRC: crc::Crc<u16> = crc::Crc::<u16>::new(&crc::CRC_16_XMODEM);

const TAG_LENGTH: usize = 16;

/// Sector holding the Anchor Volume Descriptor Pointer.
const ANCHOR_SECTOR: u64 = 256;

const TAG_ANCHOR: u16 = 2;
const TAG_PARTITION: u16 = 5;
const TAG_LOGICAL_VOLUME: u16 = 6;
const TAG_TERMINATING: u16 = 8;
const TAG_FILE_SET: u16 = 256;
const TAG_FILE_IDENTIFIER: u16 = 257;
const TAG_FILE_ENTRY: u16 = 261;
const TAG_EXTENDED_FILE_ENTRY: u16 = 266;

const FILE_TYPE_DIRECTORY: u8 = 4;

const FID_DIRECTORY: u8 = 0x02;
const FID_DELETED: u8 = 0x04;
const FID_PARENT: u8 = 0x08;

/// Longest volume descriptor sequence scanned, in sectors.
const MAX_DESCRIPTOR_SECTORS: u64 = 64;

/// Directories larger than this are treated as corrupt.
const MAX_DIRECTORY_BYTES: u64 = 4 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Little-endian field access
// ---------------------------------------------------------------------------

fn read_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

fn read_u64(data: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[offset..offset + 8]);
    u64::from_le_bytes(bytes)
}

fn tag_id(descriptor: &[u8]) -> u16 {
    read_u16(descriptor, 0)
}

/// Validate the tag of a descriptor recorded at `location` and return its
/// identifier.
///
/// Volume descriptors record absolute sectors, file structure descriptors
/// logical block numbers within the partition.
fn verify_tag(descriptor: &[u8], location: u32) -> Result<u16, DiscError> {
    let id = tag_id(descriptor);
    let header = &descriptor[..TAG_LENGTH];
    let checksum = header
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != 4)
        .fold(0u8, |sum, (_, &b)| sum.wrapping_add(b));
    if checksum != header[4] {
        return Err(DiscError::invalid_filesystem(format!(
            "tag {} at {}: checksum mismatch",
            id, location
        )));
    }

    let crc_length = read_u16(descriptor, 10) as usize;
    let body = descriptor
        .get(TAG_LENGTH..TAG_LENGTH + crc_length)
        .ok_or_else(|| {
            DiscError::invalid_filesystem(format!(
                "tag {} at {}: CRC length {} runs past the descriptor",
                id, location, crc_length
            ))
        })?;
    if TAG_CRC.checksum(body) != read_u16(descriptor, 8) {
        return Err(DiscError::invalid_filesystem(format!(
            "tag {} at {}: CRC mismatch",
            id, location
        )));
    }

    let recorded = read_u32(descriptor, 12);
    if recorded != location {
        return Err(DiscError::invalid_filesystem(format!(
            "tag {} at {} claims location {}",
            id, location, recorded
        )));
    }
    Ok(id)
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// One contiguous run of logical blocks inside the partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Extent {
    lbn: u32,
    length: u32,
}

/// The parts of a (Extended) File Entry we care about.
#[derive(Debug, Clone)]
struct FileEntry {
    is_directory: bool,
    information_length: u64,
    extents: Vec<Extent>,
}

/// A live entry of a directory.
#[derive(Debug, Clone)]
struct DirectoryEntry {
    name: String,
    icb_lbn: u32,
    is_directory: bool,
}

fn parse_short_ads(data: &[u8]) -> Vec<Extent> {
    let mut extents = Vec::new();
    for ad in data.chunks_exact(8) {
        let raw_length = read_u32(ad, 0);
        let length = raw_length & 0x3FFF_FFFF;
        // Type 3 points at a continuation of the descriptor list
        if length == 0 || raw_length >> 30 == 3 {
            break;
        }
        extents.push(Extent {
            lbn: read_u32(ad, 4),
            length,
        });
    }
    extents
}

fn parse_long_ads(data: &[u8]) -> Vec<Extent> {
    let mut extents = Vec::new();
    for ad in data.chunks_exact(16) {
        let raw_length = read_u32(ad, 0);
        let length = raw_length & 0x3FFF_FFFF;
        if length == 0 || raw_length >> 30 == 3 {
            break;
        }
        extents.push(Extent {
            lbn: read_u32(ad, 4),
            length,
        });
    }
    extents
}

fn parse_file_entry(data: &[u8], lbn: u32) -> Result<FileEntry, DiscError> {
    let (ea_length_offset, descriptors_offset) = match tag_id(data) {
        TAG_FILE_ENTRY => (168, 176),
        TAG_EXTENDED_FILE_ENTRY => (208, 216),
        other => {
            return Err(DiscError::invalid_filesystem(format!(
                "expected a file entry at block {}, found tag {}",
                lbn, other
            )));
        }
    };
    verify_tag(data, lbn)?;

    // ICB tag occupies bytes 16..36: file type at +11, flags at +18
    let file_type = data[27];
    let ad_type = read_u16(data, 34) & 0x7;
    let information_length = read_u64(data, 56);
    let ea_length = read_u32(data, ea_length_offset) as usize;
    let ad_length = read_u32(data, ea_length_offset + 4) as usize;

    let start = descriptors_offset + ea_length;
    let end = start
        .checked_add(ad_length)
        .filter(|&end| end <= data.len())
        .ok_or_else(|| {
            DiscError::invalid_filesystem(format!(
                "allocation descriptors of block {} run past the sector",
                lbn
            ))
        })?;
    let descriptors = &data[start..end];

    let extents = match ad_type {
        0 => parse_short_ads(descriptors),
        1 => parse_long_ads(descriptors),
        3 => {
            return Err(DiscError::unsupported(format!(
                "embedded file data in block {}",
                lbn
            )));
        }
        other => {
            return Err(DiscError::invalid_filesystem(format!(
                "unknown allocation descriptor type {} in block {}",
                other, lbn
            )));
        }
    };

    Ok(FileEntry {
        is_directory: file_type == FILE_TYPE_DIRECTORY,
        information_length,
        extents,
    })
}

/// Decode an OSTA CS0 identifier (compression id 8 or 16).
fn decode_cs0(bytes: &[u8]) -> Option<String> {
    let (&compression, rest) = bytes.split_first()?;
    match compression {
        8 => Some(rest.iter().map(|&b| b as char).collect()),
        16 => Some(
            char::decode_utf16(
                rest.chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]])),
            )
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect(),
        ),
        _ => None,
    }
}

/// Parse the File Identifier Descriptors of a directory's data.
///
/// `block_lbns[i]` is the logical block that sector `i` of `data` was read
/// from; each identifier's tag records the block it starts in.
fn parse_directory(data: &[u8], block_lbns: &[u32]) -> Result<Vec<DirectoryEntry>, DiscError> {
    let mut entries = Vec::new();
    let mut pos = 0;

    while pos + 38 <= data.len() {
        let fid = &data[pos..];
        if tag_id(fid) != TAG_FILE_IDENTIFIER {
            break;
        }
        let location = block_lbns.get(pos / SECTOR_SIZE).copied().ok_or_else(|| {
            DiscError::invalid_filesystem("file identifier outside the directory's blocks")
        })?;
        verify_tag(fid, location)?;

        let characteristics = fid[18];
        let name_length = fid[19] as usize;
        let icb_lbn = read_u32(fid, 24);
        let impl_use_length = read_u16(fid, 36) as usize;
        let name_start = 38 + impl_use_length;
        let name_end = name_start + name_length;
        if name_end > fid.len() {
            return Err(DiscError::invalid_filesystem(
                "file identifier runs past the end of its directory",
            ));
        }

        if characteristics & (FID_DELETED | FID_PARENT) == 0 {
            match decode_cs0(&fid[name_start..name_end]) {
                Some(name) => entries.push(DirectoryEntry {
                    name,
                    icb_lbn,
                    is_directory: characteristics & FID_DIRECTORY != 0,
                }),
                None => log::debug!("Skipping directory entry with unknown name encoding"),
            }
        }

        // Descriptors are padded to a 4-byte boundary
        pos += (name_end + 3) & !3;
    }

    Ok(entries)
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Resolves absolute paths in a disc image's UDF filesystem.
///
/// Directory listings are cached per path, so repeated lookups in
/// `/VIDEO_TS` read the directory only once.
pub struct UdfReader<R> {
    reader: R,
    partition_start: u64,
    root_icb: u32,
    directories: HashMap<String, Vec<DirectoryEntry>>,
}

impl<R: ReadSeek> UdfReader<R> {
    /// Read the volume structure of `reader` and locate the root directory.
    pub fn open(mut reader: R) -> Result<Self, DiscError> {
        let anchor = read_sector(&mut reader, ANCHOR_SECTOR).map_err(|e| match e {
            DiscError::OutOfRange(_) => {
                DiscError::invalid_filesystem("image too small to hold a UDF anchor")
            }
            e => e,
        })?;
        if tag_id(&anchor) != TAG_ANCHOR {
            return Err(DiscError::invalid_filesystem(
                "no anchor volume descriptor pointer at sector 256",
            ));
        }
        verify_tag(&anchor, ANCHOR_SECTOR as u32)?;

        let sequence_length = read_u32(&anchor, 16) as u64;
        let sequence_start = read_u32(&anchor, 20) as u64;
        let sequence_sectors = sequence_length
            .div_ceil(SECTOR_SIZE as u64)
            .min(MAX_DESCRIPTOR_SECTORS);

        let mut partition_start = None;
        let mut file_set_lbn = None;
        for offset in 0..sequence_sectors {
            let sector = sequence_start + offset;
            let descriptor = read_sector(&mut reader, sector)?;
            let id = tag_id(&descriptor);
            if matches!(id, TAG_PARTITION | TAG_LOGICAL_VOLUME | TAG_TERMINATING) {
                verify_tag(&descriptor, sector as u32)?;
            }
            match id {
                TAG_PARTITION => {
                    if partition_start.is_none() {
                        partition_start = Some(read_u32(&descriptor, 188) as u64);
                    }
                }
                TAG_LOGICAL_VOLUME => {
                    let block_size = read_u32(&descriptor, 212);
                    if block_size as usize != SECTOR_SIZE {
                        return Err(DiscError::unsupported(format!(
                            "logical block size {}",
                            block_size
                        )));
                    }
                    // File set descriptor long_ad in the contents-use field
                    file_set_lbn = Some(read_u32(&descriptor, 252));
                }
                TAG_TERMINATING => break,
                _ => {}
            }
        }

        let partition_start = partition_start
            .ok_or_else(|| DiscError::invalid_filesystem("no partition descriptor"))?;
        let file_set_lbn = file_set_lbn
            .ok_or_else(|| DiscError::invalid_filesystem("no logical volume descriptor"))?;

        let file_set = read_sector(&mut reader, partition_start + file_set_lbn as u64)?;
        if tag_id(&file_set) != TAG_FILE_SET {
            return Err(DiscError::invalid_filesystem(format!(
                "no file set descriptor at block {}",
                file_set_lbn
            )));
        }
        verify_tag(&file_set, file_set_lbn)?;
        let root_icb = read_u32(&file_set, 404);

        log::debug!(
            "UDF partition starts at sector {}, root directory entry at block {}",
            partition_start,
            root_icb
        );

        Ok(Self {
            reader,
            partition_start,
            root_icb,
            directories: HashMap::new(),
        })
    }

    /// First sector of the partition all logical block numbers refer to.
    pub fn partition_start(&self) -> u64 {
        self.partition_start
    }

    fn read_block(&mut self, lbn: u64) -> Result<Vec<u8>, DiscError> {
        read_sector(&mut self.reader, self.partition_start + lbn)
    }

    fn read_file_entry(&mut self, lbn: u32) -> Result<FileEntry, DiscError> {
        let data = self.read_block(lbn as u64)?;
        parse_file_entry(&data, lbn)
    }

    fn read_directory(&mut self, entry: &FileEntry) -> Result<Vec<DirectoryEntry>, DiscError> {
        if entry.information_length > MAX_DIRECTORY_BYTES {
            return Err(DiscError::invalid_filesystem(format!(
                "directory of {} bytes",
                entry.information_length
            )));
        }
        let length = entry.information_length as usize;
        let mut data = Vec::with_capacity(length);
        let mut block_lbns = Vec::new();

        'extents: for extent in &entry.extents {
            let blocks = (extent.length as u64).div_ceil(SECTOR_SIZE as u64);
            for block in 0..blocks {
                if data.len() >= length {
                    break 'extents;
                }
                let lbn = extent.lbn as u64 + block;
                let sector = self.read_block(lbn)?;
                data.extend_from_slice(&sector);
                block_lbns.push(lbn as u32);
            }
        }
        data.truncate(length);

        parse_directory(&data, &block_lbns)
    }

    /// Listing of the directory at `key`, read through `icb` on first use.
    fn directory(&mut self, key: &str, icb: u32) -> Result<&[DirectoryEntry], DiscError> {
        if !self.directories.contains_key(key) {
            let entry = self.read_file_entry(icb)?;
            if !entry.is_directory {
                return Err(DiscError::invalid_filesystem(format!(
                    "'{}' is not a directory",
                    key
                )));
            }
            let entries = self.read_directory(&entry)?;
            self.directories.insert(key.to_string(), entries);
        }
        Ok(self.directories.get(key).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Look `name` up in a directory, returning its ICB and directory flag.
    fn find_entry(&mut self, key: &str, icb: u32, name: &str) -> Result<Option<(u32, bool)>, DiscError> {
        Ok(self
            .directory(key, icb)?
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| (entry.icb_lbn, entry.is_directory)))
    }

    fn resolve(&mut self, path: &str) -> Result<Option<FileExtent>, DiscError> {
        let components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();
        let Some((file_name, parents)) = components.split_last() else {
            return Ok(None);
        };

        let mut key = String::new();
        let mut icb = self.root_icb;
        for component in parents {
            match self.find_entry(&key, icb, component)? {
                Some((child, true)) => {
                    icb = child;
                    key.push('/');
                    key.push_str(&component.to_ascii_uppercase());
                }
                _ => return Ok(None),
            }
        }

        let file_icb = match self.find_entry(&key, icb, file_name)? {
            Some((child, false)) => child,
            _ => return Ok(None),
        };

        let entry = self.read_file_entry(file_icb)?;
        if entry.is_directory {
            return Ok(None);
        }
        match entry.extents.first() {
            Some(first) => Ok(Some(FileExtent::new(
                self.partition_start + first.lbn as u64,
                entry.information_length,
            ))),
            // An empty file records no allocation descriptor but still exists
            None if entry.information_length == 0 => {
                Ok(Some(FileExtent::new(self.partition_start, 0)))
            }
            None => {
                log::debug!("{} has no recorded extent", path);
                Ok(None)
            }
        }
    }
}

impl<R: ReadSeek> FileLocator for UdfReader<R> {
    fn find_file(&mut self, path: &str) -> Result<Option<FileExtent>, DiscError> {
        let found = self.resolve(path)?;
        if let Some(extent) = &found {
            log::debug!(
                "{}: sector {} length {}",
                path,
                extent.start_sector,
                extent.byte_length
            );
        }
        Ok(found)
    }
}

fn read_sector<R: ReadSeek>(reader: &mut R, sector: u64) -> Result<Vec<u8>, DiscError> {
    let mut data = vec![0u8; SECTOR_SIZE];
    read_sector_into(reader, sector, &mut data)?;
    Ok(data)
}

#[cfg(test)]
#[path = "tests/udf_tests.rs"]
mod tests;
