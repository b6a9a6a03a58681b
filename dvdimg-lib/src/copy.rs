//! The per-block copy driver.
//!
//! One routine copies every kind of block: title payload (descrambled),
//! navigation files and ordinary regions (verbatim). What varies is where
//! sectors come from ([`CopySource`]) and whether they are descrambled
//! ([`BlockRole`]).

use std::io::{Seek, SeekFrom, Write};

use dvdimg_core::{Block, Domain, ExitStatus, SECTOR_SIZE, SectorSource, TitleFile};

use crate::progress::CopyProgress;

/// Offset of the PES header byte carrying the scrambling control bits.
pub(crate) const SCRAMBLING_BYTE: usize = 0x14;
pub(crate) const SCRAMBLING_MASK: u8 = 0x30;

/// Where the sectors of a block are read from.
pub enum CopySource<'a> {
    /// The disc itself, addressed by absolute sector
    Engine(&'a mut dyn SectorSource),
    /// A file from the independent reader, addressed relative to the block
    TitleFile(&'a mut dyn TitleFile),
}

/// What a block holds, which decides how it is copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRole {
    /// Information files, copied as stored
    Navigation,
    /// Menu and title VOBs, descrambled
    Payload,
    /// Sectors outside every title, copied as stored
    Ordinary,
}

impl BlockRole {
    pub fn for_domain(domain: Domain) -> Self {
        if domain.is_protected() {
            Self::Payload
        } else {
            Self::Navigation
        }
    }

    pub fn decrypts(&self) -> bool {
        matches!(self, Self::Payload)
    }
}

/// What happened while copying one block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOutcome {
    /// `IO` if the copy stopped early, `UNDECRYPTED` for key or descrambling failures
    pub status: ExitStatus,
    pub sectors_written: u64,
    /// Payload sectors that still carried scrambling bits after the read
    pub undecrypted_sectors: u64,
}

/// Whether a sector read back still has its PES scrambling bits set.
pub fn is_scrambled(sector: &[u8]) -> bool {
    sector
        .get(SCRAMBLING_BYTE)
        .is_some_and(|&b| b & SCRAMBLING_MASK != 0)
}

/// Copy `block` from `source` to the same sector position in `output`.
///
/// Missing and empty blocks are skipped. A failed key request is reported
/// and the copy continues with whatever the source returns. A failed seek,
/// read or write stops this block; sectors already written stay in place.
pub fn copy_block<W: Write + Seek + ?Sized>(
    mut source: CopySource<'_>,
    role: BlockRole,
    block: Block,
    name: &str,
    output: &mut W,
    progress: &dyn Fn(CopyProgress),
) -> CopyOutcome {
    let mut outcome = CopyOutcome::default();

    if !block.exists() {
        log::debug!("{}: not present", name);
        return outcome;
    }
    if block.is_empty() {
        log::info!("{}: empty", name);
        return outcome;
    }

    let decrypt = role.decrypts();
    if let CopySource::Engine(engine) = &mut source {
        if decrypt {
            if let Err(e) = engine.request_key(block.start) {
                log::warn!("{}: no title key, copying as stored ({})", name, e);
                outcome.status |= ExitStatus::UNDECRYPTED;
            }
        }
    }

    progress(CopyProgress::started(name, block.len()));

    if let Err(e) = output.seek(SeekFrom::Start(block.byte_offset(SECTOR_SIZE))) {
        progress(CopyProgress::Aborted);
        log::error!("{}: seeking in the image failed ({})", name, e);
        outcome.status |= ExitStatus::IO;
        return outcome;
    }

    // Two sectors of storage always hold one sector-aligned sector
    let mut storage = [0u8; SECTOR_SIZE * 2];
    let align = storage.as_ptr().align_offset(SECTOR_SIZE).min(SECTOR_SIZE);
    let buffer = &mut storage[align..align + SECTOR_SIZE];

    let total = block.len();
    let mut last_percent = 0u8;
    for index in 0..total {
        let read = match &mut source {
            CopySource::Engine(engine) => engine.read_sector(block.start + index, decrypt, buffer),
            CopySource::TitleFile(file) => file.read_block(index, buffer),
        };
        if let Err(e) = read {
            progress(CopyProgress::Aborted);
            log::error!("{}: reading sector {} failed ({})", name, index, e);
            outcome.status |= ExitStatus::IO;
            break;
        }

        if decrypt && is_scrambled(buffer) {
            outcome.undecrypted_sectors += 1;
        }

        if let Err(e) = output.write_all(buffer) {
            progress(CopyProgress::Aborted);
            log::error!("{}: writing sector {} failed ({})", name, index, e);
            outcome.status |= ExitStatus::IO;
            break;
        }
        outcome.sectors_written += 1;

        let percent = ((index + 1) * 100 / total) as u8;
        if percent > last_percent {
            last_percent = percent;
            progress(CopyProgress::Advanced { percent });
        }
    }

    if outcome.undecrypted_sectors > 0 {
        log::warn!(
            "{}: {} sectors still scrambled after decryption",
            name,
            outcome.undecrypted_sectors
        );
        outcome.status |= ExitStatus::UNDECRYPTED;
    }
    if outcome.sectors_written == total {
        progress(CopyProgress::Finished);
    }

    outcome
}

#[cfg(test)]
#[path = "tests/copy_tests.rs"]
mod tests;
