//! Title layout discovery.
//!
//! Every domain of every title slot is looked up by its file name in the
//! disc filesystem. Title VOBs split over several parts are coalesced into
//! one block.

use dvdimg_core::naming::{disc_path, file_name, title_vob_part};
use dvdimg_core::util::sectors_from_bytes;
use dvdimg_core::{
    Block, Domain, ExitStatus, FileLocator, TITLE_MAX, TitleLayout, VOB_PARTS_MAX,
};

/// Result of a discovery pass.
#[derive(Debug, Clone)]
pub struct Discovery {
    pub layout: TitleLayout,
    /// `MISMATCH` for gaps between VOB parts, `IO` for failed lookups
    pub status: ExitStatus,
    /// Title sets (slots 1..) whose information file was found
    pub titles_found: usize,
}

/// Resolve the blocks of every title and domain through `filesystem`.
///
/// Nothing here is fatal: files that cannot be found are recorded as
/// missing blocks, and inconsistencies only set status bits.
pub fn discover_layout(filesystem: &mut dyn FileLocator) -> Discovery {
    let mut layout = TitleLayout::new();
    let mut status = ExitStatus::SUCCESS;
    let mut titles_found = 0;

    for title in 0..TITLE_MAX as u8 {
        for &domain in Domain::all() {
            let block = match domain {
                Domain::TitleVobs => locate_title_vobs(filesystem, title, &mut status),
                _ => match file_name(title, domain) {
                    Some(name) => locate(filesystem, &disc_path(&name), &mut status),
                    None => Block::MISSING,
                },
            };
            *layout.title_mut(title).get_mut(domain) = block;
        }

        let info_found = layout.title(title).info.exists();
        if title == 0 {
            if !info_found {
                log::warn!("{} not found", disc_path("VIDEO_TS.IFO"));
            }
        } else if info_found {
            titles_found += 1;
        }
    }

    log::debug!("{} titles found", titles_found);
    Discovery {
        layout,
        status,
        titles_found,
    }
}

/// Look up one file and convert its extent to a block.
fn locate(filesystem: &mut dyn FileLocator, path: &str, status: &mut ExitStatus) -> Block {
    match filesystem.find_file(path) {
        Ok(Some(extent)) => {
            let (sectors, remainder) = sectors_from_bytes(extent.byte_length);
            if remainder != 0 {
                log::warn!("Size of {} is not a block multiple", path);
            }
            let block = Block::sectors(extent.start_sector, sectors);
            log::debug!("{} at {}", path, block);
            block
        }
        Ok(None) => Block::MISSING,
        Err(e) => {
            log::warn!("Looking up {} failed: {}", path, e);
            *status |= ExitStatus::IO;
            Block::MISSING
        }
    }
}

/// Coalesce the VOB parts of a title into one block.
///
/// Sizes are summed even across gaps so the block covers what will actually
/// be read; each gap sets `MISMATCH`.
fn locate_title_vobs(
    filesystem: &mut dyn FileLocator,
    title: u8,
    status: &mut ExitStatus,
) -> Block {
    let mut block = Block::MISSING;
    let mut next_start = 0;

    for part in 1..=VOB_PARTS_MAX {
        let Some(name) = title_vob_part(title, part) else {
            break;
        };
        let fragment = locate(filesystem, &disc_path(&name), status);
        if !fragment.exists() {
            continue;
        }

        if block.exists() {
            if fragment.start != next_start {
                log::warn!("Hole in title {:02} before part {}", title, part);
                *status |= ExitStatus::MISMATCH;
            }
            block.size += fragment.size;
        } else {
            if part > 1 {
                log::warn!("Title {:02} part {} found without the parts before it", title, part);
                *status |= ExitStatus::MISMATCH;
            }
            block = fragment;
        }
        next_start = fragment.end();
    }

    block
}

#[cfg(test)]
#[path = "tests/discovery_tests.rs"]
mod tests;
