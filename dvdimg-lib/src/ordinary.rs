//! Ordinary regions: the sectors no title claims.

use dvdimg_core::{BlockList, BlockListError, ExitStatus, Subtraction, TitleLayout};

/// Outcome of deriving the ordinary regions.
#[derive(Debug, Clone, Default)]
pub struct OrdinaryRegions {
    pub blocks: BlockList,
    /// `MISMATCH` when a title block could not be cut out
    pub status: ExitStatus,
    /// The disc size was unknown, so no ordinary region will be copied
    pub degraded: bool,
}

/// Subtract every block of `layout` from a disc of `disc_sectors` sectors.
///
/// Blocks that do not fit inside a single remaining region are reported and
/// skipped; every other block is still subtracted. With an unknown disc size
/// the list stays empty and the result is marked degraded.
///
/// # Errors
/// Only allocation failure while splitting a region, which aborts the run.
pub fn derive_ordinary(
    disc_sectors: Option<u64>,
    layout: &TitleLayout,
) -> Result<OrdinaryRegions, BlockListError> {
    let Some(total) = disc_sectors else {
        log::error!("Cannot determine the size of the disc; only title blocks will be copied");
        return Ok(OrdinaryRegions {
            degraded: true,
            ..Default::default()
        });
    };
    log::debug!("Disc ends at 0x{:08x}", total);

    let mut blocks = BlockList::whole(total);
    let mut status = ExitStatus::SUCCESS;
    for (title, domain, block) in layout.entries() {
        if blocks.subtract(block)? == Subtraction::NotContained {
            log::warn!("Title {:02} {}: block mismatch", title, domain);
            status |= ExitStatus::MISMATCH;
        }
    }

    Ok(OrdinaryRegions {
        blocks,
        status,
        degraded: false,
    })
}
