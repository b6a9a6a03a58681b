//! Cross-checking the discovered layout against an independent reader.

use dvdimg_core::util::sectors_from_bytes;
use dvdimg_core::{Block, ExitStatus, TitleFile};

/// Compare a discovered block with what the independent reader found.
///
/// The reader must have a file exactly when the block exists, and the file's
/// length in whole sectors must equal the block size. Disagreements are
/// logged and returned as `MISMATCH`.
pub fn check_domain(name: &str, block: Block, file: Option<&dyn TitleFile>) -> ExitStatus {
    let Some(file) = file else {
        if block.exists() {
            log::error!("{}: domain mismatch (not found by the reader)", name);
            return ExitStatus::MISMATCH;
        }
        return ExitStatus::SUCCESS;
    };

    if !block.exists() {
        log::error!("{}: domain mismatch (not found in the filesystem)", name);
        return ExitStatus::MISMATCH;
    }

    let (sectors, _) = sectors_from_bytes(file.size_bytes());
    if sectors != block.len() {
        log::error!("{}: size mismatch {} != {}", name, sectors, block.size);
        return ExitStatus::MISMATCH;
    }

    ExitStatus::SUCCESS
}
