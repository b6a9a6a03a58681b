//! Extraction of DVD-Video disc images.
//!
//! A run goes through four stages, strictly in sequence:
//!
//! 1. [`discovery`] resolves every title file through the disc filesystem
//!    into a [`TitleLayout`](dvdimg_core::TitleLayout)
//! 2. [`ordinary`] subtracts that layout from the whole disc, leaving the
//!    regions no title claims
//! 3. the title pass copies each title block, descrambling menu and title
//!    VOBs, optionally cross-checked by [`verify`]
//! 4. the ordinary pass copies the remaining regions verbatim
//!
//! [`extract`] sequences the stages; [`copy`] is the per-block driver both
//! passes share.

pub mod copy;
pub mod disc;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod ordinary;
pub mod progress;
pub mod settings;
pub mod verify;

#[cfg(test)]
mod test_support;

pub use copy::{BlockRole, CopyOutcome, CopySource, copy_block};
pub use disc::{Disc, DiscAccess, finish_image, open_image, open_reader};
pub use discovery::{Discovery, discover_layout};
pub use error::ExtractError;
pub use extract::{RunOptions, RunReport, extract, plan};
pub use ordinary::{OrdinaryRegions, derive_ordinary};
pub use progress::CopyProgress;
pub use settings::Settings;
