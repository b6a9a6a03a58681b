use std::io::{Read, Seek};

pub mod block;
pub mod domain;
pub mod error;
pub mod layout;
pub mod naming;
pub mod status;
pub mod util;

pub use block::{Block, BlockList, BlockListError, Subtraction};
pub use domain::Domain;
pub use error::DiscError;
pub use layout::{TitleBlocks, TitleLayout};
pub use status::ExitStatus;

/// Logical sector size of DVD media, in bytes.
pub const SECTOR_SIZE: usize = 2048;

/// Number of title slots: slot 0 is the video manager, 1..=99 are title sets.
pub const TITLE_MAX: usize = 100;

/// Highest part number a title VOB set may be split into (`VTS_tt_1.VOB` .. `VTS_tt_9.VOB`).
pub const VOB_PARTS_MAX: u8 = 9;

/// A reader that implements both Read and Seek.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// Where a file lives on the disc, as reported by the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileExtent {
    /// Absolute sector of the first byte of the file
    pub start_sector: u64,
    /// File length in bytes
    pub byte_length: u64,
}

impl FileExtent {
    pub fn new(start_sector: u64, byte_length: u64) -> Self {
        Self {
            start_sector,
            byte_length,
        }
    }
}

/// Resolves paths in the disc's embedded filesystem to sector extents.
pub trait FileLocator {
    /// Look up an absolute path such as `/VIDEO_TS/VTS_01_1.VOB`.
    ///
    /// # Returns
    /// * `Ok(Some(extent))` - The file exists
    /// * `Ok(None)` - No such file
    /// * `Err(DiscError)` - The filesystem could not be read
    fn find_file(&mut self, path: &str) -> Result<Option<FileExtent>, DiscError>;
}

/// Sector-addressed access to the disc, with optional descrambling.
///
/// Implementors that cannot descramble simply return the stored bytes when
/// `decrypt` is set. Failing to descramble is not an error; the copy driver
/// detects sectors that still look scrambled and reports them separately.
pub trait SectorSource {
    /// Obtain the title key covering `sector`.
    ///
    /// A failure here is reported but never aborts a copy: reads that follow
    /// return the raw data instead.
    fn request_key(&mut self, sector: u64) -> Result<(), DiscError>;

    /// Read exactly one sector into `buf` (`buf.len() == SECTOR_SIZE`).
    fn read_sector(&mut self, sector: u64, decrypt: bool, buf: &mut [u8]) -> Result<(), DiscError>;
}

/// An independent view of the title files, used to cross-check the layout.
pub trait TitleReader {
    /// Open the file(s) backing `domain` of `title`, or `Ok(None)` if absent.
    fn open(&mut self, title: u8, domain: Domain) -> Result<Option<Box<dyn TitleFile>>, DiscError>;
}

/// An open title/domain file from a [`TitleReader`].
pub trait TitleFile {
    /// Total length in bytes.
    fn size_bytes(&self) -> u64;

    /// Read block `index` (relative to the start of the file) into `buf`.
    ///
    /// Reads through a reader that descrambles return plaintext.
    fn read_block(&mut self, index: u64, buf: &mut [u8]) -> Result<(), DiscError>;
}
