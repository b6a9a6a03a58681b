//! Opening the disc, the verification directory and the output image.

use std::fs::{File, OpenOptions};
use std::path::Path;

use dvdimg_core::{DiscError, ExitStatus, FileLocator, SectorSource, TitleReader};
use dvdimg_video::{ImageSource, UdfReader, VideoTsDir, disc_size_sectors};

use crate::error::ExtractError;

/// Collaborators borrowed for one run.
pub struct DiscAccess<'a> {
    /// Resolves title file names to extents
    pub filesystem: &'a mut dyn FileLocator,
    /// Reads (and descrambles) sectors
    pub engine: &'a mut dyn SectorSource,
    /// Independent view of the title files, for verification
    pub reader: Option<&'a mut dyn TitleReader>,
    /// Whole-disc size; `None` when it could not be determined
    pub disc_sectors: Option<u64>,
}

/// A disc image or device opened for extraction.
pub struct Disc {
    filesystem: UdfReader<File>,
    engine: ImageSource<File>,
    size_sectors: Option<u64>,
}

impl Disc {
    /// Open `path` and read its UDF volume structure.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        let path = path.as_ref().to_path_buf();
        let open_error = |source: DiscError| ExtractError::OpenDisc {
            path: path.clone(),
            source,
        };

        let engine = File::open(&path).map_err(|e| open_error(e.into()))?;
        let filesystem = File::open(&path).map_err(|e| open_error(e.into()))?;
        let filesystem = UdfReader::open(filesystem).map_err(open_error)?;
        let size_sectors = disc_size_sectors(&path);

        Ok(Self {
            filesystem,
            engine: ImageSource::new(engine),
            size_sectors,
        })
    }

    pub fn size_sectors(&self) -> Option<u64> {
        self.size_sectors
    }

    /// Borrow the disc's collaborators for a run.
    pub fn access<'a>(&'a mut self, reader: Option<&'a mut dyn TitleReader>) -> DiscAccess<'a> {
        DiscAccess {
            filesystem: &mut self.filesystem,
            engine: &mut self.engine,
            reader,
            disc_sectors: self.size_sectors,
        }
    }
}

/// Open a `VIDEO_TS` directory to verify against.
pub fn open_reader(path: impl AsRef<Path>) -> Result<VideoTsDir, ExtractError> {
    let path = path.as_ref();
    VideoTsDir::open(path).map_err(|source| ExtractError::OpenReader {
        path: path.to_path_buf(),
        source,
    })
}

/// Open (or create) the output image without truncating it.
///
/// Every write lands at an absolute sector offset, so an existing image of
/// the same disc is updated in place.
pub fn open_image(path: impl AsRef<Path>) -> Result<File, ExtractError> {
    let path = path.as_ref();
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|source| ExtractError::OpenImage {
            path: path.to_path_buf(),
            source,
        })
}

/// Flush the image to stable storage and close it.
pub fn finish_image(image: File) -> ExitStatus {
    match image.sync_all() {
        Ok(()) => ExitStatus::SUCCESS,
        Err(e) => {
            log::error!("Closing of the image file failed ({})", e);
            ExitStatus::IO
        }
    }
}
