//! Raw image and device access.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use dvdimg_core::util::sectors_from_bytes;
use dvdimg_core::{DiscError, ReadSeek, SECTOR_SIZE, SectorSource};

/// Sector source over an unprotected image or device.
///
/// There is no descrambler behind this source: key requests succeed without
/// doing anything and reads return the stored bytes whether or not `decrypt`
/// is set. Scrambled sectors are caught downstream by the copy driver.
pub struct ImageSource<R> {
    reader: R,
}

impl<R: ReadSeek> ImageSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: ReadSeek> SectorSource for ImageSource<R> {
    fn request_key(&mut self, sector: u64) -> Result<(), DiscError> {
        log::debug!("No descrambler attached, sector {} is read as stored", sector);
        Ok(())
    }

    fn read_sector(&mut self, sector: u64, _decrypt: bool, buf: &mut [u8]) -> Result<(), DiscError> {
        read_sector_into(&mut self.reader, sector, buf)
    }
}

/// Read one sector at its absolute position.
pub(crate) fn read_sector_into<R: Read + Seek + ?Sized>(
    reader: &mut R,
    sector: u64,
    buf: &mut [u8],
) -> Result<(), DiscError> {
    reader.seek(SeekFrom::Start(sector * SECTOR_SIZE as u64))?;
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            DiscError::OutOfRange(sector)
        } else {
            DiscError::Io(e)
        }
    })
}

/// Size of an open image in whole sectors.
///
/// A trailing partial sector is warned about and dropped.
pub fn image_size_sectors<R: Seek + ?Sized>(reader: &mut R) -> Result<u64, DiscError> {
    let bytes = reader.seek(SeekFrom::End(0))?;
    let (sectors, remainder) = sectors_from_bytes(bytes);
    if remainder != 0 {
        log::warn!(
            "Disc size {} bytes is not a multiple of {} ({} bytes left over)",
            bytes,
            SECTOR_SIZE,
            remainder
        );
    }
    Ok(sectors)
}

/// Whole-disc size of the image or device at `path`, or `None` if it cannot
/// be determined. Works for regular files and block devices alike.
pub fn disc_size_sectors(path: &Path) -> Option<u64> {
    let result = File::open(path)
        .map_err(DiscError::from)
        .and_then(|mut file| image_size_sectors(&mut file));
    match result {
        Ok(sectors) => Some(sectors),
        Err(e) => {
            log::warn!("Cannot determine size of {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn patterned_image(sectors: usize) -> Vec<u8> {
        (0..sectors * SECTOR_SIZE)
            .map(|i| (i / SECTOR_SIZE) as u8 ^ (i % 251) as u8)
            .collect()
    }

    #[test]
    fn reads_sector_at_absolute_offset() {
        let data = patterned_image(4);
        let mut source = ImageSource::new(Cursor::new(data.clone()));
        let mut buf = vec![0u8; SECTOR_SIZE];
        source.read_sector(2, true, &mut buf).unwrap();
        assert_eq!(buf, &data[2 * SECTOR_SIZE..3 * SECTOR_SIZE]);
    }

    #[test]
    fn key_request_always_succeeds() {
        let mut source = ImageSource::new(Cursor::new(patterned_image(1)));
        assert!(source.request_key(0).is_ok());
        assert!(source.request_key(1_000_000).is_ok());
    }

    #[test]
    fn reading_past_end_is_out_of_range() {
        let mut source = ImageSource::new(Cursor::new(patterned_image(2)));
        let mut buf = vec![0u8; SECTOR_SIZE];
        let err = source.read_sector(2, false, &mut buf).unwrap_err();
        assert!(matches!(err, DiscError::OutOfRange(2)));
    }

    #[test]
    fn image_size_truncates_partial_sector() {
        let mut cursor = Cursor::new(vec![0u8; 3 * SECTOR_SIZE + 100]);
        assert_eq!(image_size_sectors(&mut cursor).unwrap(), 3);
    }

    #[test]
    fn disc_size_of_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&patterned_image(5)).unwrap();
        file.flush().unwrap();
        assert_eq!(disc_size_sectors(file.path()), Some(5));
    }

    #[test]
    fn disc_size_of_missing_path_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(disc_size_sectors(&dir.path().join("absent.iso")), None);
    }
}
