//! DVD-Video media access.
//!
//! Concrete collaborators for the extraction driver:
//!
//! - [`UdfReader`]: resolves `/VIDEO_TS/...` paths in a disc's UDF filesystem
//! - [`ImageSource`]: sector reads from a raw image or block device
//! - [`VideoTsDir`]: an independent view of the title files in a host directory

pub mod image;
pub mod udf;
pub mod video_ts;

pub use image::{ImageSource, disc_size_sectors, image_size_sectors};
pub use udf::UdfReader;
pub use video_ts::VideoTsDir;
