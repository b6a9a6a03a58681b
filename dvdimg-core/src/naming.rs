//! DVD-Video file naming.
//!
//! Title 0 is the video manager (`VIDEO_TS.*`); titles 1..=99 are title sets
//! (`VTS_tt_n.*`). Menu and information files use part 0, title VOBs are split
//! over parts 1..=9.

use crate::{Domain, TITLE_MAX, VOB_PARTS_MAX};

/// Directory holding every title file.
pub const VIDEO_TS_DIR: &str = "VIDEO_TS";

/// File name of the first (or only) file backing `domain` of `title`.
///
/// Returns `None` for combinations that do not exist: title 0 has no title
/// VOBs, and titles past [`TITLE_MAX`] have no files at all.
pub fn file_name(title: u8, domain: Domain) -> Option<String> {
    if title as usize >= TITLE_MAX {
        return None;
    }
    if title == 0 {
        return match domain {
            Domain::Info => Some("VIDEO_TS.IFO".to_string()),
            Domain::MenuVobs => Some("VIDEO_TS.VOB".to_string()),
            Domain::TitleVobs => None,
            Domain::InfoBackup => Some("VIDEO_TS.BUP".to_string()),
        };
    }
    match domain {
        Domain::Info => Some(format!("VTS_{:02}_0.IFO", title)),
        Domain::MenuVobs => Some(format!("VTS_{:02}_0.VOB", title)),
        Domain::TitleVobs => title_vob_part(title, 1),
        Domain::InfoBackup => Some(format!("VTS_{:02}_0.BUP", title)),
    }
}

/// File name of part `part` (1-based) of a title's VOB set.
pub fn title_vob_part(title: u8, part: u8) -> Option<String> {
    if title == 0 || title as usize >= TITLE_MAX || part == 0 || part > VOB_PARTS_MAX {
        return None;
    }
    Some(format!("VTS_{:02}_{}.VOB", title, part))
}

/// Absolute path of `name` inside the disc filesystem (`/VIDEO_TS/<name>`).
pub fn disc_path(name: &str) -> String {
    format!("/{}/{}", VIDEO_TS_DIR, name)
}
