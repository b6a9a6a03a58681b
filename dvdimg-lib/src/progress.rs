/// Progress of a single block copy.
///
/// Delivered through a `&dyn Fn(CopyProgress)` callback so frontends can
/// render it however they like; nothing in the driver depends on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyProgress {
    /// Copying of a block has started
    Started {
        /// Block name, e.g. "Title 01 VOBS" or "Block 00000000-00000100"
        name: String,
        /// Number of sectors to copy
        sectors: u64,
    },

    /// Whole percentage points done; sent at most once per point
    Advanced { percent: u8 },

    /// Every sector was copied
    Finished,

    /// The copy stopped early
    Aborted,
}

impl CopyProgress {
    pub fn started(name: impl Into<String>, sectors: u64) -> Self {
        Self::Started {
            name: name.into(),
            sectors,
        }
    }
}
