//! Accumulated run status.
//!
//! Each failure class owns a bit; bits are OR-ed together across the whole run
//! so one exit code can report several independent problems at once.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ExitStatus(u8);

impl ExitStatus {
    pub const SUCCESS: ExitStatus = ExitStatus(0);
    /// Bad invocation; covers every bit
    pub const USAGE: ExitStatus = ExitStatus(0xFF);
    /// Disc or image could not be opened; covers bits 0-6
    pub const OPEN: ExitStatus = ExitStatus(0x7F);
    pub const IO: ExitStatus = ExitStatus(1 << 6);
    pub const MISMATCH: ExitStatus = ExitStatus(1 << 5);
    pub const MEM: ExitStatus = ExitStatus(1 << 4);
    /// No title domain was processed
    pub const NOP: ExitStatus = ExitStatus(1 << 3);
    /// A key could not be obtained or a sector stayed scrambled
    pub const UNDECRYPTED: ExitStatus = ExitStatus(1 << 0);

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        self.0 == 0
    }

    /// Whether every bit of `other` is set.
    pub fn contains(&self, other: ExitStatus) -> bool {
        self.0 & other.0 == other.0
    }

    /// Clear the bits of `other`.
    pub fn remove(&mut self, other: ExitStatus) {
        self.0 &= !other.0;
    }

    /// Names of the single-bit classes present, for log output.
    pub fn describe(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.contains(Self::USAGE) {
            names.push("usage");
            return names;
        }
        if self.contains(Self::OPEN) {
            names.push("open");
            return names;
        }
        for (flag, name) in [
            (Self::IO, "io"),
            (Self::MISMATCH, "mismatch"),
            (Self::MEM, "memory"),
            (Self::NOP, "nothing done"),
            (Self::UNDECRYPTED, "undecrypted"),
        ] {
            if self.contains(flag) {
                names.push(name);
            }
        }
        names
    }
}

impl BitOr for ExitStatus {
    type Output = ExitStatus;

    fn bitor(self, rhs: ExitStatus) -> ExitStatus {
        ExitStatus(self.0 | rhs.0)
    }
}

impl BitOrAssign for ExitStatus {
    fn bitor_assign(&mut self, rhs: ExitStatus) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            write!(f, "success")
        } else {
            write!(f, "{} (0x{:02x})", self.describe().join(", "), self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_accumulate() {
        let mut status = ExitStatus::SUCCESS;
        status |= ExitStatus::IO;
        status |= ExitStatus::MISMATCH;
        assert!(status.contains(ExitStatus::IO));
        assert!(status.contains(ExitStatus::MISMATCH));
        assert!(!status.contains(ExitStatus::MEM));
        assert_eq!(status.bits(), 0x60);
    }

    #[test]
    fn open_and_usage_cover_lower_bits() {
        assert!(ExitStatus::OPEN.contains(ExitStatus::IO));
        assert!(ExitStatus::USAGE.contains(ExitStatus::OPEN));
        assert_eq!(ExitStatus::USAGE.bits(), 0xFF);
    }

    #[test]
    fn remove_clears_only_named_bits() {
        let mut status = ExitStatus::NOP | ExitStatus::IO;
        status.remove(ExitStatus::NOP);
        assert_eq!(status, ExitStatus::IO);
    }

    #[test]
    fn display_lists_classes() {
        assert_eq!(ExitStatus::SUCCESS.to_string(), "success");
        assert_eq!(
            (ExitStatus::IO | ExitStatus::UNDECRYPTED).to_string(),
            "io, undecrypted (0x41)"
        );
        assert_eq!(ExitStatus::OPEN.to_string(), "open (0x7f)");
    }
}
