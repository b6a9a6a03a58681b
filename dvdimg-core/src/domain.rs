/// The structural role a title file plays on the disc.
///
/// Variants are listed in on-disc order: a title set is laid out as its
/// information file, menu VOBs, title VOBs and finally the backup
/// information file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Navigation metadata (`.IFO`)
    Info,
    /// Menu video payload (`VIDEO_TS.VOB`, `VTS_tt_0.VOB`)
    MenuVobs,
    /// Title video payload (`VTS_tt_1.VOB` .. `VTS_tt_9.VOB`)
    TitleVobs,
    /// Redundant copy of the navigation metadata (`.BUP`)
    InfoBackup,
}

/// All domains in on-disc order.
const ALL_DOMAINS: &[Domain] = &[
    Domain::Info,
    Domain::MenuVobs,
    Domain::TitleVobs,
    Domain::InfoBackup,
];

impl Domain {
    /// Four-letter tag used in log lines (`INFO`, `MENU`, `VOBS`, `IBUP`).
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::MenuVobs => "MENU",
            Self::TitleVobs => "VOBS",
            Self::InfoBackup => "IBUP",
        }
    }

    /// Whether the domain carries scrambled video payload.
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::MenuVobs | Self::TitleVobs)
    }

    /// All four domains in on-disc order.
    pub fn all() -> &'static [Domain] {
        ALL_DOMAINS
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_disc_order() {
        assert_eq!(
            Domain::all(),
            &[
                Domain::Info,
                Domain::MenuVobs,
                Domain::TitleVobs,
                Domain::InfoBackup
            ]
        );
    }

    #[test]
    fn only_vob_domains_are_protected() {
        assert!(!Domain::Info.is_protected());
        assert!(Domain::MenuVobs.is_protected());
        assert!(Domain::TitleVobs.is_protected());
        assert!(!Domain::InfoBackup.is_protected());
    }

    #[test]
    fn display_uses_short_name() {
        assert_eq!(Domain::InfoBackup.to_string(), "IBUP");
    }
}
