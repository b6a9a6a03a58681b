use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dvdimg_core::{ExitStatus, TitleReader};
use dvdimg_lib::settings::ExtractSettings;
use dvdimg_lib::{Disc, plan};

use crate::CliError;
use crate::cli_types::VerifyArgs;

/// Run the layout command: list title blocks and ordinary regions.
pub(crate) fn run_layout(
    settings: &ExtractSettings,
    disc_path: PathBuf,
    check: VerifyArgs,
) -> Result<ExitStatus, CliError> {
    let resolved = super::resolve(settings, &check, false)?;

    log::info!(
        "Reading layout of: {}",
        disc_path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    let mut disc = Disc::open(&disc_path)?;
    let mut reader = super::open_video_ts(&resolved)?;
    crate::log_blank();

    let report = {
        let mut access = disc.access(reader.as_mut().map(|r| r as &mut dyn TitleReader));
        plan(&mut access, resolved.options)?
    };

    super::print_summary(&report, report.status, false);
    Ok(report.status)
}
