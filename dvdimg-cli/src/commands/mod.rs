pub(crate) mod extract;
pub(crate) mod layout;

use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dvdimg_core::ExitStatus;
use dvdimg_core::util::format_bytes_approx;
use dvdimg_core::SECTOR_SIZE;
use dvdimg_lib::settings::ExtractSettings;
use dvdimg_lib::{RunOptions, RunReport, open_reader};
use dvdimg_video::VideoTsDir;

use crate::CliError;
use crate::cli_types::VerifyArgs;

/// Options for one run after merging flags over the settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub options: RunOptions,
    /// Directory to verify against; set only when verification is on
    pub video_ts: Option<PathBuf>,
}

/// Merge command-line flags over the settings file.
pub(crate) fn resolve(
    settings: &ExtractSettings,
    check: &VerifyArgs,
    decrypt_via_reader: bool,
) -> Result<Resolved, CliError> {
    let defaults = settings.run_options();
    let options = RunOptions {
        verify: check.verify || defaults.verify,
        decrypt_via_reader: decrypt_via_reader || defaults.decrypt_via_reader,
    };
    let dir = check.video_ts.clone().or_else(|| settings.video_ts_dir.clone());

    if !options.verifies() {
        if let Some(dir) = dir {
            log::debug!("Not verifying, ignoring {}", dir.display());
        }
        return Ok(Resolved {
            options,
            video_ts: None,
        });
    }

    match dir {
        Some(dir) => Ok(Resolved {
            options,
            video_ts: Some(dir),
        }),
        None => Err(CliError::usage(
            "--verify needs a VIDEO_TS directory (--video-ts or video_ts_dir in the settings file)",
        )),
    }
}

/// Open the verification directory, if any.
pub(crate) fn open_video_ts(resolved: &Resolved) -> Result<Option<VideoTsDir>, CliError> {
    match &resolved.video_ts {
        Some(dir) => {
            log::info!(
                "Verifying against: {}",
                dir.display().if_supports_color(Stdout, |t| t.cyan()),
            );
            Ok(Some(open_reader(dir)?))
        }
        None => Ok(None),
    }
}

fn sectors_text(sectors: u64) -> String {
    format!(
        "{} sectors ({})",
        sectors,
        format_bytes_approx(sectors * SECTOR_SIZE as u64)
    )
}

/// Print what a run found, and for extractions what it wrote.
pub(crate) fn print_summary(report: &RunReport, status: ExitStatus, wrote: bool) {
    crate::log_blank();
    log::info!(
        "{} title sets, {} in title files",
        report.titles_found.if_supports_color(Stdout, |t| t.bold()),
        sectors_text(report.layout.total_sectors()),
    );
    if report.degraded {
        log::warn!(
            "{}",
            "Disc size unknown: ordinary regions left out".if_supports_color(Stdout, |t| t.yellow()),
        );
    } else {
        log::info!(
            "{} ordinary regions, {}",
            report.ordinary.len(),
            sectors_text(report.ordinary.total_sectors()),
        );
    }

    if wrote {
        log::info!("Written: {}", sectors_text(report.sectors_written));
        if report.undecrypted_sectors > 0 {
            log::warn!(
                "{} sectors are still scrambled",
                report
                    .undecrypted_sectors
                    .if_supports_color(Stdout, |t| t.yellow()),
            );
        }
    }

    if status.is_success() {
        log::info!("{}", "Done".if_supports_color(Stdout, |t| t.green()));
    } else {
        log::warn!(
            "Finished with problems: {}",
            status.if_supports_color(Stdout, |t| t.red()),
        );
    }
}
