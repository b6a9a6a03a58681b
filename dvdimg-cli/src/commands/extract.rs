use std::cell::RefCell;
use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dvdimg_core::{ExitStatus, TitleReader};
use dvdimg_lib::settings::ExtractSettings;
use dvdimg_lib::{CopyProgress, Disc, extract, finish_image, open_image};

use crate::CliError;
use crate::cli_types::VerifyArgs;

/// Renders [`CopyProgress`] events as one progress bar per block.
struct BlockProgress {
    quiet: bool,
    bar: RefCell<Option<(String, ProgressBar)>>,
}

impl BlockProgress {
    fn new(quiet: bool) -> Self {
        Self {
            quiet,
            bar: RefCell::new(None),
        }
    }

    fn new_bar(&self) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(100);
        pb.set_style(
            ProgressStyle::with_template("  {msg:<28} [{bar:40.cyan/blue}] {pos:>3}%")
                .expect("static pattern")
                .progress_chars("=> "),
        );
        pb
    }

    fn handle(&self, event: CopyProgress) {
        let mut current = self.bar.borrow_mut();
        match event {
            CopyProgress::Started { name, sectors } => {
                if let Some((_, stale)) = current.take() {
                    stale.finish_and_clear();
                }
                log::debug!("{}: {} sectors", name, sectors);
                let pb = self.new_bar();
                pb.set_message(name.clone());
                *current = Some((name, pb));
            }
            CopyProgress::Advanced { percent } => {
                if let Some((_, pb)) = current.as_ref() {
                    pb.set_position(u64::from(percent));
                }
            }
            CopyProgress::Finished => {
                if let Some((name, pb)) = current.take() {
                    pb.finish_and_clear();
                    log::info!(
                        "  {} {}",
                        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                        name
                    );
                }
            }
            CopyProgress::Aborted => {
                if let Some((name, pb)) = current.take() {
                    pb.abandon();
                    log::warn!(
                        "  {} {} stopped early",
                        "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                        name
                    );
                }
            }
        }
    }

    fn clear(&self) {
        if let Some((_, pb)) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

/// Run the extract command: copy the disc into `image_path`.
pub(crate) fn run_extract(
    settings: &ExtractSettings,
    disc_path: PathBuf,
    image_path: PathBuf,
    decrypt_via_reader: bool,
    check: VerifyArgs,
    quiet: bool,
) -> Result<ExitStatus, CliError> {
    let resolved = super::resolve(settings, &check, decrypt_via_reader)?;

    log::info!(
        "Copying {} to {}",
        disc_path.display().if_supports_color(Stdout, |t| t.cyan()),
        image_path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    if resolved.options.decrypt_via_reader {
        log::info!(
            "{}",
            "Menu and title VOBs are read from the VIDEO_TS directory"
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let mut disc = Disc::open(&disc_path)?;
    let mut reader = super::open_video_ts(&resolved)?;
    let mut image = open_image(&image_path)?;
    crate::log_blank();

    let progress = BlockProgress::new(quiet);
    let result = {
        let mut access = disc.access(reader.as_mut().map(|r| r as &mut dyn TitleReader));
        extract(&mut access, &mut image, resolved.options, &|event| {
            progress.handle(event)
        })
    };
    progress.clear();
    let report = result?;

    let status = report.status | finish_image(image);
    super::print_summary(&report, status, true);
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_tracks_one_block_at_a_time() {
        let progress = BlockProgress::new(true);
        progress.handle(CopyProgress::started("Title 01 VOBS", 4));
        progress.handle(CopyProgress::Advanced { percent: 50 });
        assert_eq!(
            progress.bar.borrow().as_ref().map(|(name, _)| name.clone()),
            Some("Title 01 VOBS".to_string())
        );

        progress.handle(CopyProgress::Finished);
        assert!(progress.bar.borrow().is_none());

        progress.handle(CopyProgress::started("Block 00000000-00000010", 16));
        progress.handle(CopyProgress::Aborted);
        assert!(progress.bar.borrow().is_none());
    }

    #[test]
    fn new_block_replaces_unfinished_bar() {
        let progress = BlockProgress::new(true);
        progress.handle(CopyProgress::started("Title 00 INFO", 2));
        progress.handle(CopyProgress::started("Title 00 IBUP", 2));
        assert_eq!(
            progress.bar.borrow().as_ref().map(|(name, _)| name.clone()),
            Some("Title 00 IBUP".to_string())
        );
        progress.clear();
        assert!(progress.bar.borrow().is_none());
    }
}
