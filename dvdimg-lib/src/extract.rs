//! Run orchestration: discovery, ordinary regions, title pass, ordinary pass.

use std::io::{Seek, Write};

use dvdimg_core::{
    Block, BlockList, Domain, ExitStatus, TITLE_MAX, TitleFile, TitleLayout, TitleReader,
};

use crate::copy::{BlockRole, CopyOutcome, CopySource, copy_block};
use crate::disc::DiscAccess;
use crate::discovery::discover_layout;
use crate::error::ExtractError;
use crate::ordinary::derive_ordinary;
use crate::progress::CopyProgress;
use crate::verify::check_domain;

/// Options for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Cross-check every title and domain against the independent reader
    pub verify: bool,
    /// Read menu and title VOBs through the independent reader instead of
    /// the disc; implies `verify`
    pub decrypt_via_reader: bool,
}

impl RunOptions {
    /// Whether the independent reader is consulted at all.
    pub fn verifies(&self) -> bool {
        self.verify || self.decrypt_via_reader
    }
}

/// Everything a run found and did.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub status: ExitStatus,
    pub titles_found: usize,
    pub layout: TitleLayout,
    pub ordinary: BlockList,
    pub sectors_written: u64,
    pub undecrypted_sectors: u64,
    /// The disc size was unknown and ordinary regions were left out
    pub degraded: bool,
}

impl RunReport {
    fn absorb(&mut self, outcome: CopyOutcome) {
        self.status |= outcome.status;
        self.sectors_written += outcome.sectors_written;
        self.undecrypted_sectors += outcome.undecrypted_sectors;
    }
}

/// Discover the layout and the ordinary regions.
fn prepare(disc: &mut DiscAccess<'_>, options: RunOptions) -> Result<RunReport, ExtractError> {
    if options.verifies() && disc.reader.is_none() {
        return Err(ExtractError::MissingReader);
    }

    let discovery = discover_layout(&mut *disc.filesystem);
    let ordinary = derive_ordinary(disc.disc_sectors, &discovery.layout)?;

    Ok(RunReport {
        status: discovery.status | ordinary.status,
        titles_found: discovery.titles_found,
        layout: discovery.layout,
        ordinary: ordinary.blocks,
        sectors_written: 0,
        undecrypted_sectors: 0,
        degraded: ordinary.degraded,
    })
}

/// Open a title file through the reader; failures count as absent.
fn open_title(
    reader: &mut dyn TitleReader,
    title: u8,
    domain: Domain,
    name: &str,
    status: &mut ExitStatus,
) -> Option<Box<dyn TitleFile>> {
    match reader.open(title, domain) {
        Ok(file) => file,
        Err(e) => {
            log::error!("{}: opening through the reader failed ({})", name, e);
            *status |= ExitStatus::IO;
            None
        }
    }
}

fn title_name(title: u8, domain: Domain) -> String {
    format!("Title {:02} {}", title, domain)
}

fn ordinary_name(block: Block) -> String {
    format!("Block {:08x}-{:08x}", block.start, block.end())
}

/// Discover and report the layout without writing anything.
///
/// With verification enabled, every title and domain is also checked
/// against the independent reader.
pub fn plan(disc: &mut DiscAccess<'_>, options: RunOptions) -> Result<RunReport, ExtractError> {
    let mut report = prepare(disc, options)?;

    for (title, domain, block) in report.layout.entries() {
        if block.exists() {
            log::info!("{} {}", title_name(title, domain), block);
        }
    }
    for block in &report.ordinary {
        log::info!("Block {}", block);
    }

    if options.verifies() {
        if let Some(reader) = disc.reader.as_deref_mut() {
            for (title, domain, block) in report.layout.entries() {
                let name = title_name(title, domain);
                let file = open_title(reader, title, domain, &name, &mut report.status);
                report.status |= check_domain(&name, block, file.as_deref());
            }
        }
    }

    Ok(report)
}

/// Run a full extraction into `output`.
///
/// Title blocks are copied first (menu and title VOBs descrambled), then
/// every ordinary region verbatim. Only open, usage and resource failures
/// end the run early; everything else is accumulated in the report status.
pub fn extract<W: Write + Seek + ?Sized>(
    disc: &mut DiscAccess<'_>,
    output: &mut W,
    options: RunOptions,
    progress: &dyn Fn(CopyProgress),
) -> Result<RunReport, ExtractError> {
    let mut report = prepare(disc, options)?;

    copy_titles(disc, output, options, progress, &mut report);
    copy_ordinary(disc, output, progress, &mut report);

    if report.degraded {
        log::warn!("The image holds title blocks only; ordinary regions were not copied");
    }
    log::debug!(
        "{} sectors written, {} left scrambled, status {}",
        report.sectors_written,
        report.undecrypted_sectors,
        report.status
    );
    Ok(report)
}

fn copy_titles<W: Write + Seek + ?Sized>(
    disc: &mut DiscAccess<'_>,
    output: &mut W,
    options: RunOptions,
    progress: &dyn Fn(CopyProgress),
    report: &mut RunReport,
) {
    let mut processed = false;

    for title in 0..TITLE_MAX as u8 {
        for &domain in Domain::all() {
            let block = report.layout.block(title, domain);
            let name = title_name(title, domain);

            let mut file = None;
            if options.verifies() {
                if let Some(reader) = disc.reader.as_deref_mut() {
                    file = open_title(reader, title, domain, &name, &mut report.status);
                    report.status |= check_domain(&name, block, file.as_deref());
                }
            }

            if !block.exists() {
                continue;
            }
            if domain == Domain::Info {
                log::info!("TITLE {:02}", title);
            }
            processed = true;

            // A block the reader cannot open is still copied from the disc;
            // the mismatch was recorded above.
            let role = BlockRole::for_domain(domain);
            let source = match file.as_deref_mut() {
                Some(file) if role.decrypts() && options.decrypt_via_reader => {
                    CopySource::TitleFile(file)
                }
                _ => CopySource::Engine(&mut *disc.engine),
            };
            let outcome = copy_block(source, role, block, &name, output, progress);
            if !outcome.status.is_success() {
                log::warn!("{}: partial copy ({})", name, outcome.status);
            }
            report.absorb(outcome);
        }
    }

    if !processed {
        log::warn!("No title domain was processed");
        report.status |= ExitStatus::NOP;
    }
}

fn copy_ordinary<W: Write + Seek + ?Sized>(
    disc: &mut DiscAccess<'_>,
    output: &mut W,
    progress: &dyn Fn(CopyProgress),
    report: &mut RunReport,
) {
    log::info!("BLOCKS");
    let blocks: Vec<Block> = report.ordinary.iter().copied().collect();
    let mut failed = false;

    for block in blocks {
        let outcome = copy_block(
            CopySource::Engine(&mut *disc.engine),
            BlockRole::Ordinary,
            block,
            &ordinary_name(block),
            output,
            progress,
        );
        failed |= !outcome.status.is_success();
        report.absorb(outcome);
    }

    if failed {
        log::error!("Error while copying ordinary blocks");
    }
}

#[cfg(test)]
#[path = "tests/extract_tests.rs"]
mod tests;
