//! dvdimg CLI
//!
//! Command-line interface for copying video DVDs into disc images.

mod cli_types;
mod commands;
mod error;
mod logger;

use clap::Parser;

use dvdimg_core::ExitStatus;
use dvdimg_lib::Settings;
use dvdimg_lib::settings::settings_path;

use cli_types::{Cli, Commands};
pub(crate) use error::CliError;

/// Emit an empty line through the logger.
pub(crate) fn log_blank() {
    log::info!("");
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version come through here too
            let status = if e.use_stderr() {
                ExitStatus::USAGE
            } else {
                ExitStatus::SUCCESS
            };
            let _ = e.print();
            std::process::exit(i32::from(status.bits()));
        }
    };

    let status = run(cli);
    log::logger().flush();
    std::process::exit(i32::from(status.bits()));
}

fn run(cli: Cli) -> ExitStatus {
    if let Err(e) = logger::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("dvdimg: {}", e);
        return e.status();
    }

    log::debug!("Settings file: {}", settings_path().display());
    let settings = Settings::load();

    let result = match cli.command {
        Commands::Layout { disc, check } => {
            commands::layout::run_layout(&settings.extract, disc, check)
        }
        Commands::Extract {
            disc,
            image,
            decrypt_via_reader,
            check,
        } => commands::extract::run_extract(
            &settings.extract,
            disc,
            image,
            decrypt_via_reader,
            check,
            cli.quiet,
        ),
    };

    match result {
        Ok(status) => status,
        Err(e) => {
            log::error!("{}", e);
            e.status()
        }
    }
}
