//! CLI type definitions: command enum and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dvdimg")]
#[command(version)]
#[command(about = "Copy a video DVD into a descrambled disc image", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (sector addresses, file extents)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments controlling the cross-check against a `VIDEO_TS` directory.
#[derive(Args, Clone, Debug, Default)]
pub(crate) struct VerifyArgs {
    /// Check every title file against the VIDEO_TS directory
    #[arg(short = 'c', long)]
    pub verify: bool,

    /// VIDEO_TS directory to check against (defaults to the settings file)
    #[arg(long, value_name = "DIR")]
    pub video_ts: Option<PathBuf>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List the title blocks and ordinary regions of a disc
    Layout {
        /// Disc image or block device
        disc: PathBuf,

        #[command(flatten)]
        check: VerifyArgs,
    },

    /// Copy a disc into an image file
    Extract {
        /// Disc image or block device
        disc: PathBuf,

        /// Output image (created if missing, never truncated)
        image: PathBuf,

        /// Read menu and title VOBs from the VIDEO_TS directory (implies --verify)
        #[arg(short = 'r', long)]
        decrypt_via_reader: bool,

        #[command(flatten)]
        check: VerifyArgs,
    },
}
