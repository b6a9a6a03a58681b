//! Console logger with an optional plain-text log file.
//!
//! `info` and `debug` records go to stdout, `warn` and `error` to stderr
//! prefixed with the program name. Every record that passes the level filter
//! is also appended to the log file with ANSI color codes removed.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use crate::CliError;

const PROGRAM: &str = "dvdimg";

pub(crate) struct CliLogger {
    level: LevelFilter,
    verbose: bool,
    started: Instant,
    file: Option<Mutex<File>>,
}

impl CliLogger {
    pub(crate) fn new(quiet: bool, verbose: bool, file: Option<File>) -> Self {
        let level = if verbose {
            LevelFilter::Debug
        } else if quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        };
        Self {
            level,
            verbose,
            started: Instant::now(),
            file: file.map(Mutex::new),
        }
    }

    pub(crate) fn level(&self) -> LevelFilter {
        self.level
    }

    /// The console text for a record, without the trailing newline.
    fn format_line(&self, record: &Record) -> String {
        let mut line = String::new();
        if self.verbose {
            let elapsed = self.started.elapsed();
            line.push_str(&format!(
                "[{:>4}.{:03}] ",
                elapsed.as_secs(),
                elapsed.subsec_millis()
            ));
        }
        match record.level() {
            Level::Error => line.push_str(&format!(
                "{}: {} ",
                PROGRAM,
                "error:".if_supports_color(Stderr, |t| t.red())
            )),
            Level::Warn => line.push_str(&format!("{}: ", PROGRAM)),
            _ => {}
        }
        line.push_str(&record.args().to_string());
        line
    }

    fn write_file(&self, line: &str) {
        let Some(file) = &self.file else {
            return;
        };
        if let Ok(mut file) = file.lock() {
            let plain = strip_ansi_escapes::strip(line);
            // A failing log file must not end the run.
            let _ = file.write_all(&plain);
            let _ = file.write_all(b"\n");
        }
    }
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format_line(record);
        if record.level() <= Level::Warn {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
        self.write_file(&line);
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

/// Install the logger for the whole process.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let file = logfile
        .map(|path| File::create(path).map_err(CliError::Logfile))
        .transpose()?;
    let logger = CliLogger::new(quiet, verbose, file);
    let level = logger.level();
    // Only fails if a logger is already installed, which leaves that one in place.
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
    Ok(())
}
