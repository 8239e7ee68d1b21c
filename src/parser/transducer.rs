use super::tsv_handler::TsvHandler;
use super::xml_driver::{drive, xml_reader};
use crate::config::ResolvedConfig;
use crate::errors::{AppError, AppResult, StreamError};
use crate::models::RunSummary;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Converts one HEADER/ROW/COLUMN XML report into tab-separated lines.
///
/// Construction only records the path; the file is opened by [`Transducer::run`]
/// (or [`Transducer::run_to`]) and closed before it returns. Every run starts
/// from a fresh parse state, so a transducer can be run repeatedly.
///
/// # Example
///
/// ```no_run
/// use rmx_tsv::parser::Transducer;
///
/// # fn main() -> Result<(), rmx_tsv::errors::AppError> {
/// let summary = Transducer::new("report.xml")?.run()?;
/// eprintln!("{} lines", summary.records);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Transducer {
    input_path: PathBuf,
    config: ResolvedConfig,
}

impl Transducer {
    /// Creates a transducer for `input_path` with the default report dialect.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the path is empty. A missing file is not an
    /// error until the transducer runs.
    pub fn new(input_path: impl Into<PathBuf>) -> AppResult<Self> {
        Self::with_config(input_path, ResolvedConfig::default())
    }

    pub fn with_config(input_path: impl Into<PathBuf>, config: ResolvedConfig) -> AppResult<Self> {
        let input_path = input_path.into();
        if input_path.as_os_str().is_empty() {
            return Err(AppError::InvalidInput("Input path must not be empty".into()));
        }
        config.validate()?;
        Ok(Self { input_path, config })
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Converts the input file onto standard output.
    pub fn run(&self) -> AppResult<RunSummary> {
        let stdout = io::stdout();
        self.run_to(BufWriter::new(stdout.lock()))
    }

    /// Converts the input file into `out`.
    ///
    /// Output produced before a failure is flushed and left in place.
    ///
    /// # Errors
    ///
    /// - `Open` if the file cannot be opened
    /// - `Read` if reading fails part way
    /// - `Malformed` if the document is not well-formed, including truncation
    ///   detected at end of input
    /// - `Write` if `out` rejects a write
    pub fn run_to<W: Write>(&self, out: W) -> AppResult<RunSummary> {
        let start = Instant::now();
        info!(input = %self.input_path.display(), "Converting XML report");

        let file = File::open(&self.input_path).map_err(|source| AppError::Open {
            path: self.input_path.clone(),
            source,
        })?;
        let input = BufReader::with_capacity(self.config.read_buffer_capacity, file);

        match transduce(input, out, &self.config) {
            Ok(summary) => {
                info!(
                    input = %self.input_path.display(),
                    records = summary.records,
                    fields = summary.fields,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Conversion finished"
                );
                Ok(summary)
            }
            Err(e) => {
                debug!(input = %self.input_path.display(), error = %e, "Conversion failed");
                Err(e.at(&self.input_path))
            }
        }
    }
}

/// Streams `input` through the HEADER/ROW/COLUMN converter into `out`.
///
/// This is the path-less core of [`Transducer`]: one pass, events handled in
/// document order, memory bounded by the read buffer. `out` is flushed on both
/// success and failure.
pub fn transduce<R: BufRead, W: Write>(
    input: R,
    out: W,
    config: &ResolvedConfig,
) -> Result<RunSummary, StreamError> {
    let mut reader = xml_reader(input);
    let mut handler = TsvHandler::new(out, config);

    let driven = drive(&mut reader, &mut handler, config.read_buffer_capacity);
    let flushed = handler.flush();
    driven?;
    flushed.map_err(StreamError::Write)?;

    Ok(handler.summary())
}
