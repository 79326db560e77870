//! Batch processing of trace directories
//!
//! Every trace file in the input directory is expanded into its deduplicated
//! ancestor table and written under the same name into the output directory.
//! Row failures are skipped and reported; a file that cannot be read or
//! written is reported and the remaining files are still processed.

use crate::error::{Error, Result};
use crate::trace::{self, AncestorRecord, AncestorSet, TraceRow};
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Batch configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory scanned for trace files
    pub input_dir: PathBuf,
    /// Directory receiving the ancestor tables (created if missing)
    pub output_dir: PathBuf,
    /// File extension of trace files, matched case-insensitively
    pub extension: String,
    /// Process files and rows on the rayon pool
    pub parallel: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("split_csv"),
            output_dir: PathBuf::from("datasets"),
            extension: "csv".to_string(),
            parallel: true,
        }
    }
}

impl BatchConfig {
    /// Create a configuration for the given directories
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(input_dir: P, output_dir: Q) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Set the trace file extension (without the dot)
    pub fn with_extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.extension = extension.into();
        self
    }

    /// Enable or disable parallel processing
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check the configuration before touching the filesystem
    pub fn validate(&self) -> Result<()> {
        let extension = self.extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(Error::config("Trace file extension must not be empty"));
        }
        if self.input_dir == self.output_dir {
            return Err(Error::config(format!(
                "Output directory {} would overwrite the input traces",
                self.output_dir.display()
            )));
        }
        Ok(())
    }

    fn matches(&self, path: &Path) -> bool {
        let wanted = self.extension.trim_start_matches('.');
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(wanted))
            .unwrap_or(false)
    }
}

/// A skipped trace row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    /// Data row number, starting at 1
    pub row: usize,
    /// Why the row was skipped
    pub message: String,
}

/// Outcome of processing one trace file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Data rows found in the input
    pub rows_read: usize,
    /// Rows skipped because of row errors
    pub rows_skipped: usize,
    /// Distinct ancestor records written
    pub records_written: usize,
    pub failures: Vec<RowFailure>,
    /// Set when the whole file could not be processed
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl FileReport {
    fn failed(input: &Path, output: &Path, err: &Error) -> Self {
        Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            rows_read: 0,
            rows_skipped: 0,
            records_written: 0,
            failures: Vec::new(),
            error: Some(err.to_string()),
            elapsed_ms: 0,
        }
    }

    /// Whether the file was processed (row failures allowed)
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(err) => write!(f, "{}: FAILED ({})", self.input.display(), err),
            None => write!(
                f,
                "{} -> {}: {} rows, {} skipped, {} records ({}ms)",
                self.input.display(),
                self.output.display(),
                self.rows_read,
                self.rows_skipped,
                self.records_written,
                self.elapsed_ms
            ),
        }
    }
}

/// Outcome of a whole batch
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    /// Files processed successfully
    pub fn files_processed(&self) -> usize {
        self.files.iter().filter(|f| f.is_ok()).count()
    }

    /// Files that could not be processed
    pub fn files_failed(&self) -> usize {
        self.files.len() - self.files_processed()
    }

    /// Rows skipped over all files
    pub fn rows_skipped(&self) -> usize {
        self.files.iter().map(|f| f.rows_skipped).sum()
    }

    /// Records written over all files
    pub fn records_written(&self) -> usize {
        self.files.iter().map(|f| f.records_written).sum()
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for file in &self.files {
            writeln!(f, "{}", file)?;
            for failure in &file.failures {
                writeln!(f, "  row {}: {}", failure.row, failure.message)?;
            }
        }
        write!(
            f,
            "{} files processed, {} failed, {} rows skipped, {} records written",
            self.files_processed(),
            self.files_failed(),
            self.rows_skipped(),
            self.records_written()
        )
    }
}

/// Result of expanding the rows of one trace
#[derive(Debug, Default)]
pub struct Expansion {
    pub records: AncestorSet,
    pub failures: Vec<RowFailure>,
}

/// Expand trace rows into a deduplicated ancestor set
///
/// Rows are expanded independently (in parallel when requested) and merged in
/// row order, so the result matches sequential processing.
pub fn expand_rows(rows: Vec<TraceRow>, parallel: bool) -> Expansion {
    let expand = |row: TraceRow| (row.row, row.record.and_then(|leaf| leaf.ancestors()));

    let expanded: Vec<(usize, Result<Vec<AncestorRecord>>)> = if parallel {
        rows.into_par_iter().map(expand).collect()
    } else {
        rows.into_iter().map(expand).collect()
    };

    let mut expansion = Expansion::default();
    for (row, result) in expanded {
        match result {
            Ok(chain) => {
                debug!("Row {}: {} ancestors", row, chain.len());
                expansion.records.extend(chain);
            }
            Err(e) => {
                warn!("Skipping row {}: {}", row, e);
                expansion.failures.push(RowFailure {
                    row,
                    message: e.to_string(),
                });
            }
        }
    }

    expansion
}

/// Process one trace file into one ancestor table
pub fn process_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    parallel: bool,
) -> Result<FileReport> {
    let input = input.as_ref();
    let output = output.as_ref();
    let start = Instant::now();

    let rows = trace::read_leaf_records(input)?;
    let rows_read = rows.len();

    let expansion = expand_rows(rows, parallel);
    let records_written = trace::write_ancestors_to_path(output, expansion.records.iter())?;

    Ok(FileReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        rows_read,
        rows_skipped: expansion.failures.len(),
        records_written,
        failures: expansion.failures,
        error: None,
        elapsed_ms: start.elapsed().as_millis() as u64,
    })
}

/// Trace files in the input directory, sorted by file name
pub fn discover_inputs(config: &BatchConfig) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(&config.input_dir).map_err(|e| {
        Error::invalid_input(format!(
            "Cannot read input directory {}: {}",
            config.input_dir.display(),
            e
        ))
    })?;

    let mut inputs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && config.matches(&path) {
            inputs.push(path);
        }
    }
    inputs.sort();

    Ok(inputs)
}

/// Process every trace file of a directory
pub fn run_batch(config: &BatchConfig) -> Result<BatchReport> {
    config.validate()?;

    let inputs = discover_inputs(config)?;
    fs::create_dir_all(&config.output_dir)?;

    info!(
        "Found {} trace files in {}",
        inputs.len(),
        config.input_dir.display()
    );

    let run_one = |input: &PathBuf| -> FileReport {
        // discover_inputs only returns paths with a file name
        let output = match input.file_name() {
            Some(name) => config.output_dir.join(name),
            None => config.output_dir.clone(),
        };

        match process_file(input, &output, config.parallel) {
            Ok(report) => {
                info!("Processed {} -> {}", input.display(), output.display());
                report
            }
            Err(e) => {
                error!("Failed to process {}: {}", input.display(), e);
                FileReport::failed(input, &output, &e)
            }
        }
    };

    let files: Vec<FileReport> = if config.parallel {
        inputs.par_iter().map(run_one).collect()
    } else {
        inputs.iter().map(run_one).collect()
    };

    Ok(BatchReport { files })
}
