//! Trace CSV reader
//!
//! Input tables carry one leaf CU per row:
//!
//! ```text
//! POC,"Pos(x,y)",Block_size(w*h),SplitSeries
//! 0,"64,64",64*64,1
//! ```
//!
//! Extra columns are ignored. A malformed row is returned as an error in its
//! slot so that the caller can skip it and keep the rest of the trace.

use super::record::{AncestorRecord, LeafRecord};
use crate::error::{Error, Result};
use crate::partition::{Point, Rectangle, Size, SplitMode};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Columns every input table must have
pub const INPUT_COLUMNS: [&str; 4] = ["POC", "Pos(x,y)", "Block_size(w*h)", "SplitSeries"];

#[derive(Debug, Deserialize)]
struct LeafRow {
    #[serde(rename = "POC")]
    poc: String,
    #[serde(rename = "Pos(x,y)")]
    pos: String,
    #[serde(rename = "Block_size(w*h)")]
    block_size: String,
    #[serde(rename = "SplitSeries")]
    split_series: String,
}

#[derive(Debug, Deserialize)]
struct AncestorRow {
    #[serde(rename = "POC")]
    poc: String,
    #[serde(rename = "Pos(x,y)")]
    pos: String,
    #[serde(rename = "Block_size(w*h)")]
    block_size: String,
    #[serde(rename = "Split_mode")]
    split_mode: String,
}

/// One data row of a trace, numbered from 1
#[derive(Debug)]
pub struct TraceRow {
    pub row: usize,
    pub record: Result<LeafRecord>,
}

/// Read all leaf rows of a trace file
pub fn read_leaf_records<P: AsRef<Path>>(path: P) -> Result<Vec<TraceRow>> {
    let file = File::open(path.as_ref())?;
    read_leaf_records_from(file)
}

/// Read all leaf rows from any reader
///
/// Fails as a whole only on I/O errors or when a required column is missing.
pub fn read_leaf_records_from<R: Read>(reader: R) -> Result<Vec<TraceRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    check_columns(rdr.headers()?, &INPUT_COLUMNS)?;

    let mut rows = Vec::new();
    for (idx, result) in rdr.deserialize::<LeafRow>().enumerate() {
        let record = match result {
            Ok(row) => LeafRecord::parse(&row.poc, &row.pos, &row.block_size, &row.split_series),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => Err(Error::record_format(e.to_string())),
        };
        rows.push(TraceRow {
            row: idx + 1,
            record,
        });
    }

    Ok(rows)
}

/// Read a table previously written by [`super::writer::write_ancestors`]
pub fn read_ancestor_records_from<R: Read>(reader: R) -> Result<Vec<AncestorRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    check_columns(rdr.headers()?, &super::writer::OUTPUT_COLUMNS)?;

    let mut records = Vec::new();
    for result in rdr.deserialize::<AncestorRow>() {
        let row = result?;
        let position: Point = row.pos.parse()?;
        let size: Size = row.block_size.parse()?;
        let mode: SplitMode = row.split_mode.parse()?;
        records.push(AncestorRecord::new(
            row.poc,
            Rectangle::from_parts(position, size),
            mode,
        ));
    }

    Ok(records)
}

fn check_columns(headers: &csv::StringRecord, required: &[&str]) -> Result<()> {
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(Error::invalid_input(format!(
                "Missing column '{}' in header",
                column
            )));
        }
    }
    Ok(())
}
