//! Ancestor CSV writer

use super::record::AncestorRecord;
use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Output table header
pub const OUTPUT_COLUMNS: [&str; 4] = ["POC", "Pos(x,y)", "Block_size(w*h)", "Split_mode"];

#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    poc: &'a str,
    pos: String,
    block_size: String,
    split_mode: &'static str,
}

impl<'a> From<&'a AncestorRecord> for OutputRow<'a> {
    fn from(record: &'a AncestorRecord) -> Self {
        OutputRow {
            poc: &record.frame_id,
            pos: record.rect.position().to_string(),
            block_size: record.rect.size().to_string(),
            split_mode: record.mode.name(),
        }
    }
}

/// Write records to a CSV file, replacing it if it exists
pub fn write_ancestors_to_path<'a, P, I>(path: P, records: I) -> Result<usize>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a AncestorRecord>,
{
    let file = File::create(path.as_ref())?;
    write_ancestors(BufWriter::new(file), records)
}

/// Write the header and one row per record; returns the number of rows
///
/// The header is written even when there are no records.
pub fn write_ancestors<'a, W, I>(writer: W, records: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a AncestorRecord>,
{
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(OUTPUT_COLUMNS)?;

    let mut count = 0;
    for record in records {
        wtr.serialize(OutputRow::from(record))?;
        count += 1;
    }

    wtr.flush()?;
    Ok(count)
}
