//! Batch integration tests
//!
//! Runs whole trace directories through the batch driver using temporary
//! directories and checks the written ancestor tables.

use cutrace_lib::batch::{process_file, run_batch, BatchConfig};
use cutrace_lib::partition::{Point, SplitOperation};
use cutrace_lib::trace::read_ancestor_records_from;
use std::fs;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::*;

// ============================================================================
// Helper Functions
// ============================================================================

/// Create input and output directories inside one temp dir
fn setup() -> (TempDir, BatchConfig) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let input = temp.path().join("split_csv");
    fs::create_dir(&input).expect("Failed to create input dir");
    let output = temp.path().join("datasets");
    let config = BatchConfig::new(input, output);
    (temp, config)
}

// ============================================================================
// Single File
// ============================================================================

#[test]
fn test_process_file_writes_deduplicated_table() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let input = write_trace(
        temp.path(),
        "trace.csv",
        &[
            trace_row("0", 0, 0, 64, 64, 1),
            trace_row("0", 64, 0, 64, 64, 1),
            trace_row("1", 0, 0, 128, 128, 0),
        ],
    );
    let output = temp.path().join("out.csv");

    let report = process_file(&input, &output, true).expect("Should process");
    assert_eq!(report.rows_read, 3);
    assert_eq!(report.rows_skipped, 0);
    assert_eq!(report.records_written, 4);

    assert_eq!(
        read_lines(&output),
        vec![
            ANCESTOR_HEADER.to_string(),
            "0,\"0,0\",128*128,QT".to_string(),
            "0,\"0,0\",64*64,Non_split".to_string(),
            "0,\"64,0\",64*64,Non_split".to_string(),
            "1,\"0,0\",128*128,Non_split".to_string(),
        ]
    );
}

#[test]
fn test_process_file_skips_bad_rows() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let input = write_trace(
        temp.path(),
        "trace.csv",
        &[
            trace_row("0", 0, 0, 64, 64, 1),
            "0,\"oops\",64*64,1".to_string(),
            trace_row("0", 0, 0, 64, 64, 7),
            trace_row("0", 0, 0, 16, 16, 1),
            trace_row("0", 0, 0, 64, 64, -1),
        ],
    );
    let output = temp.path().join("out.csv");

    let report = process_file(&input, &output, false).expect("Should process");
    assert_eq!(report.rows_read, 5);
    assert_eq!(report.rows_skipped, 4);
    let skipped: Vec<usize> = report.failures.iter().map(|f| f.row).collect();
    assert_eq!(skipped, vec![2, 3, 4, 5]);
    assert!(report.failures[0].message.starts_with("Record format error"));
    assert!(report.failures[1].message.starts_with("Decode error"));
    assert!(report.failures[2].message.starts_with("Geometry mismatch"));
    assert!(report.failures[3].message.starts_with("Decode error"));

    assert_eq!(report.records_written, 2);
}

#[test]
fn test_output_reads_back() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let ops = [
        SplitOperation::QuadSplit,
        SplitOperation::TernaryVertical,
        SplitOperation::BinaryHorizontal,
    ];
    let rows: Vec<String> = [(0, 0), (20, 0), (40, 40), (60, 100)]
        .iter()
        .filter_map(|&(x, y)| consistent_row("9", Point::new(x, y), &ops))
        .collect();
    assert_eq!(rows.len(), 4);

    let input = write_trace(temp.path(), "trace.csv", &rows);
    let output = temp.path().join("out.csv");
    let report = process_file(&input, &output, true).expect("Should process");

    let records = read_ancestor_records_from(fs::File::open(&output).unwrap()).unwrap();
    assert_eq!(records.len(), report.records_written);
    assert_eq!(records.iter().filter(|r| r.is_leaf()).count(), 4);
    assert!(records.iter().all(|r| r.frame_id == "9"));
}

// ============================================================================
// Directories
// ============================================================================

#[test]
fn test_run_batch_processes_matching_files() {
    let (_temp, config) = setup();
    write_trace(&config.input_dir, "a.csv", &[trace_row("0", 0, 0, 64, 64, 1)]);
    write_trace(&config.input_dir, "B.CSV", &[trace_row("3", 128, 0, 128, 128, 0)]);
    fs::write(config.input_dir.join("notes.txt"), "not a trace").unwrap();

    let report = run_batch(&config).expect("Batch should run");
    assert_eq!(report.files.len(), 2);
    assert_eq!(report.files_processed(), 2);
    assert_eq!(report.files_failed(), 0);
    assert_eq!(report.records_written(), 3);

    assert!(config.output_dir.join("a.csv").exists());
    assert!(config.output_dir.join("B.CSV").exists());
    assert!(!config.output_dir.join("notes.txt").exists());

    assert_eq!(
        read_lines(&config.output_dir.join("B.CSV")),
        vec![
            ANCESTOR_HEADER.to_string(),
            "3,\"128,0\",128*128,Non_split".to_string(),
        ]
    );
}

#[test]
fn test_run_batch_creates_nested_output_dir() {
    let (temp, config) = setup();
    let config = BatchConfig::new(&config.input_dir, temp.path().join("deep").join("out"));
    write_trace(&config.input_dir, "a.csv", &[trace_row("0", 0, 0, 128, 128, 0)]);

    let report = run_batch(&config).expect("Batch should run");
    assert_eq!(report.files_processed(), 1);
    assert!(config.output_dir.join("a.csv").exists());
}

#[test]
fn test_run_batch_isolates_broken_file() {
    let (_temp, config) = setup();
    write_trace(&config.input_dir, "good.csv", &[trace_row("0", 0, 0, 128, 128, 0)]);
    fs::write(
        config.input_dir.join("headless.csv"),
        "0,\"0,0\",128*128,0\n",
    )
    .unwrap();

    let report = run_batch(&config.clone().with_parallel(false)).expect("Batch should run");
    assert_eq!(report.files.len(), 2);
    assert_eq!(report.files_processed(), 1);
    assert_eq!(report.files_failed(), 1);

    let broken = report
        .files
        .iter()
        .find(|f| !f.is_ok())
        .expect("One file should fail");
    assert!(broken.input.ends_with("headless.csv"));
    assert!(broken.error.as_deref().unwrap_or("").contains("Missing column"));
}

#[test]
fn test_run_batch_empty_trace_writes_header() {
    let (_temp, config) = setup();
    write_trace(&config.input_dir, "empty.csv", &[]);

    let report = run_batch(&config).expect("Batch should run");
    assert_eq!(report.files_processed(), 1);
    assert_eq!(
        read_lines(&config.output_dir.join("empty.csv")),
        vec![ANCESTOR_HEADER.to_string()]
    );
}

#[test]
fn test_run_batch_missing_input_dir() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let config = BatchConfig::new(temp.path().join("absent"), temp.path().join("out"));
    assert!(run_batch(&config).is_err());
}

#[test]
fn test_run_batch_parallel_matches_sequential() {
    let (temp, config) = setup();
    let ops = [SplitOperation::QuadSplit, SplitOperation::QuadSplit];
    let mut rows = Vec::new();
    for poc in 0..4 {
        for y in (0..256).step_by(32) {
            for x in (0..384).step_by(32) {
                if let Some(row) = consistent_row(&poc.to_string(), Point::new(x, y), &ops) {
                    rows.push(row);
                }
            }
        }
    }
    write_trace(&config.input_dir, "big.csv", &rows);

    let sequential = BatchConfig::new(&config.input_dir, temp.path().join("seq")).with_parallel(false);
    let parallel = BatchConfig::new(&config.input_dir, temp.path().join("par"));
    run_batch(&sequential).expect("Sequential batch");
    run_batch(&parallel).expect("Parallel batch");

    let seq_out = fs::read_to_string(sequential.output_dir.join("big.csv")).unwrap();
    let par_out = fs::read_to_string(parallel.output_dir.join("big.csv")).unwrap();
    assert_eq!(seq_out, par_out);
    // 4 frames x 6 CTUs x (1 + 4 + 16)
    assert_eq!(seq_out.lines().count(), 1 + 4 * 6 * 21);
}
