//! Common test utilities for cutrace integration tests
//!
//! Helpers for writing trace tables to disk and for building leaves whose
//! split path is known to be consistent with their geometry.

#![allow(dead_code)]

use cutrace_lib::partition::{ctu_root, encode, Point, Rectangle, SplitOperation};
use std::fs;
use std::path::{Path, PathBuf};

/// Header of an input trace table
pub const TRACE_HEADER: &str = "POC,\"Pos(x,y)\",Block_size(w*h),SplitSeries";

/// Header of an output ancestor table
pub const ANCESTOR_HEADER: &str = "POC,\"Pos(x,y)\",Block_size(w*h),Split_mode";

/// Format one trace row
pub fn trace_row(poc: &str, x: u32, y: u32, w: u32, h: u32, code: i128) -> String {
    format!("{},\"{},{}\",{}*{},{}", poc, x, y, w, h, code)
}

/// Write a trace table with the given rows and return its path
pub fn write_trace(dir: &Path, name: &str, rows: &[String]) -> PathBuf {
    let mut content = String::from(TRACE_HEADER);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }

    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write trace");
    path
}

/// Read a file into lines
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("Failed to read output")
        .lines()
        .map(|l| l.to_string())
        .collect()
}

/// Replay `ops` towards `target` and return the leaf rectangle, or `None`
/// if the path runs out of pixels
pub fn leaf_for(target: Point, ops: &[SplitOperation]) -> Option<Rectangle> {
    let mut current = ctu_root(target);
    for &op in ops {
        current = current.split_child(op, target).ok()?;
    }
    Some(current)
}

/// Trace row for a leaf reached by `ops` from the CTU holding `target`
pub fn consistent_row(poc: &str, target: Point, ops: &[SplitOperation]) -> Option<String> {
    let leaf = leaf_for(target, ops)?;
    let code = encode(ops).ok()?;
    Some(trace_row(poc, leaf.x, leaf.y, leaf.width, leaf.height, code))
}
