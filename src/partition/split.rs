//! Split operations and the split-series code
//!
//! An encoder trace tags every leaf CU with one integer holding the whole
//! root-to-leaf split path. Each operation occupies a 5-bit group; the
//! least-significant group is the split applied at the CTU root.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Number of bits per operation in a split series
pub const SPLIT_GROUP_BITS: u32 = 5;

const SPLIT_GROUP_MASK: i128 = (1 << SPLIT_GROUP_BITS) - 1;

/// Partition operation applied to a CU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitOperation {
    /// Four equal quadrants
    QuadSplit,
    /// Two stacked halves
    BinaryHorizontal,
    /// Two side-by-side halves
    BinaryVertical,
    /// Three stacked bands, 1:2:1
    TernaryHorizontal,
    /// Three side-by-side bands, 1:2:1
    TernaryVertical,
}

impl SplitOperation {
    /// All operations, in code order
    pub const ALL: [SplitOperation; 5] = [
        SplitOperation::QuadSplit,
        SplitOperation::BinaryHorizontal,
        SplitOperation::BinaryVertical,
        SplitOperation::TernaryHorizontal,
        SplitOperation::TernaryVertical,
    ];

    /// Look up the operation for one 5-bit group
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0b00001 => Some(SplitOperation::QuadSplit),
            0b00010 => Some(SplitOperation::BinaryHorizontal),
            0b00011 => Some(SplitOperation::BinaryVertical),
            0b00100 => Some(SplitOperation::TernaryHorizontal),
            0b00101 => Some(SplitOperation::TernaryVertical),
            _ => None,
        }
    }

    /// The 5-bit group for this operation
    pub fn bits(&self) -> u8 {
        match self {
            SplitOperation::QuadSplit => 0b00001,
            SplitOperation::BinaryHorizontal => 0b00010,
            SplitOperation::BinaryVertical => 0b00011,
            SplitOperation::TernaryHorizontal => 0b00100,
            SplitOperation::TernaryVertical => 0b00101,
        }
    }

    /// Name used in trace files
    pub fn name(&self) -> &'static str {
        match self {
            SplitOperation::QuadSplit => "QT",
            SplitOperation::BinaryHorizontal => "BT_H",
            SplitOperation::BinaryVertical => "BT_V",
            SplitOperation::TernaryHorizontal => "TT_H",
            SplitOperation::TernaryVertical => "TT_V",
        }
    }

    /// Check if this is a ternary (1:2:1) split
    pub fn is_ternary(&self) -> bool {
        matches!(
            self,
            SplitOperation::TernaryHorizontal | SplitOperation::TernaryVertical
        )
    }
}

impl fmt::Display for SplitOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Split mode recorded for one level of the partition tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitMode {
    /// The CU is divided by the given operation
    Split(SplitOperation),
    /// The CU is a leaf
    NonSplit,
}

impl SplitMode {
    /// Name used in trace files
    pub fn name(&self) -> &'static str {
        match self {
            SplitMode::Split(op) => op.name(),
            SplitMode::NonSplit => "Non_split",
        }
    }

    /// The operation, if this level is split
    pub fn operation(&self) -> Option<SplitOperation> {
        match self {
            SplitMode::Split(op) => Some(*op),
            SplitMode::NonSplit => None,
        }
    }
}

impl From<SplitOperation> for SplitMode {
    fn from(op: SplitOperation) -> Self {
        SplitMode::Split(op)
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SplitMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if name == "Non_split" {
            return Ok(SplitMode::NonSplit);
        }

        SplitOperation::ALL
            .iter()
            .find(|op| op.name() == name)
            .map(|op| SplitMode::Split(*op))
            .ok_or_else(|| Error::record_format(format!("Unknown split mode '{}'", s)))
    }
}

/// Decode a split series into operations in root-to-leaf order
///
/// `0` decodes to an empty path: the leaf is the CTU itself.
pub fn decode(code: i128) -> Result<Vec<SplitOperation>> {
    if code < 0 {
        return Err(Error::decode(format!("Negative split series {}", code)));
    }

    let mut ops = Vec::new();
    let mut remaining = code;
    while remaining > 0 {
        let group = (remaining & SPLIT_GROUP_MASK) as u8;
        let op = SplitOperation::from_bits(group).ok_or_else(|| {
            Error::decode(format!(
                "Unknown split group {:05b} at depth {} of {}",
                group,
                ops.len(),
                code
            ))
        })?;
        ops.push(op);
        remaining >>= SPLIT_GROUP_BITS;
    }

    Ok(ops)
}

/// Encode operations (root first) back into a split series
///
/// Fails if the path is too deep to fit the code width.
pub fn encode(ops: &[SplitOperation]) -> Result<i128> {
    let max_depth = (i128::BITS - 1) / SPLIT_GROUP_BITS;
    if ops.len() > max_depth as usize {
        return Err(Error::invalid_input(format!(
            "Split path of depth {} exceeds {}",
            ops.len(),
            max_depth
        )));
    }

    Ok(ops.iter().rev().fold(0i128, |code, op| {
        (code << SPLIT_GROUP_BITS) | i128::from(op.bits())
    }))
}

/// Parse the decimal `SplitSeries` field of a trace row
pub fn parse_series(field: &str) -> Result<i128> {
    field
        .trim()
        .trim_matches('"')
        .parse()
        .map_err(|_| Error::record_format(format!("Invalid split series '{}'", field)))
}
