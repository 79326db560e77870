//! Trace records
//!
//! A [`LeafRecord`] is one row of an encoder trace. Expanding it yields one
//! [`AncestorRecord`] per level of its partition tree.

use crate::error::Result;
use crate::partition::{self, ctu_root, Point, Rectangle, Size, SplitMode, SplitOperation};
use std::fmt;

/// One leaf CU of an encoder trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafRecord {
    /// Frame identifier (POC), kept verbatim
    pub frame_id: String,
    /// Top-left corner of the leaf
    pub position: Point,
    /// Declared leaf size
    pub size: Size,
    /// Encoded root-to-leaf split path
    pub code: i128,
}

impl LeafRecord {
    /// Create a leaf record
    pub fn new<S: Into<String>>(frame_id: S, position: Point, size: Size, code: i128) -> Self {
        LeafRecord {
            frame_id: frame_id.into(),
            position,
            size,
            code,
        }
    }

    /// Build a leaf record from the textual fields of a trace row
    pub fn parse(poc: &str, pos: &str, block_size: &str, split_series: &str) -> Result<Self> {
        Ok(LeafRecord {
            frame_id: poc.trim().to_string(),
            position: pos.parse()?,
            size: block_size.parse()?,
            code: partition::parse_series(split_series)?,
        })
    }

    /// The CTU this leaf belongs to
    pub fn ctu(&self) -> Rectangle {
        ctu_root(self.position)
    }

    /// Decoded split path, root first
    pub fn operations(&self) -> Result<Vec<SplitOperation>> {
        partition::decode(self.code)
    }

    /// Every ancestor of this leaf, CTU first and the leaf itself last
    pub fn ancestors(&self) -> Result<Vec<AncestorRecord>> {
        let ops = self.operations()?;
        let chain = partition::reconstruct(self.ctu(), self.position, self.size, &ops)?;

        Ok(chain
            .into_iter()
            .map(|(rect, mode)| AncestorRecord::new(self.frame_id.clone(), rect, mode))
            .collect())
    }
}

/// One level of a reconstructed partition tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AncestorRecord {
    /// Frame identifier (POC)
    pub frame_id: String,
    /// CU rectangle at this level
    pub rect: Rectangle,
    /// How this CU is divided, or [`SplitMode::NonSplit`] for the leaf
    pub mode: SplitMode,
}

impl AncestorRecord {
    /// Create an ancestor record
    pub fn new<S: Into<String>>(frame_id: S, rect: Rectangle, mode: SplitMode) -> Self {
        AncestorRecord {
            frame_id: frame_id.into(),
            rect,
            mode,
        }
    }

    /// Whether this is the leaf level
    pub fn is_leaf(&self) -> bool {
        self.mode == SplitMode::NonSplit
    }
}

impl fmt::Display for AncestorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "POC {} {} {} {}",
            self.frame_id,
            self.rect.position(),
            self.rect.size(),
            self.mode
        )
    }
}
