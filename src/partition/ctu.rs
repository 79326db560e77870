//! Coding Tree Unit (CTU) ancestry reconstruction
//!
//! Every leaf CU belongs to exactly one 128×128 CTU. Replaying the decoded
//! split path from that CTU, always following the child that holds the leaf
//! position, recovers the rectangle of every ancestor of the leaf.

use super::geometry::{Point, Rectangle, Size};
use super::split::{SplitMode, SplitOperation};
use crate::error::{Error, Result};

/// CTU width and height in pixels
pub const CTU_SIZE: u32 = 128;

/// Largest per-dimension difference between the replayed and the declared
/// leaf size that is still accepted (ternary rounding)
pub const LEAF_SIZE_TOLERANCE: u32 = 1;

/// Ancestor rectangles from the CTU root down to the leaf, each with the
/// mode that subdivides it
pub type AncestorChain = Vec<(Rectangle, SplitMode)>;

/// The CTU holding `position`
pub fn ctu_root(position: Point) -> Rectangle {
    Rectangle::new(
        (position.x / CTU_SIZE) * CTU_SIZE,
        (position.y / CTU_SIZE) * CTU_SIZE,
        CTU_SIZE,
        CTU_SIZE,
    )
}

/// Replay `ops` from `root` towards the leaf at `target_pos`
///
/// The chain starts with `root` and ends with the leaf tagged
/// [`SplitMode::NonSplit`]. The leaf size is snapped to `target_size` when it
/// is within [`LEAF_SIZE_TOLERANCE`]; a larger difference means the split path
/// does not describe this leaf and is reported as
/// [`Error::GeometryMismatch`].
pub fn reconstruct(
    root: Rectangle,
    target_pos: Point,
    target_size: Size,
    ops: &[SplitOperation],
) -> Result<AncestorChain> {
    if !root.contains(target_pos) {
        return Err(Error::geometry(format!(
            "leaf at {} lies outside root {}",
            target_pos, root
        )));
    }

    let mut chain = Vec::with_capacity(ops.len() + 1);
    let mut current = root;

    for &op in ops {
        chain.push((current, SplitMode::Split(op)));
        current = current.split_child(op, target_pos)?;
    }

    let reconstructed = current.size();
    if !reconstructed.within(target_size, LEAF_SIZE_TOLERANCE) {
        return Err(Error::GeometryMismatch {
            declared: target_size,
            reconstructed,
        });
    }

    current.width = target_size.width;
    current.height = target_size.height;
    chain.push((current, SplitMode::NonSplit));

    Ok(chain)
}
