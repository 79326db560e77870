//! Pixel-space geometry for coding units
//!
//! Positions and sizes use the textual forms found in encoder traces:
//! `"x,y"` for a position and `"w*h"` for a block size.

use super::split::SplitOperation;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    /// Create a new point
    pub fn new(x: u32, y: u32) -> Self {
        Point { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Point {
    type Err = Error;

    /// Parse `"x,y"`; surrounding whitespace and double quotes are ignored
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_matches('"').trim();
        let (x, y) = trimmed
            .split_once(',')
            .ok_or_else(|| Error::record_format(format!("Invalid position '{}'", s)))?;

        Ok(Point {
            x: parse_coord(x, s, "position")?,
            y: parse_coord(y, s, "position")?,
        })
    }
}

/// A block size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Create a new size
    pub fn new(width: u32, height: u32) -> Self {
        Size { width, height }
    }

    /// Whether both dimensions differ from `other` by at most `tolerance`
    pub fn within(&self, other: Size, tolerance: u32) -> bool {
        self.width.abs_diff(other.width) <= tolerance
            && self.height.abs_diff(other.height) <= tolerance
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = Error;

    /// Parse `"w*h"`
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_matches('"').trim();
        let (w, h) = trimmed
            .split_once('*')
            .ok_or_else(|| Error::record_format(format!("Invalid block size '{}'", s)))?;

        let size = Size {
            width: parse_coord(w, s, "block size")?,
            height: parse_coord(h, s, "block size")?,
        };

        if size.width == 0 || size.height == 0 {
            return Err(Error::record_format(format!("Empty block size '{}'", s)));
        }

        Ok(size)
    }
}

fn parse_coord(value: &str, original: &str, what: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::record_format(format!("Invalid {} '{}'", what, original)))
}

/// An axis-aligned CU rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    /// Create a new rectangle
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Rectangle {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from its top-left corner and size
    pub fn from_parts(position: Point, size: Size) -> Self {
        Rectangle::new(position.x, position.y, size.width, size.height)
    }

    /// Top-left corner
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether `point` lies inside this rectangle
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x - self.x < self.width
            && point.y - self.y < self.height
    }

    /// Whether `other` lies entirely inside this rectangle
    pub fn encloses(&self, other: &Rectangle) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }

    /// Child rectangle produced by `op` that holds `target`
    ///
    /// Fails when the split would produce an empty child.
    pub fn split_child(&self, op: SplitOperation, target: Point) -> Result<Rectangle> {
        let child = match op {
            SplitOperation::QuadSplit => {
                let half_w = self.width / 2;
                let half_h = self.height / 2;
                Rectangle::new(
                    self.x + pick_half(self.x, half_w, target.x),
                    self.y + pick_half(self.y, half_h, target.y),
                    half_w,
                    half_h,
                )
            }
            SplitOperation::BinaryHorizontal => {
                let half_h = self.height / 2;
                Rectangle::new(
                    self.x,
                    self.y + pick_half(self.y, half_h, target.y),
                    self.width,
                    half_h,
                )
            }
            SplitOperation::BinaryVertical => {
                let half_w = self.width / 2;
                Rectangle::new(
                    self.x + pick_half(self.x, half_w, target.x),
                    self.y,
                    half_w,
                    self.height,
                )
            }
            SplitOperation::TernaryHorizontal => {
                let (offset, extent) = pick_band(self.height, target.y.saturating_sub(self.y));
                Rectangle::new(self.x, self.y + offset, self.width, extent)
            }
            SplitOperation::TernaryVertical => {
                let (offset, extent) = pick_band(self.width, target.x.saturating_sub(self.x));
                Rectangle::new(self.x + offset, self.y, extent, self.height)
            }
        };

        if child.width == 0 || child.height == 0 {
            return Err(Error::geometry(format!(
                "{} of {} yields an empty child",
                op, self
            )));
        }

        Ok(child)
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{} {}*{})", self.x, self.y, self.width, self.height)
    }
}

/// Offset of the half holding `target` along one axis
fn pick_half(origin: u32, half: u32, target: u32) -> u32 {
    if target >= origin + half {
        half
    } else {
        0
    }
}

/// Extents of the three 1:2:1 bands of a ternary split
///
/// The middle band absorbs the remainder so the bands always sum to `extent`.
pub fn ternary_bands(extent: u32) -> [u32; 3] {
    let outer = extent / 4;
    let middle = extent - 2 * outer;
    [outer, middle, outer]
}

/// `(offset, extent)` of the ternary band holding `target_offset`
fn pick_band(extent: u32, target_offset: u32) -> (u32, u32) {
    let [first, middle, last] = ternary_bands(extent);

    if target_offset < first {
        (0, first)
    } else if target_offset < first + middle {
        (first, middle)
    } else {
        (first + middle, last)
    }
}
