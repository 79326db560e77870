//! Partition tree decoding and reconstruction
//!
//! ## Architecture
//!
//! ```text
//! SplitSeries (integer)
//!     ↓
//! split::decode ──────→ [SplitOperation] (root first)
//!     ↓
//! ctu::reconstruct ───→ [(Rectangle, SplitMode)] (CTU root .. leaf)
//! ```
//!
//! Both stages are pure functions. The only fixed geometry is the 128×128
//! CTU; every other rectangle is derived from the split path and the leaf
//! position.

pub mod ctu;
pub mod geometry;
pub mod split;

pub use ctu::{ctu_root, reconstruct, AncestorChain, CTU_SIZE, LEAF_SIZE_TOLERANCE};
pub use geometry::{ternary_bands, Point, Rectangle, Size};
pub use split::{decode, encode, parse_series, SplitMode, SplitOperation};
