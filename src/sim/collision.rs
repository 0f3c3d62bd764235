//! Axis-aligned box overlap
//!
//! Edges that merely touch do not count: every comparison is strict.

use super::state::Rect;

/// True when the interiors of `a` and `b` intersect
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}
