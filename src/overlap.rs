// Copyright 2026 the AxisGuide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label overlap detection.
//!
//! Labels are laid out in monotonic order along the axis, so only adjacent
//! pairs are tested: an O(n) pass over consecutive bounding boxes, each
//! inflated by the configured margin. Non-adjacent overlap without adjacent
//! overlap is out of scope by design.

use kurbo::Rect;

use crate::label::LabelNode;
use crate::text::{TextMeasurer, TextStyle};

/// Reports whether any two consecutive labels in `iter` intersect once their
/// bounds are inflated by `margin`.
pub(crate) fn overlaps_sequence<'a>(
    iter: impl Iterator<Item = &'a LabelNode>,
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
    margin: f64,
) -> bool {
    let mut prev: Option<Rect> = None;
    for label in iter {
        let bounds = label.bounds(style, measurer).inflate(margin, margin);
        if let Some(prev) = prev
            && intersects(prev, bounds)
        {
            return true;
        }
        prev = Some(bounds);
    }
    false
}

/// Reports whether any two consecutive *visible* labels overlap.
pub fn labels_overlap(
    labels: &[LabelNode],
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
    margin: f64,
) -> bool {
    overlaps_sequence(labels.iter().filter(|l| l.visible), style, measurer, margin)
}

/// Strict interior intersection; rectangles that merely touch do not overlap.
fn intersects(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}
