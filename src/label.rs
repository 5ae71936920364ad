// Copyright 2026 the AxisGuide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label nodes.
//!
//! One [`LabelNode`] exists per surviving tick. Nodes are created fresh on
//! every layout pass and then mutated in place by the adjustment pipeline:
//! visibility (auto-hide), rotation + anchor (auto-rotate), and display text
//! (auto-ellipsis). The raw text is kept so ellipsis always re-derives from
//! the original.

extern crate alloc;

use alloc::string::String;

use kurbo::{Affine, Point, Rect, Vec2};

use crate::text::{TextMeasurer, TextStyle};

/// Horizontal text anchoring relative to a label's position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// The position is the start of the text.
    Start,
    /// The position is the middle of the text.
    #[default]
    Middle,
    /// The position is the end of the text.
    End,
}

/// A positioned, mutable tick label.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelNode {
    /// Id of the tick this label belongs to.
    pub id: String,
    /// Domain value of the label anchor (tick value, or gap midpoint).
    pub value: f64,
    /// Anchor position in scene coordinates.
    pub pos: Point,
    /// Original, unshortened text.
    pub raw_text: String,
    /// Currently displayed text (may be shortened).
    pub text: String,
    /// Whether the label is currently shown.
    pub visible: bool,
    /// Rotation angle in degrees, about the anchor position.
    pub angle: f64,
    /// Horizontal anchoring.
    pub anchor: TextAnchor,
}

impl LabelNode {
    pub(crate) fn new(id: String, value: f64, pos: Point, text: String) -> Self {
        Self {
            id,
            value,
            pos,
            raw_text: text.clone(),
            text,
            visible: true,
            angle: 0.0,
            anchor: TextAnchor::Middle,
        }
    }

    /// Returns the label's current axis-aligned bounding box.
    ///
    /// The box reflects the display text, anchor, and rotation; the anchor
    /// position is treated as the vertical midline of the unrotated text.
    pub fn bounds(&self, style: &TextStyle, measurer: &dyn TextMeasurer) -> Rect {
        let metrics = measurer.measure(&self.text, style);
        let w = metrics.advance_width;
        let h = metrics.line_height();
        let x0 = match self.anchor {
            TextAnchor::Start => 0.0,
            TextAnchor::Middle => -0.5 * w,
            TextAnchor::End => -w,
        };

        let transform = Affine::translate(self.pos.to_vec2()) * Affine::rotate(self.angle.to_radians());
        let corners = [
            transform * Point::new(x0, -0.5 * h),
            transform * Point::new(x0 + w, -0.5 * h),
            transform * Point::new(x0 + w, 0.5 * h),
            transform * Point::new(x0, 0.5 * h),
        ];

        let mut min = corners[0];
        let mut max = corners[0];
        for c in &corners[1..] {
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
        Rect::new(min.x, min.y, max.x, max.y)
    }
}

/// Chooses a label's rotation and anchor for a given outward normal.
///
/// Unrotated labels sitting above/below the axis (mostly-vertical normal)
/// center on their tick; labels beside the axis lead with the edge nearest
/// the tick. Rotated labels on a mostly-vertical normal anchor by whether
/// the rotation leans the text toward or away from the axis.
pub(crate) fn label_layout(normal: Vec2, angle: f64) -> (f64, TextAnchor) {
    let anchor = if normal.x.abs() > normal.y.abs() {
        if normal.x > 0.0 {
            TextAnchor::Start
        } else {
            TextAnchor::End
        }
    } else if angle == 0.0 {
        TextAnchor::Middle
    } else if (angle > 0.0) == (normal.y > 0.0) {
        TextAnchor::Start
    } else {
        TextAnchor::End
    };
    (angle, anchor)
}
