// Copyright 2026 the AxisGuide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate strategies mapping the axis's parametric domain onto 2-D geometry.
//!
//! An axis is laid out along an abstract domain value in `[0, 1]`. A
//! [`AxisCoord`] turns such a value into a point, a tangent direction, and an
//! outward normal. Two strategies exist: a straight segment between two
//! endpoints, and a circular arc. All functions are total; values outside
//! `[0, 1]` extrapolate rather than clamp, so decorations may sit slightly
//! beyond the axis ends.

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use kurbo::{Arc, BezPath, Point, Shape, Vec2};

/// Which side of an arc axis the ticks grow toward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TickDirection {
    /// Ticks point away from the arc center.
    #[default]
    Outward,
    /// Ticks point toward the arc center.
    Inward,
}

/// A straight axis between two endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearCoord {
    /// Position of domain value 0.
    pub start: Point,
    /// Position of domain value 1.
    pub end: Point,
    /// Which perpendicular the ticks use: `1.0` rotates the tangent +90°
    /// (screen coordinates, y down), `-1.0` flips to the other side.
    pub vertical_factor: f64,
}

impl LinearCoord {
    /// Creates a linear strategy with ticks on the default side.
    pub fn new(start: impl Into<Point>, end: impl Into<Point>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            vertical_factor: 1.0,
        }
    }

    /// Flips the tick side.
    pub fn with_vertical_factor(mut self, factor: f64) -> Self {
        self.vertical_factor = if factor < 0.0 { -1.0 } else { 1.0 };
        self
    }
}

/// A circular-arc axis.
///
/// Angles are in degrees, measured from the +x direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcCoord {
    /// Arc center in scene coordinates.
    pub center: Point,
    /// Arc radius in scene coordinates.
    pub radius: f64,
    /// Angles (degrees) of domain values 0 and 1.
    pub angle_range: (f64, f64),
    /// Which side the ticks grow toward.
    pub tick_direction: TickDirection,
}

impl ArcCoord {
    /// Creates an arc strategy with outward ticks.
    pub fn new(center: impl Into<Point>, radius: f64, angle_range: (f64, f64)) -> Self {
        Self {
            center: center.into(),
            radius,
            angle_range,
            tick_direction: TickDirection::Outward,
        }
    }

    /// Sets the tick direction.
    pub fn with_tick_direction(mut self, tick_direction: TickDirection) -> Self {
        self.tick_direction = tick_direction;
        self
    }

    fn theta(&self, value: f64) -> f64 {
        let (a0, a1) = self.angle_range;
        (a0 + value * (a1 - a0)).to_radians()
    }
}

/// A coordinate strategy: the pluggable mapping from domain values to geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AxisCoord {
    /// Values run along a straight segment.
    Linear(LinearCoord),
    /// Values run along a circular arc.
    Arc(ArcCoord),
}

impl From<LinearCoord> for AxisCoord {
    fn from(c: LinearCoord) -> Self {
        Self::Linear(c)
    }
}

impl From<ArcCoord> for AxisCoord {
    fn from(c: ArcCoord) -> Self {
        Self::Arc(c)
    }
}

impl AxisCoord {
    /// Returns the scene position of a domain value.
    pub fn point(&self, value: f64) -> Point {
        match self {
            Self::Linear(c) => c.start.lerp(c.end, value),
            Self::Arc(c) => {
                let th = c.theta(value);
                c.center + c.radius * Vec2::new(th.cos(), th.sin())
            }
        }
    }

    /// Returns the unit tangent (direction of increasing value) at a domain value.
    pub fn tangent(&self, value: f64) -> Vec2 {
        match self {
            Self::Linear(c) => normalize(c.end - c.start),
            Self::Arc(c) => {
                let th = c.theta(value);
                let sweep = c.angle_range.1 - c.angle_range.0;
                let dir = if sweep < 0.0 { -1.0 } else { 1.0 };
                dir * Vec2::new(-th.sin(), th.cos())
            }
        }
    }

    /// Returns the unit outward normal (the direction ticks grow) at a domain value.
    pub fn normal(&self, value: f64) -> Vec2 {
        match self {
            Self::Linear(c) => {
                let t = self.tangent(value);
                c.vertical_factor * Vec2::new(-t.y, t.x)
            }
            Self::Arc(c) => {
                let th = c.theta(value);
                let radial = Vec2::new(th.cos(), th.sin());
                match c.tick_direction {
                    TickDirection::Outward => radial,
                    TickDirection::Inward => -radial,
                }
            }
        }
    }

    /// Returns the positions of domain values 0 and 1.
    pub fn terminals(&self) -> (Point, Point) {
        (self.point(0.0), self.point(1.0))
    }

    /// Returns the axis line as a path (a segment, or a flattened arc).
    pub fn line_path(&self) -> BezPath {
        match self {
            Self::Linear(c) => {
                let mut p = BezPath::new();
                p.move_to(c.start);
                p.line_to(c.end);
                p
            }
            Self::Arc(c) => {
                let (a0, a1) = c.angle_range;
                let arc = Arc::new(
                    c.center,
                    Vec2::new(c.radius, c.radius),
                    a0.to_radians(),
                    (a1 - a0).to_radians(),
                    0.0,
                );
                let mut p = BezPath::new();
                p.extend(arc.path_elements(0.1));
                p
            }
        }
    }
}

fn normalize(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len == 0.0 { Vec2::new(1.0, 0.0) } else { v / len }
}

/// Returns the signed angle (degrees) of a vector relative to the +x direction.
pub(crate) fn vector_angle(v: Vec2) -> f64 {
    v.y.atan2(v.x).to_degrees()
}

/// Normalizes an angle (degrees) into `(-180, 180]`.
///
/// Reduction goes through `%`, so huge magnitudes (where repeated
/// subtraction of 360 would no longer change the value) stay total.
pub(crate) fn format_angle(mut angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    angle %= 360.0;
    if angle > 180.0 {
        angle -= 360.0;
    } else if angle <= -180.0 {
        angle += 360.0;
    }
    angle
}
