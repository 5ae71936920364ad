// Copyright 2026 the AxisGuide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An axis guide primitive for chart renderers.
//!
//! An axis is assembled from normalized tick data (`[0, 1]` domain values) and
//! a coordinate strategy:
//! - **Coordinates** place the axis as a straight segment or a circular arc
//!   and supply the tangent/normal frame everything else hangs off.
//! - **Nodes** are plain geometry: the axis line with optional arrows, tick
//!   and sub-tick segments, positioned labels, and a title. Rendering them is
//!   the caller's concern.
//! - **Label adjustment** resolves crowded labels with a configurable
//!   pipeline of auto-rotate, auto-hide, and auto-ellipsis passes, the last
//!   with text-, number-, and time-aware shortening.
//!
//! Text metrics come from a [`TextMeasurer`] supplied by the embedder; the
//! built-in [`HeuristicTextMeasurer`] is good enough for tests and rough
//! layout. All layout operations are total: adjustment is best effort and
//! never fails, and [`Axis::labels_overlapping`] exposes the residual state.

#![no_std]

extern crate alloc;

mod axis;
mod coord;
#[cfg(not(feature = "std"))]
mod float;
mod label;
mod overlap;
mod shorten;
mod text;
mod tick;
mod time;

pub use axis::{
    ArrowNode, ArrowSpec, Axis, AxisSpec, AxisTitleSpec, LabelKind, LabelSpec, LineSpec,
    OverlapResolve, StrokeStyle, SubTickSpec, TickLineNode, TickLineSpec, TitleNode,
    TitlePosition,
};
pub use coord::{ArcCoord, AxisCoord, LinearCoord, TickDirection};
pub use label::{LabelNode, TextAnchor};
pub use overlap::labels_overlap;
pub use shorten::{
    ELLIPSIS, NumericNotation, ellipsis_text, to_k_notation, to_scientific, to_thousands,
};
pub use text::{
    FontFamily, FontStyle, FontVariant, FontWeight, HeuristicTextMeasurer, TextMeasurer,
    TextMetrics, TextStyle,
};
pub use tick::{TickDatum, TickInput, TickState, build_tick_data};
pub use time::{DateTime, TimeMask, TimeUnit, common_masks, key_mask, time_scale, time_start};
