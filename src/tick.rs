// Copyright 2026 the AxisGuide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick data: raw descriptors, normalization, and down-sampling.
//!
//! Callers hand the axis a set of `{value, text?, id?, state?}` descriptors
//! with values already normalized into `[0, 1]` by their scale. This module
//! sorts them, optionally thins them against a threshold, and fills in the
//! defaulted fields, producing the immutable [`TickDatum`] sequence one
//! layout pass works from.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::Line;

use crate::coord::AxisCoord;

/// Interaction state carried on a tick.
///
/// Styling by state is the caller's concern; the layout engine only threads
/// the state through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TickState {
    /// The resting state.
    #[default]
    Default,
    /// Hovered/active.
    Active,
    /// Selected.
    Selected,
    /// De-emphasized.
    Inactive,
}

/// A raw tick descriptor, as produced by a scale.
#[derive(Clone, Debug, PartialEq)]
pub struct TickInput {
    /// Domain value in `[0, 1]`.
    pub value: f64,
    /// Label text. Defaults to the stringified value.
    pub text: Option<String>,
    /// Stable id. Defaults to the tick's index after down-sampling.
    pub id: Option<String>,
    /// Interaction state. Defaults to [`TickState::Default`].
    pub state: Option<TickState>,
}

impl TickInput {
    /// Creates a descriptor with all optional fields defaulted.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            text: None,
            id: None,
            state: None,
        }
    }

    /// Sets the label text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the stable id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the interaction state.
    pub fn with_state(mut self, state: TickState) -> Self {
        self.state = Some(state);
        self
    }
}

/// A fully-defaulted tick, immutable for the duration of one layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct TickDatum {
    /// Stable id.
    pub id: String,
    /// Domain value in `[0, 1]`.
    pub value: f64,
    /// Raw label text (before any shortening).
    pub text: String,
    /// Interaction state.
    pub state: TickState,
}

/// Sorts, thins, and defaults raw tick descriptors.
///
/// Sorting is stable, so duplicate values keep their input order. When
/// `ticks_threshold` is exceeded, every `ceil(len / threshold)`-th tick is
/// kept; the first tick always survives.
pub fn build_tick_data(input: &[TickInput], ticks_threshold: Option<usize>) -> Vec<TickDatum> {
    let mut sorted: Vec<TickInput> = input.to_vec();
    sorted.sort_by(|a, b| a.value.total_cmp(&b.value));

    let len = sorted.len();
    if let Some(threshold) = ticks_threshold
        && threshold > 0
        && threshold < len
    {
        let page = len.div_ceil(threshold);
        sorted = sorted
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| idx % page == 0)
            .map(|(_, tick)| tick)
            .collect();
    }

    sorted
        .into_iter()
        .enumerate()
        .map(|(idx, tick)| TickDatum {
            id: tick.id.unwrap_or_else(|| idx.to_string()),
            value: tick.value,
            text: tick
                .text
                .unwrap_or_else(|| alloc::format!("{}", tick.value)),
            state: tick.state.unwrap_or_default(),
        })
        .collect()
}

/// Appends a synthetic tick at value 1 that visually closes the axis.
///
/// The tick carries blank text and inherits the previous tick's state; a
/// numeric previous id is incremented. No-op when the last tick already sits
/// at 1.
pub(crate) fn append_terminal_tick(ticks: &mut Vec<TickDatum>) {
    let Some(last) = ticks.last() else {
        return;
    };
    if last.value == 1.0 {
        return;
    }
    let id = match last.id.parse::<i64>() {
        Ok(n) => (n + 1).to_string(),
        Err(_) => alloc::format!("{}-1", last.id),
    };
    ticks.push(TickDatum {
        id,
        value: 1.0,
        text: String::new(),
        state: last.state,
    });
}

/// Computes a tick segment at `value`: offset outward along the normal, then
/// extended by `len`.
pub(crate) fn calc_tick(coord: &AxisCoord, value: f64, len: f64, offset: f64) -> Line {
    let p = coord.point(value);
    let n = coord.normal(value);
    Line::new(p + offset * n, p + (offset + len) * n)
}
