// Copyright 2026 the AxisGuide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis assembly.
//!
//! A single [`AxisSpec`] describes the whole guide: the coordinate strategy,
//! the axis line with optional arrows, tick and sub-tick lines, labels, and a
//! title. An [`Axis`] holds the spec together with the nodes generated from
//! the current tick data, and re-runs the label adjustment pipeline
//! (auto-rotate, auto-hide, auto-ellipsis) whenever the data or the spec
//! change. Adjustment is best effort: labels may still overlap after every
//! enabled pass has run, and [`Axis::labels_overlapping`] reports the
//! residual state.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use kurbo::{BezPath, Line, Point, Vec2};
use peniko::Brush;
use peniko::color::palette::css;

use crate::coord::{AxisCoord, format_angle, vector_angle};
use crate::label::{LabelNode, TextAnchor, label_layout};
use crate::overlap::overlaps_sequence;
use crate::shorten::{NumericNotation, ellipsis_text};
use crate::text::{TextMeasurer, TextStyle};
use crate::tick::{TickDatum, TickInput, append_terminal_tick, build_tick_data, calc_tick};
use crate::time::{
    DateTime, TimeUnit, coarser, common_masks, key_mask, parse_all, pick_mask, sequence_scale,
    time_start,
};

/// A paint + width pair for stroked paths (axis lines, ticks, sub-ticks).
#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
}

impl StrokeStyle {
    /// Convenience for a solid stroke.
    pub fn solid(brush: impl Into<Brush>, stroke_width: f64) -> Self {
        Self {
            brush: brush.into(),
            stroke_width,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::solid(css::BLACK, 1.0)
    }
}

/// An arrow marker at one end of the axis line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowSpec {
    /// Marker size in scene coordinates.
    pub size: f64,
}

impl Default for ArrowSpec {
    fn default() -> Self {
        Self { size: 10.0 }
    }
}

/// The axis line.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineSpec {
    /// Stroke style.
    pub style: StrokeStyle,
    /// Arrow at domain value 0.
    pub arrow_start: Option<ArrowSpec>,
    /// Arrow at domain value 1.
    pub arrow_end: Option<ArrowSpec>,
}

/// Tick lines.
#[derive(Clone, Debug, PartialEq)]
pub struct TickLineSpec {
    /// Tick length along the outward normal.
    pub len: f64,
    /// Gap between the axis line and the tick start.
    pub offset: f64,
    /// Whether to append a synthetic closing tick at domain value 1.
    pub append_tick: bool,
    /// Stroke style.
    pub style: StrokeStyle,
}

impl Default for TickLineSpec {
    fn default() -> Self {
        Self {
            len: 5.0,
            offset: 0.0,
            append_tick: false,
            style: StrokeStyle::default(),
        }
    }
}

/// Sub-tick lines, drawn between adjacent ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct SubTickSpec {
    /// Number of sub-ticks per gap between adjacent ticks.
    pub count: usize,
    /// Sub-tick length along the outward normal.
    pub len: f64,
    /// Gap between the axis line and the sub-tick start.
    pub offset: f64,
    /// Stroke style.
    pub style: StrokeStyle,
}

impl Default for SubTickSpec {
    fn default() -> Self {
        Self {
            count: 4,
            len: 2.0,
            offset: 0.0,
            style: StrokeStyle::default(),
        }
    }
}

/// Which shortening strategy auto-ellipsis uses for this axis's labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LabelKind {
    /// Plain text, truncated with an ellipsis marker.
    #[default]
    Text,
    /// Numeric labels, re-rendered in a shared notation.
    Number,
    /// Calendar timestamps, re-rendered under a field mask.
    Time,
}

/// One step of the overlap-resolution pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlapResolve {
    /// Rotate all labels to a common angle.
    AutoRotate,
    /// Hide labels at a regular stride.
    AutoHide,
    /// Shorten label text.
    AutoEllipsis,
}

/// Tick labels and their adjustment pipeline configuration.
#[derive(Clone)]
pub struct LabelSpec {
    /// Shortening strategy.
    pub kind: LabelKind,
    /// Optional display-text formatter, applied before any shortening.
    pub formatter: Option<Arc<dyn Fn(&TickDatum) -> String>>,
    /// `true` anchors labels on their tick; `false` centers each label
    /// between its tick and the next (band style).
    pub align_tick: bool,
    /// Gap between the tick end and the label, along the outward normal.
    pub offset: f64,
    /// Text style, used for both measurement and rendering.
    pub style: TextStyle,
    /// Fill paint.
    pub fill: Brush,
    /// Manual rotation (degrees). Suppresses the auto-rotate search.
    pub rotate: Option<f64>,
    /// Auto-rotate candidate range (degrees), max exclusive.
    pub rotate_range: (f64, f64),
    /// Auto-rotate scan step (degrees), floored at 1.
    pub rotate_step: f64,
    /// Enables the auto-rotate pass.
    pub auto_rotate: bool,
    /// Enables the auto-hide pass.
    pub auto_hide: bool,
    /// Whether auto-hide also hides the hidden labels' tick lines.
    pub auto_hide_tick_line: bool,
    /// Enables the auto-ellipsis pass.
    pub auto_ellipsis: bool,
    /// Pipeline order. Entries run only when their `auto_*` flag is set.
    pub overlap_order: Vec<OverlapResolve>,
    /// Smallest allowed label width for auto-ellipsis.
    pub min_length: f64,
    /// Largest allowed label width for auto-ellipsis. An infinite value
    /// disables the pass.
    pub max_length: f64,
    /// Auto-ellipsis width decrement, floored at 1.
    pub ellipsis_step: f64,
    /// Extra clearance required between adjacent labels.
    pub margin: f64,
}

impl core::fmt::Debug for LabelSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LabelSpec")
            .field("kind", &self.kind)
            .field("formatter", &self.formatter.is_some())
            .field("align_tick", &self.align_tick)
            .field("offset", &self.offset)
            .field("style", &self.style)
            .field("fill", &self.fill)
            .field("rotate", &self.rotate)
            .field("rotate_range", &self.rotate_range)
            .field("rotate_step", &self.rotate_step)
            .field("auto_rotate", &self.auto_rotate)
            .field("auto_hide", &self.auto_hide)
            .field("auto_hide_tick_line", &self.auto_hide_tick_line)
            .field("auto_ellipsis", &self.auto_ellipsis)
            .field("overlap_order", &self.overlap_order)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("ellipsis_step", &self.ellipsis_step)
            .field("margin", &self.margin)
            .finish()
    }
}

impl Default for LabelSpec {
    fn default() -> Self {
        Self {
            kind: LabelKind::Text,
            formatter: None,
            align_tick: true,
            offset: 4.0,
            style: TextStyle::new(10.0),
            fill: Brush::Solid(css::BLACK),
            rotate: None,
            rotate_range: (0.0, 90.0),
            rotate_step: 5.0,
            auto_rotate: true,
            auto_hide: true,
            auto_hide_tick_line: true,
            auto_ellipsis: true,
            overlap_order: vec![
                OverlapResolve::AutoRotate,
                OverlapResolve::AutoEllipsis,
                OverlapResolve::AutoHide,
            ],
            min_length: 20.0,
            max_length: f64::INFINITY,
            ellipsis_step: 5.0,
            margin: 2.0,
        }
    }
}

/// Where along the axis the title sits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TitlePosition {
    /// At domain value 0.
    Start,
    /// At domain value 0.5.
    #[default]
    Center,
    /// At domain value 1.
    End,
}

impl TitlePosition {
    fn value(self) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => 0.5,
            Self::End => 1.0,
        }
    }
}

/// The axis title.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisTitleSpec {
    /// Title text.
    pub content: String,
    /// Position along the axis.
    pub position: TitlePosition,
    /// Offset from the anchor point, in scene coordinates.
    pub offset: Vec2,
    /// Rotation (degrees). Defaults to the tangent direction at the anchor.
    pub rotate: Option<f64>,
    /// Text style.
    pub style: TextStyle,
    /// Fill paint.
    pub fill: Brush,
}

impl AxisTitleSpec {
    /// Creates a centered title with default styling.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            position: TitlePosition::Center,
            offset: Vec2::ZERO,
            rotate: None,
            style: TextStyle::new(11.0),
            fill: Brush::Solid(css::BLACK),
        }
    }
}

/// The full axis configuration.
#[derive(Clone, Debug)]
pub struct AxisSpec {
    /// The coordinate strategy.
    pub coord: AxisCoord,
    /// The axis line, or `None` to omit it.
    pub line: Option<LineSpec>,
    /// Tick lines, or `None` to omit them.
    pub tick_line: Option<TickLineSpec>,
    /// Sub-tick lines, or `None` to omit them.
    pub sub_tick_line: Option<SubTickSpec>,
    /// Tick labels, or `None` to omit them.
    pub label: Option<LabelSpec>,
    /// The axis title, or `None` to omit it.
    pub title: Option<AxisTitleSpec>,
    /// Tick down-sampling threshold.
    pub ticks_threshold: Option<usize>,
}

impl AxisSpec {
    /// Creates an axis with a line, ticks, and labels, all default-styled.
    pub fn new(coord: impl Into<AxisCoord>) -> Self {
        Self {
            coord: coord.into(),
            line: Some(LineSpec::default()),
            tick_line: Some(TickLineSpec::default()),
            sub_tick_line: None,
            label: Some(LabelSpec::default()),
            title: None,
            ticks_threshold: None,
        }
    }

    /// Sets the axis line.
    pub fn with_line(mut self, line: LineSpec) -> Self {
        self.line = Some(line);
        self
    }

    /// Sets the tick lines.
    pub fn with_tick_line(mut self, tick_line: TickLineSpec) -> Self {
        self.tick_line = Some(tick_line);
        self
    }

    /// Sets the sub-tick lines.
    pub fn with_sub_tick_line(mut self, sub_tick_line: SubTickSpec) -> Self {
        self.sub_tick_line = Some(sub_tick_line);
        self
    }

    /// Sets the labels.
    pub fn with_label(mut self, label: LabelSpec) -> Self {
        self.label = Some(label);
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: AxisTitleSpec) -> Self {
        self.title = Some(title);
        self
    }

    /// Sets the tick down-sampling threshold.
    pub fn with_ticks_threshold(mut self, ticks_threshold: usize) -> Self {
        self.ticks_threshold = Some(ticks_threshold);
        self
    }
}

/// A generated tick line.
#[derive(Clone, Debug, PartialEq)]
pub struct TickLineNode {
    /// Id of the tick this line belongs to.
    pub id: String,
    /// The segment.
    pub line: Line,
    /// Whether the line is shown. Auto-hide may clear this.
    pub visible: bool,
}

/// A generated arrow marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowNode {
    /// Tip position.
    pub pos: Point,
    /// Pointing direction (degrees).
    pub angle: f64,
    /// Marker size.
    pub size: f64,
}

/// The generated title.
#[derive(Clone, Debug, PartialEq)]
pub struct TitleNode {
    /// Title text.
    pub content: String,
    /// Anchor position.
    pub pos: Point,
    /// Rotation (degrees).
    pub angle: f64,
    /// Horizontal anchoring.
    pub anchor: TextAnchor,
}

/// An axis: a spec plus the nodes generated from the current tick data.
#[derive(Debug)]
pub struct Axis {
    spec: AxisSpec,
    input: Vec<TickInput>,
    ticks: Vec<TickDatum>,
    tick_lines: Vec<TickLineNode>,
    sub_tick_lines: Vec<Line>,
    labels: Vec<LabelNode>,
    label_angle: f64,
}

impl Axis {
    /// Creates an empty axis. Nodes appear after the first [`Axis::update`].
    pub fn new(spec: AxisSpec) -> Self {
        Self {
            spec,
            input: Vec::new(),
            ticks: Vec::new(),
            tick_lines: Vec::new(),
            sub_tick_lines: Vec::new(),
            labels: Vec::new(),
            label_angle: 0.0,
        }
    }

    /// The current spec.
    pub fn spec(&self) -> &AxisSpec {
        &self.spec
    }

    /// Replaces the spec and regenerates all nodes from the stored tick data.
    pub fn set_spec(&mut self, spec: AxisSpec, measurer: &dyn TextMeasurer) {
        self.spec = spec;
        self.rebuild(measurer);
    }

    /// Replaces the tick data and regenerates all nodes.
    pub fn update(&mut self, input: &[TickInput], measurer: &dyn TextMeasurer) {
        self.input = input.to_vec();
        self.rebuild(measurer);
    }

    /// The normalized tick data the nodes were generated from.
    pub fn ticks(&self) -> &[TickDatum] {
        &self.ticks
    }

    /// The generated tick lines, one per tick.
    pub fn tick_lines(&self) -> &[TickLineNode] {
        &self.tick_lines
    }

    /// The generated sub-tick lines.
    pub fn sub_tick_lines(&self) -> &[Line] {
        &self.sub_tick_lines
    }

    /// The generated labels, one per tick, in axis order.
    pub fn labels(&self) -> &[LabelNode] {
        &self.labels
    }

    /// The common label rotation (degrees) after adjustment.
    pub fn label_angle(&self) -> f64 {
        self.label_angle
    }

    /// The axis line path, when a line is configured.
    pub fn line_path(&self) -> Option<BezPath> {
        self.spec.line.as_ref().map(|_| self.spec.coord.line_path())
    }

    /// The configured arrow markers at the axis terminals.
    ///
    /// Linear arrows point along the tangent (the start arrow reversed);
    /// arc arrows point along the outward normal at the terminal.
    pub fn arrows(&self) -> Vec<ArrowNode> {
        let Some(line) = &self.spec.line else {
            return Vec::new();
        };
        let coord = &self.spec.coord;
        let (start_dir, end_dir) = match coord {
            AxisCoord::Linear(_) => (-coord.tangent(0.0), coord.tangent(1.0)),
            AxisCoord::Arc(_) => (coord.normal(0.0), coord.normal(1.0)),
        };
        let mut out = Vec::new();
        if let Some(arrow) = line.arrow_start {
            out.push(ArrowNode {
                pos: coord.point(0.0),
                angle: format_angle(vector_angle(start_dir)),
                size: arrow.size,
            });
        }
        if let Some(arrow) = line.arrow_end {
            out.push(ArrowNode {
                pos: coord.point(1.0),
                angle: format_angle(vector_angle(end_dir)),
                size: arrow.size,
            });
        }
        out
    }

    /// The generated title, when one is configured.
    pub fn title(&self) -> Option<TitleNode> {
        let title = self.spec.title.as_ref()?;
        let value = title.position.value();
        let coord = &self.spec.coord;
        let angle = title
            .rotate
            .unwrap_or_else(|| format_angle(vector_angle(coord.tangent(value))));
        let anchor = match title.position {
            TitlePosition::Start => TextAnchor::Start,
            TitlePosition::Center => TextAnchor::Middle,
            TitlePosition::End => TextAnchor::End,
        };
        Some(TitleNode {
            content: title.content.clone(),
            pos: coord.point(value) + title.offset,
            angle,
            anchor,
        })
    }

    /// Reports whether adjacent visible labels still overlap after
    /// adjustment. Best-effort pipelines can end in this state.
    pub fn labels_overlapping(&self, measurer: &dyn TextMeasurer) -> bool {
        let Some(label) = &self.spec.label else {
            return false;
        };
        overlaps_sequence(
            self.labels.iter().filter(|l| l.visible),
            &label.style,
            measurer,
            label.margin,
        )
    }

    /// Returns the shortening function auto-ellipsis would use at `width`,
    /// taking a label's raw text and its index in [`Axis::labels`].
    pub fn label_shorten_strategy<'a>(
        &self,
        width: f64,
        measurer: &'a dyn TextMeasurer,
    ) -> Box<dyn Fn(&str, usize) -> String + 'a> {
        let (kind, style) = match &self.spec.label {
            Some(label) => (label.kind, label.style.clone()),
            None => (LabelKind::Text, TextStyle::new(10.0)),
        };
        let shortener = Shortener::build(kind, &self.labels, &style, measurer);
        Box::new(move |raw, index| shortener.apply(raw, index, width, &style, measurer))
    }

    /// Rotates every label to `angle`, re-deriving each anchor from its
    /// outward normal.
    pub fn set_label_angle(&mut self, angle: f64) {
        self.label_angle = angle;
        for label in &mut self.labels {
            let normal = self.spec.coord.normal(label.value);
            let (a, anchor) = label_layout(normal, angle);
            label.angle = a;
            label.anchor = anchor;
        }
    }

    fn rebuild(&mut self, measurer: &dyn TextMeasurer) {
        let mut ticks = build_tick_data(&self.input, self.spec.ticks_threshold);
        if self
            .spec
            .tick_line
            .as_ref()
            .is_some_and(|t| t.append_tick)
        {
            append_terminal_tick(&mut ticks);
        }
        self.ticks = ticks;

        let coord = self.spec.coord;
        self.tick_lines = match &self.spec.tick_line {
            Some(t) => self
                .ticks
                .iter()
                .map(|tick| TickLineNode {
                    id: tick.id.clone(),
                    line: calc_tick(&coord, tick.value, t.len, t.offset),
                    visible: true,
                })
                .collect(),
            None => Vec::new(),
        };

        self.sub_tick_lines = match &self.spec.sub_tick_line {
            Some(s) if s.count > 0 => {
                let mut out = Vec::new();
                for pair in self.ticks.windows(2) {
                    let (curr, next) = (pair[0].value, pair[1].value);
                    if next <= curr {
                        continue;
                    }
                    let gap = (next - curr) / (s.count + 1) as f64;
                    for i in 1..=s.count {
                        out.push(calc_tick(&coord, curr + i as f64 * gap, s.len, s.offset));
                    }
                }
                out
            }
            _ => Vec::new(),
        };

        self.labels = match &self.spec.label {
            Some(label) => {
                let tick_extent = self
                    .spec
                    .tick_line
                    .as_ref()
                    .map_or(0.0, |t| t.offset + t.len);
                let n = self.ticks.len();
                self.ticks
                    .iter()
                    .enumerate()
                    .map(|(i, tick)| {
                        let value = if label.align_tick {
                            tick.value
                        } else {
                            let next = if i + 1 < n { self.ticks[i + 1].value } else { 1.0 };
                            0.5 * (tick.value + next)
                        };
                        let pos = coord.point(value)
                            + (tick_extent + label.offset) * coord.normal(value);
                        let text = match &label.formatter {
                            Some(f) => f(tick),
                            None => tick.text.clone(),
                        };
                        LabelNode::new(tick.id.clone(), value, pos, text)
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        self.label_angle = 0.0;
        self.adjust_labels(measurer);
    }

    fn adjust_labels(&mut self, measurer: &dyn TextMeasurer) {
        let Some(label) = self.spec.label.clone() else {
            return;
        };
        if let Some(angle) = label.rotate {
            self.set_label_angle(format_angle(angle));
        }
        for resolve in &label.overlap_order {
            match resolve {
                OverlapResolve::AutoRotate if label.auto_rotate && label.rotate.is_none() => {
                    self.auto_rotate(&label, measurer);
                }
                OverlapResolve::AutoHide if label.auto_hide => {
                    self.auto_hide(&label, measurer);
                }
                OverlapResolve::AutoEllipsis if label.auto_ellipsis => {
                    self.auto_ellipsis(&label, measurer);
                }
                _ => {}
            }
        }
    }

    /// Scans `rotate_range` for the first common angle that clears the
    /// overlap, restoring the previous angle when none does.
    fn auto_rotate(&mut self, label: &LabelSpec, measurer: &dyn TextMeasurer) {
        if !self.labels_overlapping(measurer) {
            return;
        }
        let prev = self.label_angle;
        let (min, max) = label.rotate_range;
        let step = label.rotate_step.max(1.0);
        let mut angle = min;
        while angle < max {
            self.set_label_angle(format_angle(angle));
            if !self.labels_overlapping(measurer) {
                return;
            }
            angle += step;
        }
        self.set_label_angle(prev);
    }

    /// Hides labels at the smallest regular stride that clears the overlap.
    ///
    /// The first and last labels always stay visible; on a failed search
    /// only those two survive. Hidden labels stay allocated with their
    /// `visible` flag cleared.
    fn auto_hide(&mut self, label: &LabelSpec, measurer: &dyn TextMeasurer) {
        let n = self.labels.len();
        if n == 0 {
            return;
        }
        for l in &mut self.labels {
            l.visible = true;
        }

        let mut chosen: Option<Vec<bool>> = None;
        let mut seq = 1_usize;
        while seq == 1 || seq + 2 < n {
            let keep: Vec<bool> = (0..n).map(|i| i % seq == 0 || i == n - 1).collect();
            let clear = !overlaps_sequence(
                self.labels
                    .iter()
                    .zip(&keep)
                    .filter(|(_, k)| **k)
                    .map(|(l, _)| l),
                &label.style,
                measurer,
                label.margin,
            );
            if clear {
                chosen = Some(keep);
                break;
            }
            seq += 1;
        }
        let keep =
            chosen.unwrap_or_else(|| (0..n).map(|i| i == 0 || i == n - 1).collect());

        for (l, k) in self.labels.iter_mut().zip(&keep) {
            l.visible = *k;
        }
        if label.auto_hide_tick_line && self.tick_lines.len() == n {
            for (t, k) in self.tick_lines.iter_mut().zip(&keep) {
                t.visible = *k;
            }
        }
    }

    /// Shortens labels at decreasing allowed widths until the overlap
    /// clears, applying `min_length` when the search exhausts.
    ///
    /// The first pass at `max_length` runs unconditionally, so overlong
    /// labels are capped even when nothing overlaps.
    fn auto_ellipsis(&mut self, label: &LabelSpec, measurer: &dyn TextMeasurer) {
        if !label.max_length.is_finite() {
            return;
        }
        let shortener = Shortener::build(label.kind, &self.labels, &label.style, measurer);
        let step = label.ellipsis_step.max(1.0);
        let mut width = label.max_length;
        while width > label.min_length {
            self.apply_shortener(&shortener, width, &label.style, measurer);
            if !self.labels_overlapping(measurer) {
                return;
            }
            width -= step;
        }
        self.apply_shortener(&shortener, label.min_length, &label.style, measurer);
    }

    fn apply_shortener(
        &mut self,
        shortener: &Shortener,
        width: f64,
        style: &TextStyle,
        measurer: &dyn TextMeasurer,
    ) {
        for i in 0..self.labels.len() {
            let raw = self.labels[i].raw_text.clone();
            self.labels[i].text = shortener.apply(&raw, i, width, style, measurer);
        }
    }
}

/// A width-parameterized shortening strategy, precomputed from the label set
/// so per-width application stays cheap.
enum Shortener {
    Text,
    /// Notation is picked against the widest label's value so all labels
    /// share one rendering.
    Number { widest: Option<f64> },
    Time {
        parsed: Vec<Option<DateTime>>,
        keyed: Vec<bool>,
        scale: TimeUnit,
    },
}

impl Shortener {
    fn build(
        kind: LabelKind,
        labels: &[LabelNode],
        style: &TextStyle,
        measurer: &dyn TextMeasurer,
    ) -> Self {
        match kind {
            LabelKind::Text => Self::Text,
            LabelKind::Number => {
                let mut widest: Option<(f64, f64)> = None;
                for label in labels {
                    let Ok(v) = label.raw_text.parse::<f64>() else {
                        continue;
                    };
                    let w = measurer.measure(&label.raw_text, style).advance_width;
                    if widest.is_none_or(|(best, _)| w > best) {
                        widest = Some((w, v));
                    }
                }
                Self::Number {
                    widest: widest.map(|(_, v)| v),
                }
            }
            LabelKind::Time => {
                let parsed = parse_all(labels.iter().map(|l| l.raw_text.as_str()));
                let scale = sequence_scale(&parsed);
                let mut keyed = vec![false; parsed.len()];
                let mut prev: Option<DateTime> = None;
                for (i, dt) in parsed.iter().enumerate() {
                    let Some(dt) = dt else {
                        continue;
                    };
                    keyed[i] = match (prev, coarser(scale)) {
                        (None, _) => true,
                        (Some(_), None) => false,
                        (Some(p), Some(c)) => time_start(dt, c) != time_start(&p, c),
                    };
                    prev = Some(*dt);
                }
                Self::Time {
                    parsed,
                    keyed,
                    scale,
                }
            }
        }
    }

    fn apply(
        &self,
        raw: &str,
        index: usize,
        width: f64,
        style: &TextStyle,
        measurer: &dyn TextMeasurer,
    ) -> String {
        match self {
            Self::Text => ellipsis_text(raw, width, style, measurer),
            Self::Number { widest } => match widest {
                Some(v) => NumericNotation::pick(*v, width, style, measurer).apply(raw),
                None => raw.to_string(),
            },
            Self::Time {
                parsed,
                keyed,
                scale,
            } => match parsed.get(index).copied().flatten() {
                Some(dt) => {
                    let mask = if keyed.get(index).copied().unwrap_or(false) {
                        key_mask(*scale)
                    } else {
                        pick_mask(common_masks(*scale), width, style, measurer)
                    };
                    dt.format(mask)
                }
                None => raw.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::format;
    use alloc::string::ToString;

    use super::*;
    use crate::coord::LinearCoord;
    use crate::text::HeuristicTextMeasurer;

    fn linear(width: f64) -> AxisCoord {
        AxisCoord::from(LinearCoord::new((0.0, 0.0), (width, 0.0)))
    }

    fn inputs_with_texts(texts: &[&str]) -> Vec<TickInput> {
        let n = texts.len();
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| TickInput::new(i as f64 / (n - 1) as f64).with_text(*t))
            .collect()
    }

    /// A label spec with every adjustment pass off, for geometry tests.
    fn plain_label() -> LabelSpec {
        LabelSpec {
            auto_rotate: false,
            auto_hide: false,
            auto_ellipsis: false,
            ..LabelSpec::default()
        }
    }

    #[test]
    fn assembly_generates_all_node_kinds() {
        let spec = AxisSpec::new(linear(100.0))
            .with_sub_tick_line(SubTickSpec {
                count: 2,
                ..SubTickSpec::default()
            })
            .with_label(plain_label());
        let mut axis = Axis::new(spec);
        axis.update(
            &inputs_with_texts(&["a", "b", "c", "d", "e"]),
            &HeuristicTextMeasurer,
        );

        assert_eq!(axis.ticks().len(), 5);
        assert_eq!(axis.tick_lines().len(), 5);
        assert_eq!(axis.labels().len(), 5);
        // Two sub-ticks per gap, four gaps, none after the last tick.
        assert_eq!(axis.sub_tick_lines().len(), 8);
        assert!(axis.line_path().is_some());

        // Labels sit past the tick end: tick len 5 + label offset 4.
        for label in axis.labels() {
            assert_eq!(label.pos.y, 9.0);
            assert!(label.visible);
        }
        let mut prev = f64::NEG_INFINITY;
        for label in axis.labels() {
            assert!(label.pos.x > prev);
            prev = label.pos.x;
        }
    }

    #[test]
    fn sub_ticks_skip_zero_length_gaps() {
        let spec = AxisSpec::new(linear(100.0)).with_sub_tick_line(SubTickSpec {
            count: 3,
            ..SubTickSpec::default()
        });
        let mut axis = Axis::new(spec);
        let input = [
            TickInput::new(0.0),
            TickInput::new(0.5),
            TickInput::new(0.5),
            TickInput::new(1.0),
        ];
        axis.update(&input, &HeuristicTextMeasurer);
        // Three gaps, one of which is zero length.
        assert_eq!(axis.sub_tick_lines().len(), 6);
    }

    #[test]
    fn append_tick_closes_the_axis() {
        let spec = AxisSpec::new(linear(100.0))
            .with_tick_line(TickLineSpec {
                append_tick: true,
                ..TickLineSpec::default()
            })
            .with_label(plain_label());
        let mut axis = Axis::new(spec);
        axis.update(
            &[TickInput::new(0.0), TickInput::new(0.5)],
            &HeuristicTextMeasurer,
        );

        assert_eq!(axis.ticks().len(), 3);
        let appended = &axis.ticks()[2];
        assert_eq!(appended.value, 1.0);
        assert_eq!(appended.id, "2");
        assert_eq!(appended.text, "");
        assert_eq!(axis.tick_lines().len(), 3);
        assert_eq!(axis.labels()[2].text, "");
    }

    #[test]
    fn band_labels_center_between_ticks() {
        let spec = AxisSpec::new(linear(100.0)).with_label(LabelSpec {
            align_tick: false,
            ..plain_label()
        });
        let mut axis = Axis::new(spec);
        axis.update(
            &[TickInput::new(0.0).with_text("a"), TickInput::new(0.5).with_text("b")],
            &HeuristicTextMeasurer,
        );
        // Midpoints of [0, 0.5] and [0.5, 1] on a 100-wide axis.
        assert_eq!(axis.labels()[0].pos.x, 25.0);
        assert_eq!(axis.labels()[1].pos.x, 75.0);
    }

    #[test]
    fn formatter_feeds_the_label_text() {
        let spec = AxisSpec::new(linear(100.0)).with_label(LabelSpec {
            formatter: Some(Arc::new(|t: &TickDatum| format!("<{}>", t.text))),
            ..plain_label()
        });
        let mut axis = Axis::new(spec);
        axis.update(&inputs_with_texts(&["a", "b"]), &HeuristicTextMeasurer);
        assert_eq!(axis.labels()[0].text, "<a>");
        assert_eq!(axis.labels()[0].raw_text, "<a>");
    }

    #[test]
    fn crowded_wide_labels_hide_at_stride_two() {
        // Seven 3-glyph CJK labels at 20px are 60 wide on band centers
        // 300/7 ≈ 42.9 apart: stride 1 collides, stride 2 clears.
        let texts = ["星期一", "星期二", "星期三", "星期四", "星期五", "星期六", "星期日"];
        let input: Vec<TickInput> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| TickInput::new((i as f64 + 0.5) / 7.0).with_text(*t))
            .collect();
        let spec = AxisSpec::new(linear(300.0)).with_label(LabelSpec {
            style: TextStyle::new(20.0),
            auto_rotate: false,
            auto_ellipsis: false,
            ..LabelSpec::default()
        });
        let mut axis = Axis::new(spec);
        axis.update(&input, &HeuristicTextMeasurer);

        let visible: Vec<usize> = axis
            .labels()
            .iter()
            .enumerate()
            .filter(|(_, l)| l.visible)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(visible, [0, 2, 4, 6]);
        assert!(!axis.labels_overlapping(&HeuristicTextMeasurer));

        // Tick lines hide with their labels.
        for (i, tick_line) in axis.tick_lines().iter().enumerate() {
            assert_eq!(tick_line.visible, i % 2 == 0, "tick line {i}");
        }
    }

    #[test]
    fn auto_hide_keeps_tick_lines_when_told_to() {
        let texts = ["星期一", "星期二", "星期三", "星期四", "星期五", "星期六", "星期日"];
        let spec = AxisSpec::new(linear(300.0)).with_label(LabelSpec {
            style: TextStyle::new(20.0),
            auto_rotate: false,
            auto_ellipsis: false,
            auto_hide_tick_line: false,
            ..LabelSpec::default()
        });
        let mut axis = Axis::new(spec);
        axis.update(&inputs_with_texts(&texts), &HeuristicTextMeasurer);
        assert!(axis.tick_lines().iter().all(|t| t.visible));
        assert!(axis.labels().iter().any(|l| !l.visible));
    }

    #[test]
    fn auto_hide_always_keeps_first_and_last() {
        // Four huge labels: no stride is admissible (the search stops at
        // seq < len - 2), so only the endpoints survive.
        let spec = AxisSpec::new(linear(90.0)).with_label(LabelSpec {
            style: TextStyle::new(20.0),
            auto_rotate: false,
            auto_ellipsis: false,
            ..LabelSpec::default()
        });
        let mut axis = Axis::new(spec);
        axis.update(
            &inputs_with_texts(&["aaaaaaaa", "bbbbbbbb", "cccccccc", "dddddddd"]),
            &HeuristicTextMeasurer,
        );
        let visible: Vec<bool> = axis.labels().iter().map(|l| l.visible).collect();
        assert_eq!(visible, [true, false, false, true]);
    }

    #[test]
    fn auto_hide_leaves_fitting_labels_alone() {
        let spec = AxisSpec::new(linear(300.0)).with_label(LabelSpec {
            auto_rotate: false,
            auto_ellipsis: false,
            ..LabelSpec::default()
        });
        let mut axis = Axis::new(spec);
        axis.update(&inputs_with_texts(&["a", "b", "c"]), &HeuristicTextMeasurer);
        assert!(axis.labels().iter().all(|l| l.visible));
    }

    #[test]
    fn auto_rotate_finds_the_first_clearing_angle() {
        // "abcdef" at 10px is 36 wide on ticks 25 apart: flat and 30°/60°
        // still collide, 90° fits.
        let spec = AxisSpec::new(linear(100.0)).with_label(LabelSpec {
            rotate_range: (0.0, 91.0),
            rotate_step: 30.0,
            auto_hide: false,
            auto_ellipsis: false,
            ..LabelSpec::default()
        });
        let mut axis = Axis::new(spec);
        axis.update(
            &inputs_with_texts(&["abcdef", "abcdef", "abcdef", "abcdef", "abcdef"]),
            &HeuristicTextMeasurer,
        );
        assert_eq!(axis.label_angle(), 90.0);
        assert!(!axis.labels_overlapping(&HeuristicTextMeasurer));
        // Downward normal, positive angle: labels lead with their start edge.
        for label in axis.labels() {
            assert_eq!(label.anchor, TextAnchor::Start);
            assert_eq!(label.angle, 90.0);
        }
    }

    #[test]
    fn auto_rotate_restores_the_angle_when_nothing_fits() {
        let spec = AxisSpec::new(linear(40.0)).with_label(LabelSpec {
            rotate_range: (0.0, 90.0),
            rotate_step: 30.0,
            auto_hide: false,
            auto_ellipsis: false,
            ..LabelSpec::default()
        });
        let mut axis = Axis::new(spec);
        // 60-wide labels 10 apart cannot be fixed by rotation alone.
        axis.update(
            &inputs_with_texts(&["aaaaaaaaaa", "bbbbbbbbbb", "cccccccccc", "dddddddddd", "eeeeeeeeee"]),
            &HeuristicTextMeasurer,
        );
        assert_eq!(axis.label_angle(), 0.0);
        assert!(axis.labels_overlapping(&HeuristicTextMeasurer));
    }

    #[test]
    fn manual_rotate_suppresses_the_search() {
        let spec = AxisSpec::new(linear(100.0)).with_label(LabelSpec {
            rotate: Some(45.0),
            auto_hide: false,
            auto_ellipsis: false,
            ..LabelSpec::default()
        });
        let mut axis = Axis::new(spec);
        axis.update(
            &inputs_with_texts(&["abcdef", "abcdef", "abcdef", "abcdef", "abcdef"]),
            &HeuristicTextMeasurer,
        );
        assert_eq!(axis.label_angle(), 45.0);
        for label in axis.labels() {
            assert_eq!(label.angle, 45.0);
            assert_eq!(label.anchor, TextAnchor::Start);
        }
    }

    #[test]
    fn auto_ellipsis_shortens_until_labels_fit() {
        let spec = AxisSpec::new(linear(100.0)).with_label(LabelSpec {
            auto_rotate: false,
            auto_hide: false,
            max_length: 60.0,
            min_length: 10.0,
            ellipsis_step: 10.0,
            ..LabelSpec::default()
        });
        let mut axis = Axis::new(spec);
        axis.update(
            &inputs_with_texts(&["abcdefghijkl", "abcdefghijkl", "abcdefghijkl"]),
            &HeuristicTextMeasurer,
        );
        // Widths 60 and 50 still collide on ticks 50 apart; 40 clears.
        for label in axis.labels() {
            assert_eq!(label.text, "abc...");
            assert_eq!(label.raw_text, "abcdefghijkl");
        }
        assert!(!axis.labels_overlapping(&HeuristicTextMeasurer));
    }

    #[test]
    fn auto_ellipsis_applies_min_length_on_exhaustion() {
        let spec = AxisSpec::new(linear(30.0)).with_label(LabelSpec {
            auto_rotate: false,
            auto_hide: false,
            max_length: 30.0,
            min_length: 20.0,
            ellipsis_step: 5.0,
            ..LabelSpec::default()
        });
        let mut axis = Axis::new(spec);
        axis.update(
            &inputs_with_texts(&["abcdefgh", "abcdefgh", "abcdefgh"]),
            &HeuristicTextMeasurer,
        );
        // At the 20-wide floor only the marker fits; the overlap remains.
        for label in axis.labels() {
            assert_eq!(label.text, "...");
        }
        assert!(axis.labels_overlapping(&HeuristicTextMeasurer));
    }

    #[test]
    fn max_length_caps_labels_even_without_overlap() {
        let spec = AxisSpec::new(linear(500.0)).with_label(LabelSpec {
            auto_rotate: false,
            auto_hide: false,
            max_length: 30.0,
            min_length: 10.0,
            ..LabelSpec::default()
        });
        let mut axis = Axis::new(spec);
        // A lone 96-wide label overlaps nothing but still exceeds the cap.
        axis.update(
            &[TickInput::new(0.5).with_text("abcdefghijklmnop")],
            &HeuristicTextMeasurer,
        );
        assert_eq!(axis.labels()[0].text, "ab...");
        assert_eq!(axis.labels()[0].raw_text, "abcdefghijklmnop");
    }

    #[test]
    fn unbounded_max_length_disables_ellipsis() {
        let spec = AxisSpec::new(linear(30.0)).with_label(LabelSpec {
            auto_rotate: false,
            auto_hide: false,
            ..LabelSpec::default()
        });
        let mut axis = Axis::new(spec);
        axis.update(
            &inputs_with_texts(&["abcdefgh", "abcdefgh"]),
            &HeuristicTextMeasurer,
        );
        assert_eq!(axis.labels()[0].text, "abcdefgh");
    }

    #[test]
    fn numeric_labels_share_one_notation() {
        let spec = AxisSpec::new(linear(60.0)).with_label(LabelSpec {
            kind: LabelKind::Number,
            auto_rotate: false,
            auto_hide: false,
            max_length: 40.0,
            min_length: 10.0,
            ellipsis_step: 10.0,
            ..LabelSpec::default()
        });
        let mut axis = Axis::new(spec);
        axis.update(
            &inputs_with_texts(&["1000", "500000", "100000000"]),
            &HeuristicTextMeasurer,
        );
        // Neither grouping nor K-notation fits the widest label in 40, so
        // every label renders scientific.
        let texts: Vec<&str> = axis.labels().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["1e+3", "5e+5", "1e+8"]);
        assert!(!axis.labels_overlapping(&HeuristicTextMeasurer));
    }

    #[test]
    fn time_labels_keep_full_context_at_rollovers() {
        let texts = [
            "2025-12-30",
            "2025-12-31",
            "2026-01-01",
            "2026-01-02",
        ];
        let spec = AxisSpec::new(linear(160.0)).with_label(LabelSpec {
            kind: LabelKind::Time,
            auto_rotate: false,
            auto_hide: false,
            max_length: 40.0,
            min_length: 10.0,
            ellipsis_step: 10.0,
            ..LabelSpec::default()
        });
        let mut axis = Axis::new(spec);
        axis.update(&inputs_with_texts(&texts), &HeuristicTextMeasurer);

        // Day granularity: the first label and the month rollover keep the
        // year-down key mask, the rest shorten to the common mask.
        let texts: Vec<&str> = axis.labels().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts[0], "2025-12-30");
        assert_eq!(texts[2], "2026-01-01");
        assert!(texts[1] == "12-31" || texts[1] == "31");
        assert!(texts[3] == "01-02" || texts[3] == "02");
    }

    #[test]
    fn shorten_strategy_is_usable_directly() {
        let spec = AxisSpec::new(linear(100.0)).with_label(plain_label());
        let mut axis = Axis::new(spec);
        axis.update(&inputs_with_texts(&["abcdefgh", "b"]), &HeuristicTextMeasurer);
        let shorten = axis.label_shorten_strategy(30.0, &HeuristicTextMeasurer);
        assert_eq!(shorten("abcdefgh", 0), "ab...");
        assert_eq!(shorten("b", 1), "b");
    }

    #[test]
    fn title_follows_position_and_tangent() {
        let title = AxisTitleSpec {
            offset: Vec2::new(0.0, 20.0),
            ..AxisTitleSpec::new("month")
        };
        let spec = AxisSpec::new(linear(100.0)).with_title(title);
        let axis = Axis::new(spec);
        let node = axis.title().unwrap();
        assert_eq!(node.pos, Point::new(50.0, 20.0));
        assert_eq!(node.angle, 0.0);
        assert_eq!(node.anchor, TextAnchor::Middle);

        let mut spec = AxisSpec::new(linear(100.0));
        spec.title = Some(AxisTitleSpec {
            position: TitlePosition::End,
            rotate: Some(30.0),
            ..AxisTitleSpec::new("month")
        });
        let node = Axis::new(spec).title().unwrap();
        assert_eq!(node.pos, Point::new(100.0, 0.0));
        assert_eq!(node.angle, 30.0);
        assert_eq!(node.anchor, TextAnchor::End);
    }

    #[test]
    fn title_rotates_along_a_vertical_axis() {
        let coord = AxisCoord::from(LinearCoord::new((0.0, 0.0), (0.0, 100.0)));
        let spec = AxisSpec::new(coord).with_title(AxisTitleSpec::new("value"));
        let node = Axis::new(spec).title().unwrap();
        assert_eq!(node.angle, 90.0);
    }

    #[test]
    fn arrows_point_out_of_the_axis() {
        let spec = AxisSpec::new(linear(100.0)).with_line(LineSpec {
            arrow_start: Some(ArrowSpec { size: 8.0 }),
            arrow_end: Some(ArrowSpec::default()),
            ..LineSpec::default()
        });
        let arrows = Axis::new(spec).arrows();
        assert_eq!(arrows.len(), 2);
        assert_eq!(arrows[0].pos, Point::new(0.0, 0.0));
        assert_eq!(arrows[0].angle, 180.0);
        assert_eq!(arrows[0].size, 8.0);
        assert_eq!(arrows[1].pos, Point::new(100.0, 0.0));
        assert_eq!(arrows[1].angle, 0.0);
    }

    #[test]
    fn set_spec_rebuilds_from_stored_ticks() {
        let mut axis = Axis::new(AxisSpec::new(linear(100.0)).with_label(plain_label()));
        axis.update(&inputs_with_texts(&["a", "b", "c"]), &HeuristicTextMeasurer);
        assert_eq!(axis.labels().len(), 3);

        let mut spec = axis.spec().clone();
        spec.label = None;
        axis.set_spec(spec, &HeuristicTextMeasurer);
        assert!(axis.labels().is_empty());
        assert_eq!(axis.ticks().len(), 3);
    }

    #[test]
    fn down_sampling_thins_labels_with_ticks() {
        let spec = AxisSpec::new(linear(100.0))
            .with_ticks_threshold(3)
            .with_label(plain_label());
        let mut axis = Axis::new(spec);
        let input: Vec<TickInput> = (0..6)
            .map(|i| TickInput::new(i as f64 / 5.0).with_text(i.to_string()))
            .collect();
        axis.update(&input, &HeuristicTextMeasurer);
        assert_eq!(axis.ticks().len(), 3);
        assert_eq!(axis.labels().len(), 3);
        assert_eq!(axis.tick_lines().len(), 3);
    }
}
