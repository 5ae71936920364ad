// Copyright 2026 the AxisGuide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Calendar-date label shortening primitives.
//!
//! Time labels are shortened by dropping fields rather than glyphs: a run of
//! labels a minute apart keeps `HH:MM` and drops the shared date. The
//! primitives here are a small naive datetime (no time zones, no calendar
//! arithmetic), a field-range mask formatter, and the per-granularity mask
//! tables. The axis pipeline decides which label gets which mask.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use crate::text::{TextMeasurer, TextStyle};

/// A calendar field, ordered coarse to fine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeUnit {
    /// Calendar year.
    Year,
    /// Month of year, 1-12.
    Month,
    /// Day of month, 1-31.
    Day,
    /// Hour of day, 0-23.
    Hour,
    /// Minute of hour, 0-59.
    Minute,
    /// Second of minute, 0-59.
    Second,
}

impl TimeUnit {
    const ALL: [Self; 6] = [
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
    ];
}

/// An inclusive coarse-to-fine range of fields to render.
pub type TimeMask = (TimeUnit, TimeUnit);

/// A naive broken-down datetime. No time zone, no calendar arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DateTime {
    /// Calendar year.
    pub year: i32,
    /// Month of year, 1-12.
    pub month: u8,
    /// Day of month, 1-31.
    pub day: u8,
    /// Hour of day, 0-23.
    pub hour: u8,
    /// Minute of hour, 0-59.
    pub minute: u8,
    /// Second of minute, 0-59.
    pub second: u8,
}

impl DateTime {
    /// 1970-01-01 00:00:00, used as the width-measurement specimen.
    pub const EPOCH: Self = Self {
        year: 1970,
        month: 1,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Parses `YYYY[-MM[-DD[ HH:MM[:SS]]]]`, with `/` accepted in dates.
    ///
    /// Missing fields default to the start of their range. Returns `None`
    /// for anything that fails to parse or falls out of range.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (date, time) = match s.split_once(' ') {
            Some((d, t)) => (d, Some(t.trim())),
            None => (s, None),
        };

        let mut date_parts = date.split(['-', '/']);
        let year = date_parts.next()?.parse::<i32>().ok()?;
        let month = match date_parts.next() {
            Some(p) => p.parse::<u8>().ok()?,
            None => 1,
        };
        let day = match date_parts.next() {
            Some(p) => p.parse::<u8>().ok()?,
            None => 1,
        };
        if date_parts.next().is_some() || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }

        let (hour, minute, second) = match time {
            None => (0, 0, 0),
            Some(t) => {
                let mut time_parts = t.split(':');
                let hour = time_parts.next()?.parse::<u8>().ok()?;
                let minute = time_parts.next()?.parse::<u8>().ok()?;
                let second = match time_parts.next() {
                    Some(p) => p.parse::<u8>().ok()?,
                    None => 0,
                };
                if time_parts.next().is_some() || hour > 23 || minute > 59 || second > 59 {
                    return None;
                }
                (hour, minute, second)
            }
        };

        Some(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    fn field(&self, unit: TimeUnit) -> i64 {
        match unit {
            TimeUnit::Year => i64::from(self.year),
            TimeUnit::Month => i64::from(self.month),
            TimeUnit::Day => i64::from(self.day),
            TimeUnit::Hour => i64::from(self.hour),
            TimeUnit::Minute => i64::from(self.minute),
            TimeUnit::Second => i64::from(self.second),
        }
    }

    /// Renders the fields selected by `mask`.
    ///
    /// Date fields join with `-`, time fields with `:`, and the two groups
    /// with a space: `(Month, Minute)` on the epoch gives `"01-01 00:00"`.
    pub fn format(&self, mask: TimeMask) -> String {
        let (from, to) = mask;
        let mut out = String::new();
        for unit in TimeUnit::ALL {
            if unit < from || unit > to {
                continue;
            }
            if !out.is_empty() {
                out.push(if unit <= TimeUnit::Day {
                    '-'
                } else if unit == TimeUnit::Hour {
                    ' '
                } else {
                    ':'
                });
            }
            match unit {
                TimeUnit::Year => out.push_str(&alloc::format!("{:04}", self.year)),
                unit => out.push_str(&alloc::format!("{:02}", self.field(unit))),
            }
        }
        out
    }
}

/// Returns the coarsest field on which `a` and `b` differ.
///
/// Equal datetimes report [`TimeUnit::Second`].
pub fn time_scale(a: &DateTime, b: &DateTime) -> TimeUnit {
    for unit in TimeUnit::ALL {
        if a.field(unit) != b.field(unit) {
            return unit;
        }
    }
    TimeUnit::Second
}

/// Returns the finest scale found between consecutive parseable datetimes.
pub(crate) fn sequence_scale(datetimes: &[Option<DateTime>]) -> TimeUnit {
    let mut scale = TimeUnit::Year;
    let mut prev: Option<&DateTime> = None;
    for dt in datetimes.iter().flatten() {
        if let Some(p) = prev {
            scale = scale.max(time_scale(p, dt));
        }
        prev = Some(dt);
    }
    scale
}

/// Candidate masks for a granularity, widest first.
pub fn common_masks(scale: TimeUnit) -> &'static [TimeMask] {
    use TimeUnit::*;
    match scale {
        Year | Month => &[(Year, Day), (Month, Day), (Day, Day)],
        Day => &[(Month, Day), (Day, Day)],
        Hour => &[(Hour, Second), (Hour, Minute), (Hour, Hour)],
        Minute => &[(Hour, Second), (Minute, Second), (Second, Second)],
        Second => &[(Minute, Second), (Second, Second)],
    }
}

/// The mask a rollover label uses: full context from the year down to the
/// finest field the common masks show.
pub fn key_mask(scale: TimeUnit) -> TimeMask {
    let finest = common_masks(scale)
        .iter()
        .map(|&(_, to)| to)
        .max()
        .unwrap_or(TimeUnit::Second);
    (TimeUnit::Year, finest)
}

/// Returns the unit one step coarser, `None` above [`TimeUnit::Year`].
pub(crate) fn coarser(unit: TimeUnit) -> Option<TimeUnit> {
    match unit {
        TimeUnit::Year => None,
        TimeUnit::Month => Some(TimeUnit::Year),
        TimeUnit::Day => Some(TimeUnit::Month),
        TimeUnit::Hour => Some(TimeUnit::Day),
        TimeUnit::Minute => Some(TimeUnit::Hour),
        TimeUnit::Second => Some(TimeUnit::Minute),
    }
}

/// Truncates a datetime to `scale`: every finer field resets to its start.
///
/// Two labels share a `time_start` at some scale exactly when no coarser
/// field rolled over between them.
pub fn time_start(dt: &DateTime, scale: TimeUnit) -> DateTime {
    let mut out = *dt;
    if scale < TimeUnit::Second {
        out.second = 0;
    }
    if scale < TimeUnit::Minute {
        out.minute = 0;
    }
    if scale < TimeUnit::Hour {
        out.hour = 0;
    }
    if scale < TimeUnit::Day {
        out.day = 1;
    }
    if scale < TimeUnit::Month {
        out.month = 1;
    }
    out
}

/// Picks the first mask whose epoch rendering fits `width`, else the tersest.
pub(crate) fn pick_mask(
    masks: &[TimeMask],
    width: f64,
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
) -> TimeMask {
    for &mask in masks {
        if measurer.measure(&DateTime::EPOCH.format(mask), style).advance_width <= width {
            return mask;
        }
    }
    masks
        .last()
        .copied()
        .unwrap_or((TimeUnit::Second, TimeUnit::Second))
}

/// Parses every label text, `None` where a text is not a datetime.
pub(crate) fn parse_all(texts: impl Iterator<Item = impl AsRef<str>>) -> Vec<Option<DateTime>> {
    texts.map(|t| DateTime::parse(t.as_ref())).collect()
}
