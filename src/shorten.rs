// Copyright 2026 the AxisGuide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text shortening: plain ellipsis truncation and numeric notations.
//!
//! Auto-ellipsis shortens label text to fit an allowed width. Plain text is
//! truncated glyph by glyph with a `...` marker; numeric labels instead
//! switch notation wholesale (thousands grouping, then K-abbreviation, then
//! scientific), with one notation shared by every label on the axis so a
//! column of `1,200 / 3.4K`-style mixtures can never appear.

extern crate alloc;

use alloc::string::{String, ToString};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::text::{TextMeasurer, TextStyle};

/// The truncation marker appended by [`ellipsis_text`].
pub const ELLIPSIS: &str = "...";

/// Truncates `text` so that it fits `width`, appending [`ELLIPSIS`].
///
/// Text that already fits is returned unchanged. When not even one glyph
/// fits alongside the marker, the marker alone is returned; the result never
/// grows as `width` shrinks.
pub fn ellipsis_text(
    text: &str,
    width: f64,
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
) -> String {
    if measurer.measure(text, style).advance_width <= width {
        return text.to_string();
    }
    let marker_width = measurer.measure(ELLIPSIS, style).advance_width;

    let mut out = String::new();
    let mut used = 0.0;
    let mut glyph = [0_u8; 4];
    for c in text.chars() {
        let advance = measurer
            .measure(c.encode_utf8(&mut glyph), style)
            .advance_width;
        if used + advance + marker_width > width {
            break;
        }
        out.push(c);
        used += advance;
    }
    out.push_str(ELLIPSIS);
    out
}

/// Formats a number with thousands grouping: `1234567.5` → `"1,234,567.5"`.
///
/// Values whose default rendering is not a plain digit run (non-finite, or
/// an exponent-form fallback) pass through ungrouped.
pub fn to_thousands(n: f64) -> String {
    let s = alloc::format!("{n}");
    match s.split_once('.') {
        Some((int, frac)) => alloc::format!("{}.{frac}", group_digits(int)),
        None => group_digits(&s),
    }
}

/// Formats a number in K-notation: `123456` → `"123.5K"` (one decimal).
///
/// With zero decimals the value is rounded to a whole number of thousands.
pub fn to_k_notation(n: f64, decimals: usize) -> String {
    let v = n / 1000.0;
    if decimals == 0 {
        let s = alloc::format!("{}", v.round());
        return alloc::format!("{}K", group_digits(&s));
    }
    let s = alloc::format!("{v:.decimals$}");
    match s.split_once('.') {
        Some((int, frac)) => alloc::format!("{}.{frac}K", group_digits(int)),
        None => alloc::format!("{}K", group_digits(&s)),
    }
}

/// Formats a number in scientific notation: `100000000` → `"1e+8"`.
///
/// The mantissa keeps at most two decimals, trimmed of trailing zeros.
pub fn to_scientific(n: f64) -> String {
    if n == 0.0 || !n.is_finite() {
        return alloc::format!("{n}");
    }
    let sign = if n < 0.0 { "-" } else { "" };
    let mut mantissa = n.abs();
    let mut exp = 0_i32;
    while mantissa >= 10.0 {
        mantissa /= 10.0;
        exp += 1;
    }
    while mantissa < 1.0 {
        mantissa *= 10.0;
        exp -= 1;
    }
    mantissa = (mantissa * 100.0).round() / 100.0;
    if mantissa >= 10.0 {
        mantissa /= 10.0;
        exp += 1;
    }
    let exp_sign = if exp < 0 { '-' } else { '+' };
    alloc::format!("{sign}{mantissa}e{exp_sign}{}", exp.abs())
}

fn group_digits(int: &str) -> String {
    let (sign, digits) = match int.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return int.to_string();
    }
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 + 1);
    out.push_str(sign);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Which numeric rendering all labels on an axis share.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumericNotation {
    /// Thousands-grouped full number.
    Thousands,
    /// K-abbreviated notation with one decimal.
    KNotation,
    /// Scientific notation.
    Scientific,
}

impl NumericNotation {
    /// Picks the widest notation whose rendering of `widest_value` fits
    /// `width`, falling back to scientific.
    ///
    /// `widest_value` should be the value of the longest label, so the chosen
    /// notation fits every label on the axis.
    pub fn pick(
        widest_value: f64,
        width: f64,
        style: &TextStyle,
        measurer: &dyn TextMeasurer,
    ) -> Self {
        let fits = |s: &str| measurer.measure(s, style).advance_width <= width;
        if fits(&to_thousands(widest_value)) {
            Self::Thousands
        } else if fits(&to_k_notation(widest_value, 1)) {
            Self::KNotation
        } else {
            Self::Scientific
        }
    }

    /// Renders a label's text under this notation.
    ///
    /// Text that does not parse as a number passes through unchanged.
    pub fn apply(self, text: &str) -> String {
        let Ok(n) = text.parse::<f64>() else {
            return text.to_string();
        };
        match self {
            Self::Thousands => to_thousands(n),
            Self::KNotation => to_k_notation(n, 1),
            Self::Scientific => to_scientific(n),
        }
    }
}
