//! Section specifiers and their normalization to pixel ranges.
//!
//! A section is an ordered list of per-axis specifiers in header order
//! (axis 1 first — the reverse of the array's storage order). Normalization
//! turns each specifier into a fully-resolved 1-based `(start, end, step)`
//! range; it is pure arithmetic and performs no bounds checking, so a
//! normalized range may land outside the axis. The cropper decides whether
//! that means "empty axis" or an error.

use crate::error::{Error, Result};

/// One per-axis section specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisSpec {
    /// The whole axis: `*`, or `-*` to reverse. An optional stride follows
    /// after a colon; the `reverse` flag supplies the traversal sign.
    Wildcard { reverse: bool, step: Option<i64> },
    /// An explicit `start:end` or `start:end:step` range. Negative positions
    /// count from the end of the axis (`-1` is the last pixel). Absent
    /// components (possible when built programmatically) default by step
    /// direction during normalization.
    Range {
        start: Option<i64>,
        end: Option<i64>,
        step: Option<i64>,
    },
    /// Bare-count shorthand: the first `n` pixels if positive, the last
    /// `|n|` pixels (in reverse order) if negative, no pixels if zero.
    Count(i64),
}

impl AxisSpec {
    /// The whole-axis default used for axes a section does not mention.
    pub const WHOLE: AxisSpec = AxisSpec::Range {
        start: None,
        end: None,
        step: None,
    };

    /// Build an explicit range specifier.
    pub fn range(start: i64, end: i64, step: Option<i64>) -> AxisSpec {
        AxisSpec::Range {
            start: Some(start),
            end: Some(end),
            step,
        }
    }

    /// Parse one textual section item.
    ///
    /// Grammar: `*` or `-*` (optionally followed by `:step`), or
    /// `start:end` / `start:end:step`. Positions are signed integers; the
    /// step is a signed non-zero integer. No whitespace is allowed inside
    /// an item.
    pub fn parse(item: &str) -> Result<AxisSpec> {
        parse_item(item).ok_or_else(|| Error::Parse(String::from(item)))
    }
}

/// Grammar-level item parse; `None` means "does not match".
pub(crate) fn parse_item(item: &str) -> Option<AxisSpec> {
    let mut parts = item.split(':');
    let first = parts.next()?;

    if first == "*" || first == "-*" {
        let reverse = first.starts_with('-');
        let step = match parts.next() {
            Some(s) => Some(parse_step(s)?),
            None => None,
        };
        if parts.next().is_some() {
            return None;
        }
        return Some(AxisSpec::Wildcard { reverse, step });
    }

    let start = parse_position(first)?;
    let end = parse_position(parts.next()?)?;
    let step = match parts.next() {
        Some(s) => Some(parse_step(s)?),
        None => None,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(AxisSpec::range(start, end, step))
}

/// A signed integer position: `[-+]?\d+`.
fn parse_position(s: &str) -> Option<i64> {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// A signed non-zero integer stride.
fn parse_step(s: &str) -> Option<i64> {
    let v = parse_position(s)?;
    (v != 0).then_some(v)
}

/// A fully-resolved per-axis range: 1-based pixel positions, end-inclusive
/// in the traversal direction, with a non-zero step.
///
/// `start`/`end` are not clipped to the axis: values outside `1..=len`, or
/// an inverted range (`(end - start) * step < 0`), signal an empty or
/// out-of-range result to the cropper rather than being an error here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRange {
    /// First pixel in traversal order (1 = first pixel of the axis).
    pub start: i64,
    /// Last pixel in traversal order, inclusive.
    pub end: i64,
    /// Stride; negative traverses the axis backwards.
    pub step: i64,
}

/// Normalize one specifier against an axis of `nx` pixels.
///
/// Explicit steps must be non-zero (the textual grammar already rejects
/// a literal `0`).
pub fn normalize_axis(spec: &AxisSpec, nx: usize) -> PixelRange {
    let nx = nx as i64;

    let (start, end, step) = match *spec {
        AxisSpec::Wildcard { reverse, step } => {
            let d = step.unwrap_or(1) * if reverse { -1 } else { 1 };
            (None, None, d)
        }
        AxisSpec::Range { start, end, step } => (start, end, step.unwrap_or(1)),
        AxisSpec::Count(n) => {
            if n == 0 {
                // explicit empty-axis encoding, kept as-is downstream
                (Some(1), Some(0), 1)
            } else {
                (None, Some(n), if n < 0 { -1 } else { 1 })
            }
        }
    };
    debug_assert!(step != 0);

    PixelRange {
        start: resolve_position(start, -step, nx),
        end: resolve_position(end, step, nx),
        step,
    }
}

/// Resolve one optional position against the axis length.
///
/// An absent position falls to the head or tail of the axis by the sign of
/// `d` (`d < 0` → head). A negative position counts from the end, so `-1`
/// becomes `nx`. Zero and positive values pass through unchanged; 1 is
/// already the first pixel.
fn resolve_position(pos: Option<i64>, d: i64, nx: i64) -> i64 {
    match pos {
        None => {
            if d < 0 {
                1
            } else {
                nx
            }
        }
        Some(p) if p < 0 => p + nx + 1,
        Some(p) => p,
    }
}

/// Normalize a section against per-axis lengths in header order.
///
/// Returns one range per axis. Axes the section does not mention default to
/// the whole axis with step 1. A section naming more axes than exist fails
/// with [`Error::IndexOutOfRange`].
pub fn normalize_section(specs: &[AxisSpec], naxes: &[usize]) -> Result<Vec<PixelRange>> {
    if specs.len() > naxes.len() {
        return Err(Error::IndexOutOfRange {
            index: specs.len() as i64,
            len: naxes.len(),
        });
    }

    Ok(naxes
        .iter()
        .enumerate()
        .map(|(i, &nx)| normalize_axis(specs.get(i).unwrap_or(&AxisSpec::WHOLE), nx))
        .collect())
}
