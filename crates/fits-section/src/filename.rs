//! Extended file reference parsing.
//!
//! A reference is a base filename followed by up to two bracketed selector
//! groups: an HDU selector and an image section, in that order, e.g.
//! `img.fits[SCI,2][10:20,-*]`. Matching is greedy-leftmost: the base name
//! is everything before the first bracket group from which the rest of the
//! string parses as selectors. Bracket groups embedded in the path that
//! match neither grammar stay part of the base name; a trailing group that
//! matches neither rejects the whole reference.
//!
//! A lone trailing group is tried as a section first, then as an HDU
//! selector, so `[-5:-1]` selects pixels rather than an extension named
//! `-5:-1`; by-index selectors like `[2]` are unaffected because a bare
//! integer is not valid section syntax.

use crate::error::{Error, Result};
use crate::hdu::{locate_hdu, Extension, HduKind, HduSelector};
use crate::section::{parse_item, AxisSpec};

/// A parsed extended file reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedFilename {
    /// The base filename, with any non-selector brackets intact.
    pub filename: String,
    /// The HDU selector, if the reference carried one.
    pub hdu: Option<HduSelector>,
    /// The section specifiers in header-axis order, if present.
    pub section: Option<Vec<AxisSpec>>,
}

impl ExtendedFilename {
    /// Parse an extended file reference.
    pub fn parse(reference: &str) -> Result<ExtendedFilename> {
        let mut search = 0;
        while let Some(offset) = reference[search..].find('[') {
            let at = search + offset;
            if let Some((hdu, section)) = parse_selector_suffix(&reference[at..]) {
                return Ok(ExtendedFilename {
                    filename: String::from(&reference[..at]),
                    hdu,
                    section,
                });
            }
            search = at + 1;
        }

        // a trailing group that matched neither grammar rejects the whole
        // reference; anything else is just a filename
        if reference.trim_end().ends_with(']') {
            if let Some(at) = reference.rfind('[') {
                return Err(Error::Parse(String::from(reference[at..].trim_end())));
            }
        }

        Ok(ExtendedFilename {
            filename: String::from(reference),
            hdu: None,
            section: None,
        })
    }

    /// Resolve this reference against a loaded extension list: locate the
    /// HDU, then apply the section. The end-to-end image-copy path, minus
    /// the file I/O that belongs to the reader/writer collaborator.
    pub fn apply<T: Clone>(&self, hdus: &[Extension<T>]) -> Result<Extension<T>> {
        let hdu = locate_hdu(hdus, self.hdu.as_ref())?;
        hdu.section(self.section.as_deref())
    }
}

/// Try to read `suffix` (starting at `[`) as the complete selector tail of
/// a reference. `None` means it is not one, and the bracket belongs to the
/// base name.
fn parse_selector_suffix(suffix: &str) -> Option<(Option<HduSelector>, Option<Vec<AxisSpec>>)> {
    let close = suffix.find(']')?;
    let first = &suffix[1..close];
    let rest = suffix[close + 1..].trim_start();

    if rest.is_empty() {
        if let Some(section) = parse_section_group(first) {
            return Some((None, Some(section)));
        }
        let hdu = parse_hdu_group(first)?;
        return Some((Some(hdu), None));
    }

    // two groups: HDU then section
    let hdu = parse_hdu_group(first)?;
    let rest = rest.strip_prefix('[')?;
    let close = rest.find(']')?;
    let section = parse_section_group(&rest[..close])?;
    if !rest[close + 1..].trim().is_empty() {
        return None;
    }
    Some((Some(hdu), Some(section)))
}

/// HDU group grammar: a signed integer, or `name (, version)? (, kind)?`.
fn parse_hdu_group(content: &str) -> Option<HduSelector> {
    let content = content.trim();
    if content.is_empty() {
        return None;
    }

    if let Some(index) = parse_signed_int(content) {
        return Some(HduSelector::Index(index));
    }

    let parts: Vec<&str> = content.split(',').map(str::trim).collect();
    if parts.len() > 3 || parts[0].is_empty() {
        return None;
    }

    let name = String::from(parts[0]);
    let (version, kind) = match parts.len() {
        1 => (None, None),
        // the second field is a version when numeric, otherwise a kind
        2 => match parse_unsigned_int(parts[1]) {
            Some(v) => (Some(v), None),
            None => (None, Some(HduKind::parse(parts[1])?)),
        },
        _ => (
            Some(parse_unsigned_int(parts[1])?),
            Some(HduKind::parse(parts[2])?),
        ),
    };

    Some(HduSelector::Name {
        name,
        version,
        kind,
    })
}

/// Section group grammar: one or more comma-separated axis items.
fn parse_section_group(content: &str) -> Option<Vec<AxisSpec>> {
    let content = content.trim();
    if content.is_empty() {
        return None;
    }
    content.split(',').map(|item| parse_item(item.trim())).collect()
}

/// `[-+]?\d+`, the whole string.
fn parse_signed_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// `\d+`, the whole string.
fn parse_unsigned_int(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// An output filename, with the leading-`!` overwrite convention split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputName {
    /// The filename with any `!` prefix removed.
    pub filename: String,
    /// `true` if the name carried a leading `!`.
    pub overwrite: bool,
}

impl OutputName {
    /// Parse an output filename. `!out.fits` requests overwriting.
    pub fn parse(name: &str) -> OutputName {
        match name.strip_prefix('!') {
            Some(rest) => OutputName {
                filename: String::from(rest),
                overwrite: true,
            },
            None => OutputName {
                filename: String::from(name),
                overwrite: false,
            },
        }
    }
}
