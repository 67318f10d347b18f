//! In-memory extensions and HDU selection.
//!
//! An [`Extension`] is one data unit handed over by the file reader: a
//! header map plus an N-dimensional array. [`locate_hdu`] picks one
//! extension out of an ordered list by position or by the
//! EXTNAME/EXTVER/XTENSION triple, scanning in order and returning the
//! first match, the way an HDU list is searched.

use ndarray::ArrayD;

use crate::crop::{crop_data, crop_header};
use crate::error::{Error, Result};
use crate::header::Header;
use crate::section::{normalize_section, AxisSpec};

/// The kind of extension named by an XTENSION keyword or selector token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HduKind {
    /// `IMAGE` (abbreviation `I`).
    Image,
    /// `ASCII` (abbreviation `A`).
    Ascii,
    /// `TABLE` (abbreviation `T`).
    Table,
    /// `BINTABLE` (abbreviation `B`).
    Bintable,
}

impl HduKind {
    /// Parse a kind token: full name or single-letter abbreviation,
    /// case-insensitive, surrounding whitespace ignored.
    pub fn parse(token: &str) -> Option<HduKind> {
        match token.trim().to_ascii_uppercase().as_str() {
            "IMAGE" | "I" => Some(HduKind::Image),
            "ASCII" | "A" => Some(HduKind::Ascii),
            "TABLE" | "T" => Some(HduKind::Table),
            "BINTABLE" | "B" => Some(HduKind::Bintable),
            _ => None,
        }
    }

    /// The normalized full name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HduKind::Image => "IMAGE",
            HduKind::Ascii => "ASCII",
            HduKind::Table => "TABLE",
            HduKind::Bintable => "BINTABLE",
        }
    }
}

impl core::fmt::Display for HduKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed HDU selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HduSelector {
    /// Position in the extension list, 0-based.
    Index(i64),
    /// Name lookup against EXTNAME (or HDUNAME when EXTNAME is absent),
    /// optionally narrowed by EXTVER and XTENSION kind.
    Name {
        name: String,
        version: Option<i64>,
        kind: Option<HduKind>,
    },
}

/// One data unit: a header and its N-dimensional array payload.
///
/// The array's storage axes are in the reverse of header order: header
/// axis 1 (NAXIS1) is the last, fastest-varying storage axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Extension<T> {
    pub header: Header,
    pub data: ArrayD<T>,
}

impl<T: Clone> Extension<T> {
    pub fn new(header: Header, data: ArrayD<T>) -> Self {
        Extension { header, data }
    }

    /// Per-axis lengths in header order (NAXIS1 first).
    pub fn naxes(&self) -> Vec<usize> {
        self.data.shape().iter().rev().copied().collect()
    }

    /// Apply a section to this extension, returning a new extension with
    /// cropped data and adjusted world-coordinate keywords.
    ///
    /// `None` deep-copies the extension unchanged. Otherwise the section is
    /// normalized against this extension's axes (missing trailing axes
    /// cover their whole axis), the data is cropped, CRPIX/CD keywords are
    /// adjusted, and any `NAXISn` keywords present are refreshed to the
    /// cropped lengths. The input extension is never mutated.
    pub fn section(&self, section: Option<&[AxisSpec]>) -> Result<Extension<T>> {
        let Some(specs) = section else {
            return Ok(self.clone());
        };

        let ranges = normalize_section(specs, &self.naxes())?;
        let data = crop_data(&self.data, &ranges)?;
        let mut header = crop_header(&self.header, &ranges);

        for (i, &len) in data.shape().iter().rev().enumerate() {
            let key = format!("NAXIS{}", i + 1);
            if header.contains_key(&key) {
                header.set(&key, len as i64);
            }
        }

        Ok(Extension { header, data })
    }
}

/// Select one extension from an ordered list.
///
/// With no selector the first extension wins. An index selector must lie in
/// `[0, len)`. A name selector scans in order and returns the first
/// extension whose EXTNAME (or, absent that keyword, HDUNAME) equals the
/// requested name — comparison is case-sensitive — and whose EXTVER and
/// XTENSION match when the selector narrows by them; candidates missing a
/// required keyword are skipped, not errors.
pub fn locate_hdu<'a, T>(
    hdus: &'a [Extension<T>],
    selector: Option<&HduSelector>,
) -> Result<&'a Extension<T>> {
    let Some(selector) = selector else {
        return hdus.first().ok_or(Error::IndexOutOfRange { index: 0, len: 0 });
    };

    match selector {
        HduSelector::Index(i) => {
            if *i < 0 || *i as usize >= hdus.len() {
                return Err(Error::IndexOutOfRange {
                    index: *i,
                    len: hdus.len(),
                });
            }
            Ok(&hdus[*i as usize])
        }
        HduSelector::Name {
            name,
            version,
            kind,
        } => {
            for hdu in hdus {
                let header = &hdu.header;

                // EXTNAME, when present, decides; HDUNAME is only a fallback
                let candidate = match header.string("EXTNAME") {
                    Some(n) => n,
                    None => match header.string("HDUNAME") {
                        Some(n) => n,
                        None => continue,
                    },
                };
                if candidate != name {
                    continue;
                }

                if let Some(want) = version {
                    if header.integer("EXTVER") != Some(*want) {
                        continue;
                    }
                }

                if let Some(want) = kind {
                    let got = header.string("XTENSION").and_then(HduKind::parse);
                    if got != Some(*want) {
                        continue;
                    }
                }

                return Ok(hdu);
            }

            Err(Error::HduNotFound {
                name: name.clone(),
                version: *version,
                kind: *kind,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use ndarray::{ArrayD, IxDyn};

    fn ext(keys: Vec<(&str, Value)>) -> Extension<f32> {
        Extension::new(
            Header::from_iter(keys),
            ArrayD::zeros(IxDyn(&[2, 3])),
        )
    }

    fn sample_list() -> Vec<Extension<f32>> {
        vec![
            ext(vec![("NAXIS", Value::Integer(2))]),
            ext(vec![
                ("EXTNAME", Value::from("SCI")),
                ("EXTVER", Value::Integer(1)),
                ("XTENSION", Value::from("IMAGE")),
            ]),
            ext(vec![
                ("EXTNAME", Value::from("SCI")),
                ("EXTVER", Value::Integer(2)),
                ("XTENSION", Value::from("IMAGE")),
            ]),
            ext(vec![
                ("HDUNAME", Value::from("MASK")),
                ("XTENSION", Value::from("BINTABLE")),
            ]),
        ]
    }

    #[test]
    fn kind_parse_full_names_and_abbreviations() {
        assert_eq!(HduKind::parse("IMAGE"), Some(HduKind::Image));
        assert_eq!(HduKind::parse("image"), Some(HduKind::Image));
        assert_eq!(HduKind::parse("i"), Some(HduKind::Image));
        assert_eq!(HduKind::parse("A"), Some(HduKind::Ascii));
        assert_eq!(HduKind::parse("t"), Some(HduKind::Table));
        assert_eq!(HduKind::parse("BinTable"), Some(HduKind::Bintable));
        assert_eq!(HduKind::parse(" IMAGE "), Some(HduKind::Image));
        assert_eq!(HduKind::parse("IMG"), None);
        assert_eq!(HduKind::parse(""), None);
    }

    #[test]
    fn kind_display() {
        assert_eq!(HduKind::Ascii.to_string(), "ASCII");
        assert_eq!(HduKind::Bintable.as_str(), "BINTABLE");
    }

    #[test]
    fn no_selector_returns_first() {
        let hdus = sample_list();
        let hdu = locate_hdu(&hdus, None).unwrap();
        assert!(std::ptr::eq(hdu, &hdus[0]));
    }

    #[test]
    fn no_selector_on_empty_list() {
        let hdus: Vec<Extension<f32>> = vec![];
        assert_eq!(
            locate_hdu(&hdus, None).unwrap_err(),
            Error::IndexOutOfRange { index: 0, len: 0 }
        );
    }

    #[test]
    fn index_selector() {
        let hdus = sample_list();
        let hdu = locate_hdu(&hdus, Some(&HduSelector::Index(2))).unwrap();
        assert_eq!(hdu.header.integer("EXTVER"), Some(2));
    }

    #[test]
    fn index_out_of_range() {
        let hdus = sample_list();
        assert_eq!(
            locate_hdu(&hdus, Some(&HduSelector::Index(4))).unwrap_err(),
            Error::IndexOutOfRange { index: 4, len: 4 }
        );
        // no negative wrap-around
        assert_eq!(
            locate_hdu(&hdus, Some(&HduSelector::Index(-1))).unwrap_err(),
            Error::IndexOutOfRange { index: -1, len: 4 }
        );
    }

    fn by_name(name: &str, version: Option<i64>, kind: Option<HduKind>) -> HduSelector {
        HduSelector::Name {
            name: String::from(name),
            version,
            kind,
        }
    }

    #[test]
    fn name_selector_first_match_wins() {
        let hdus = sample_list();
        let hdu = locate_hdu(&hdus, Some(&by_name("SCI", None, None))).unwrap();
        assert_eq!(hdu.header.integer("EXTVER"), Some(1));
    }

    #[test]
    fn name_selector_narrowed_by_version() {
        let hdus = sample_list();
        let hdu = locate_hdu(&hdus, Some(&by_name("SCI", Some(2), None))).unwrap();
        assert_eq!(hdu.header.integer("EXTVER"), Some(2));
    }

    #[test]
    fn name_selector_narrowed_by_kind() {
        let hdus = sample_list();
        let hdu =
            locate_hdu(&hdus, Some(&by_name("SCI", None, Some(HduKind::Image)))).unwrap();
        assert_eq!(hdu.header.integer("EXTVER"), Some(1));
        assert!(
            locate_hdu(&hdus, Some(&by_name("SCI", None, Some(HduKind::Bintable)))).is_err()
        );
    }

    #[test]
    fn name_selector_falls_back_to_hduname() {
        let hdus = sample_list();
        let hdu = locate_hdu(&hdus, Some(&by_name("MASK", None, None))).unwrap();
        assert_eq!(hdu.header.string("XTENSION"), Some("BINTABLE"));
    }

    #[test]
    fn extname_present_blocks_hduname_fallback() {
        let hdus = vec![ext(vec![
            ("EXTNAME", Value::from("WRONG")),
            ("HDUNAME", Value::from("RIGHT")),
        ])];
        assert!(locate_hdu(&hdus, Some(&by_name("RIGHT", None, None))).is_err());
    }

    #[test]
    fn name_comparison_is_case_sensitive() {
        let hdus = sample_list();
        assert!(locate_hdu(&hdus, Some(&by_name("sci", None, None))).is_err());
    }

    #[test]
    fn candidates_missing_keywords_are_skipped() {
        let hdus = sample_list();
        // first SCI lacks nothing, but a version demand that nothing carries
        // walks the whole list and reports what was asked
        let err = locate_hdu(&hdus, Some(&by_name("SCI", Some(9), Some(HduKind::Image))))
            .unwrap_err();
        assert_eq!(
            err,
            Error::HduNotFound {
                name: String::from("SCI"),
                version: Some(9),
                kind: Some(HduKind::Image),
            }
        );
    }

    #[test]
    fn naxes_reverses_storage_shape() {
        let e = ext(vec![]);
        assert_eq!(e.data.shape(), &[2, 3]);
        assert_eq!(e.naxes(), vec![3, 2]);
    }

    #[test]
    fn section_none_is_deep_copy() {
        let e = ext(vec![("EXTNAME", Value::from("SCI"))]);
        let copy = e.section(None).unwrap();
        assert_eq!(copy, e);
    }

    #[test]
    fn section_refreshes_naxis_keywords() {
        let mut e = ext(vec![
            ("NAXIS", Value::Integer(2)),
            ("NAXIS1", Value::Integer(3)),
            ("NAXIS2", Value::Integer(2)),
        ]);
        e.data = ArrayD::zeros(IxDyn(&[2, 3]));
        let out = e
            .section(Some(&[AxisSpec::range(1, 2, None)]))
            .unwrap();
        assert_eq!(out.data.shape(), &[2, 2]);
        assert_eq!(out.header.integer("NAXIS1"), Some(2));
        assert_eq!(out.header.integer("NAXIS2"), Some(2));
        assert_eq!(out.header.integer("NAXIS"), Some(2));
    }

    #[test]
    fn section_too_many_axes() {
        let e = ext(vec![]);
        let specs = vec![AxisSpec::WHOLE; 3];
        assert_eq!(
            e.section(Some(&specs)).unwrap_err(),
            Error::IndexOutOfRange { index: 3, len: 2 }
        );
    }
}
