use crate::hdu::HduKind;

/// All errors that can occur while resolving an extended file reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A bracketed suffix that matches neither the HDU nor the section
    /// grammar. Carries the offending substring.
    Parse(String),
    /// No extension matched a by-name HDU selector.
    HduNotFound {
        /// The EXTNAME/HDUNAME value that was requested.
        name: String,
        /// The EXTVER value, if one was requested.
        version: Option<i64>,
        /// The XTENSION kind, if one was requested.
        kind: Option<HduKind>,
    },
    /// An index (HDU position or axis number) outside the valid range.
    IndexOutOfRange {
        /// The requested index.
        index: i64,
        /// The number of valid positions.
        len: usize,
    },
    /// A non-empty normalized range references pixels outside `1..=len`.
    SectionOutOfRange {
        /// The axis number, 1-based, in header order.
        axis: usize,
        /// Requested first pixel.
        start: i64,
        /// Requested last pixel.
        end: i64,
        /// Actual axis length.
        len: usize,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Parse(s) => write!(f, "unrecognized selector syntax: {s}"),
            Error::HduNotFound {
                name,
                version,
                kind,
            } => {
                write!(f, "no HDU found for [EXTNAME={name}")?;
                if let Some(v) = version {
                    write!(f, ", EXTVER={v}")?;
                }
                if let Some(k) = kind {
                    write!(f, ", XTENSION={k}")?;
                }
                write!(f, "]")
            }
            Error::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Error::SectionOutOfRange {
                axis,
                start,
                end,
                len,
            } => {
                write!(
                    f,
                    "section {start}:{end} on axis {axis} outside 1..={len}"
                )
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parse() {
        let e = Error::Parse(String::from("[a,b]"));
        assert_eq!(e.to_string(), "unrecognized selector syntax: [a,b]");
    }

    #[test]
    fn display_hdu_not_found_name_only() {
        let e = Error::HduNotFound {
            name: String::from("SCI"),
            version: None,
            kind: None,
        };
        assert_eq!(e.to_string(), "no HDU found for [EXTNAME=SCI]");
    }

    #[test]
    fn display_hdu_not_found_full() {
        let e = Error::HduNotFound {
            name: String::from("SCI"),
            version: Some(2),
            kind: Some(HduKind::Image),
        };
        assert_eq!(
            e.to_string(),
            "no HDU found for [EXTNAME=SCI, EXTVER=2, XTENSION=IMAGE]"
        );
    }

    #[test]
    fn display_index_out_of_range() {
        let e = Error::IndexOutOfRange { index: 5, len: 3 };
        assert_eq!(e.to_string(), "index 5 out of range for length 3");
    }

    #[test]
    fn display_section_out_of_range() {
        let e = Error::SectionOutOfRange {
            axis: 1,
            start: 1,
            end: 50,
            len: 30,
        };
        assert_eq!(e.to_string(), "section 1:50 on axis 1 outside 1..=30");
    }

    #[test]
    fn result_type_alias() {
        let ok: Result<u32> = Ok(42);
        assert!(ok.is_ok());

        let err: Result<u32> = Err(Error::Parse(String::from("[]")));
        assert!(err.is_err());
    }

    #[test]
    fn debug_formatting() {
        let e = Error::IndexOutOfRange { index: -1, len: 3 };
        let debug = format!("{e:?}");
        assert!(debug.contains("IndexOutOfRange"));
        assert!(debug.contains("-1"));
    }
}
