//! Extended file references and image sections for in-memory FITS HDUs.
//!
//! A reference like `img.fits[SCI,2][10:20,-*]` names a sub-image of one
//! extension in a multi-extension file. This crate parses the reference,
//! selects the extension, normalizes the section against the extension's
//! axes, and produces a cropped copy with its world-coordinate keywords
//! (CRPIX/CD) adjusted to match. Reading and writing the file format itself
//! is the caller's concern: extensions arrive and leave as a header map
//! plus an [`ndarray::ArrayD`] payload.
//!
//! Every operation is a pure function of its inputs; nothing here blocks,
//! mutates shared state, or touches the filesystem.

pub mod crop;
pub mod error;
pub mod filename;
pub mod hdu;
pub mod header;
pub mod section;
pub mod value;

pub use crop::{crop_data, crop_header};
pub use error::{Error, Result};
pub use filename::{ExtendedFilename, OutputName};
pub use hdu::{locate_hdu, Extension, HduKind, HduSelector};
pub use header::Header;
pub use section::{normalize_axis, normalize_section, AxisSpec, PixelRange};
pub use value::Value;
