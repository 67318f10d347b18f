//! Applying normalized pixel ranges to array data and to the paired header.
//!
//! Ranges arrive in header order (axis 1 first); the array stores its axes
//! in the opposite order, so the data crop reverses them. Both functions
//! leave their input untouched and return newly-allocated results.

use ndarray::{ArrayD, Slice};

use crate::error::{Error, Result};
use crate::header::Header;
use crate::section::PixelRange;

/// Crop an N-dimensional array to the given per-axis ranges.
///
/// `section` is in header order, one range per axis. An axis of length zero
/// or an inverted range yields a zero-length axis; otherwise both endpoints
/// must lie within the axis, and the result holds every `|step|`-th pixel
/// from `start` to `end` inclusive, in traversal order. The returned array
/// owns independent storage.
pub fn crop_data<T: Clone>(data: &ArrayD<T>, section: &[PixelRange]) -> Result<ArrayD<T>> {
    let ndim = data.ndim();
    if section.len() != ndim {
        return Err(Error::IndexOutOfRange {
            index: section.len() as i64,
            len: ndim,
        });
    }

    let mut slices = vec![EMPTY_SLICE; ndim];
    for (i, range) in section.iter().enumerate() {
        // header axis 1 is the last storage axis
        let storage = ndim - 1 - i;
        slices[storage] = storage_slice(i, range, data.shape()[storage])?;
    }

    Ok(data
        .slice_each_axis(|ax| slices[ax.axis.index()])
        .to_owned())
}

const EMPTY_SLICE: Slice = Slice {
    start: 0,
    end: Some(0),
    step: 1,
};

/// Turn one pixel range into a storage-index slice for its axis.
///
/// `axis` is the 0-based header-order axis, used only for diagnostics.
fn storage_slice(axis: usize, range: &PixelRange, nx: usize) -> Result<Slice> {
    let PixelRange { start, end, step } = *range;
    let n = nx as i64;

    // empty when the range runs against the step direction; compared
    // without arithmetic so extreme position literals cannot overflow
    let inverted = if step > 0 { end < start } else { end > start };
    if n == 0 || inverted {
        return Ok(EMPTY_SLICE);
    }

    if !(1..=n).contains(&start) || !(1..=n).contains(&end) {
        return Err(Error::SectionOutOfRange {
            axis: axis + 1,
            start,
            end,
            len: nx,
        });
    }

    // a stride longer than the axis picks only the start pixel, so it can
    // be clamped to the axis length; that also keeps the extreme literals
    // (i64::MIN has no i64 negation) inside isize
    let stride = step.unsigned_abs().min(nx as u64);

    if step > 0 {
        // pixels start..=end, ascending
        Ok(Slice::new(
            (start - 1) as isize,
            Some(end as isize),
            stride as isize,
        ))
    } else {
        // pixels start..=end descending; ndarray walks a negative-step
        // slice from the back of its range, so anchor the range at the
        // lowest index actually picked
        let picked = (start - end) as u64 / stride;
        let lowest = (start - 1) - (picked * stride) as i64;
        Ok(Slice::new(
            lowest as isize,
            Some(start as isize),
            -(stride as isize),
        ))
    }
}

/// Adjust world-coordinate keywords for a cropped/resampled image.
///
/// Depends on the `CRPIX1, CRPIX2, ...` reference-pixel keywords and the
/// `CD1_1, CD1_2, ...` transformation matrix. If `CRPIX1` is absent the
/// header is returned as a verbatim copy. Otherwise each axis `i` with
/// range `(x0, _, d)` gets `CRPIXi := (CRPIXi - x0)/d + 1`, and for `d != 1`
/// every `CDj_i` present is multiplied by `d` so the linear transform stays
/// consistent under resampling and reversal.
///
/// An axis whose own `CRPIXi` keyword is missing (while `CRPIX1` exists) is
/// left untouched rather than being an error, so a header with a partial
/// keyword set still comes through with every complete axis adjusted.
pub fn crop_header(header: &Header, section: &[PixelRange]) -> Header {
    let mut out = header.clone();
    if !header.contains_key("CRPIX1") {
        return out;
    }

    let naxis = header
        .integer("NAXIS")
        .map(|n| n.max(0) as usize)
        .unwrap_or(section.len());

    for (i, range) in section.iter().enumerate() {
        let crpix_key = format!("CRPIX{}", i + 1);
        let Some(crpix) = header.float(&crpix_key) else {
            continue;
        };
        out.set(
            &crpix_key,
            (crpix - range.start as f64) / range.step as f64 + 1.0,
        );

        if range.step == 1 {
            continue;
        }
        for j in 1..=naxis {
            let cd_key = format!("CD{}_{}", j, i + 1);
            if let Some(cd) = header.float(&cd_key) {
                out.set(&cd_key, cd * range.step as f64);
            }
        }
    }

    out
}
