//! Concrete image representations.
//!
//! Every registry entry instantiates one of two storage types:
//!
//! - [`DenseImage`] - a single contiguous buffer for scalar, vector and complex
//!   pixels
//! - [`LabelMap`] - run-length encoded label lines
//!
//! Both implement [`ImageBase`], the capability surface the facade talks to
//! without knowing the concrete type.
//!
//! # Memory Layout
//!
//! Pixels are addressed row-major with the fastest varying axis first. For a
//! 3-D image of size `[sx, sy, sz]` the pixel at `[x, y, z]` has offset
//! `x + sx * (y + sy * z)`, and its components start at
//! `offset * values_per_pixel`:
//!
//! ```text
//! Memory: [c0 c1 .. cn | c0 c1 .. cn | ...]  <- pixels [0,0,0], [1,0,0], ...
//! ```

mod dense;
mod label;

pub use dense::DenseImage;
pub use label::{LabelMap, Run};

use crate::buffer::{BufferMut, BufferRef};
use crate::error::{Error, Result};
use crate::pixel::PixelId;
use std::any::Any;
use std::fmt;

/// Capability set shared by every concrete representation.
///
/// Implementations own their storage exclusively; sharing is handled one
/// level up by the image handle.
pub trait ImageBase: fmt::Debug + Send + Sync + Any {
    /// Pixel type tag of this representation.
    fn pixel_id(&self) -> PixelId;

    /// Size along each axis.
    fn size(&self) -> &[u32];

    /// Number of spatial axes.
    fn dimension(&self) -> u32 {
        self.size().len() as u32
    }

    /// Logical components per pixel (1 for scalar, complex and label pixels).
    fn components_per_pixel(&self) -> u32;

    /// Stored values per pixel (2 for complex pixels).
    fn values_per_pixel(&self) -> usize;

    /// Total number of pixels.
    fn number_of_pixels(&self) -> u64 {
        self.size().iter().map(|&s| s as u64).product()
    }

    /// Contiguous buffer, `None` for representations without one.
    fn buffer(&self) -> Option<BufferRef<'_>>;

    /// Mutable contiguous buffer, `None` for representations without one.
    fn buffer_mut(&mut self) -> Option<BufferMut<'_>>;

    /// Reads stored value `index` widened to `f64`.
    fn read_component(&self, index: usize) -> f64;

    /// Writes stored value `index` narrowed with `as` semantics.
    fn write_component(&mut self, index: usize, value: f64);

    /// Label at `offset`, `None` unless this is a label map.
    fn get_label(&self, _offset: usize) -> Option<u64> {
        None
    }

    /// Sets the label at `offset`. Returns `false` unless this is a label map.
    fn set_label(&mut self, _offset: usize, _label: u64) -> bool {
        false
    }

    /// Appends every stored value of the pixel at `offset` to `out`.
    fn read_pixel(&self, offset: usize, out: &mut Vec<f64>) {
        let vpp = self.values_per_pixel();
        out.extend((0..vpp).map(|k| self.read_component(offset * vpp + k)));
    }

    /// Deep copy.
    fn copy(&self) -> Box<dyn ImageBase>;

    /// Upcast for typed downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for typed downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Computes the flat pixel offset of `index`.
///
/// `index` may be longer than the dimension; extra entries are ignored.
pub(crate) fn pixel_offset(operation: &'static str, size: &[u32], index: &[u32]) -> Result<usize> {
    if index.len() < size.len() {
        return Err(Error::dimension_mismatch("index", size.len(), index.len()));
    }
    let index = &index[..size.len()];
    if index.iter().zip(size).any(|(&i, &s)| i >= s) {
        return Err(Error::out_of_bounds(operation, index, size));
    }
    let offset = index
        .iter()
        .zip(size)
        .rev()
        .fold(0usize, |acc, (&i, &s)| acc * s as usize + i as usize);
    Ok(offset)
}

/// Number of stored values for `size`, `None` on overflow.
pub(crate) fn element_count(size: &[u32], values_per_pixel: usize) -> Option<usize> {
    size.iter()
        .try_fold(values_per_pixel, |acc, &s| acc.checked_mul(s as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_fastest_axis_first() {
        let size = [4, 3, 2];
        assert_eq!(pixel_offset("t", &size, &[0, 0, 0]).unwrap(), 0);
        assert_eq!(pixel_offset("t", &size, &[1, 0, 0]).unwrap(), 1);
        assert_eq!(pixel_offset("t", &size, &[0, 1, 0]).unwrap(), 4);
        assert_eq!(pixel_offset("t", &size, &[3, 2, 1]).unwrap(), 23);
    }

    #[test]
    fn test_offset_ignores_extra_entries() {
        assert_eq!(pixel_offset("t", &[4, 3], &[1, 1, 99]).unwrap(), 5);
    }

    #[test]
    fn test_offset_errors() {
        let err = pixel_offset("t", &[4, 3], &[4, 0]).unwrap_err();
        assert!(err.is_bounds_error());
        let err = pixel_offset("t", &[4, 3], &[1]).unwrap_err();
        assert!(err.is_shape_error());
    }

    fn offset_to_index(size: &[u32], mut offset: usize) -> Vec<u32> {
        size.iter()
            .map(|&s| {
                let s = s as usize;
                let i = offset % s;
                offset /= s;
                i as u32
            })
            .collect()
    }

    #[test]
    fn test_offset_roundtrip() {
        let size = [5, 4, 3];
        for offset in 0..60 {
            let index = offset_to_index(&size, offset);
            assert_eq!(pixel_offset("t", &size, &index).unwrap(), offset);
        }
    }

    #[test]
    fn test_element_count_overflow() {
        assert_eq!(element_count(&[4, 3], 2), Some(24));
        assert_eq!(element_count(&[0, 3], 2), Some(0));
        assert_eq!(element_count(&[u32::MAX, u32::MAX, u32::MAX], 8), None);
    }
}
