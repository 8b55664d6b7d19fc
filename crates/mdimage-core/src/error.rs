//! Error types for mdimage-core operations.
//!
//! Every fallible operation on an [`Image`](crate::Image) reports failure
//! synchronously through the [`Error`] enum. Nothing is retried and nothing is
//! downgraded to a default value: a call either succeeds completely (including
//! any copy-on-write it required) or leaves the image untouched.
//!
//! # Usage
//!
//! ```rust
//! use mdimage_core::{Error, Image, PixelId, Result};
//!
//! fn read_center(img: &Image) -> Result<i16> {
//!     let size = img.size()?;
//!     img.get_pixel_as_int16(&[size[0] / 2, size[1] / 2])
//! }
//!
//! let img = Image::new(&[4, 3], PixelId::Float32).unwrap();
//! let err = read_center(&img).unwrap_err();
//! assert!(err.is_type_error());
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation

use crate::pixel::PixelId;
use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing or using an image.
///
/// # Categories
///
/// - **Construction**: [`AllocationFailed`](Error::AllocationFailed),
///   [`UnsupportedPixelType`](Error::UnsupportedPixelType),
///   [`InvalidComponents`](Error::InvalidComponents)
/// - **Shape**: [`DimensionMismatch`](Error::DimensionMismatch),
///   [`SizeMismatch`](Error::SizeMismatch), [`InvalidGeometry`](Error::InvalidGeometry)
/// - **Access**: [`TypeMismatch`](Error::TypeMismatch), [`OutOfBounds`](Error::OutOfBounds),
///   [`KeyNotFound`](Error::KeyNotFound), [`UnsupportedOperation`](Error::UnsupportedOperation)
/// - **Lifecycle**: [`MovedFrom`](Error::MovedFrom)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The buffer could not be allocated.
    ///
    /// Returned when the size vector has the wrong length for the requested
    /// dimension, when the element count overflows addressable memory, or when
    /// the allocator refuses the request.
    #[error("failed to allocate image of size {size:?}: {reason}")]
    AllocationFailed {
        /// Requested size
        size: Vec<u32>,
        /// Failure reason
        reason: String,
    },

    /// The (pixel type, dimension) pair is not in the registry.
    #[error("unsupported pixel type {pixel_id} for dimension {dimension}")]
    UnsupportedPixelType {
        /// Requested pixel type
        pixel_id: PixelId,
        /// Requested dimension
        dimension: u32,
    },

    /// The requested number of components is invalid for the pixel type.
    #[error("invalid number of components {components} for pixel type {pixel_id}: {reason}")]
    InvalidComponents {
        /// Requested pixel type
        pixel_id: PixelId,
        /// Requested component count
        components: u32,
        /// Why the count was rejected
        reason: String,
    },

    /// A vector argument has the wrong length.
    #[error("{what}: expected length {expected}, got {actual}")]
    DimensionMismatch {
        /// What was being checked (e.g. "origin", "direction")
        what: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Two images do not have the same size.
    #[error("size mismatch: expected {expected:?}, got {actual:?}")]
    SizeMismatch {
        /// Size of the destination image
        expected: Vec<u32>,
        /// Size of the source image
        actual: Vec<u32>,
    },

    /// A typed accessor does not match the concrete pixel representation.
    #[error("{operation}: requires pixel type {expected}, image has {actual}")]
    TypeMismatch {
        /// The attempted operation
        operation: String,
        /// Pixel type the accessor works with
        expected: PixelId,
        /// Pixel type of the image
        actual: PixelId,
    },

    /// An index or point lies outside the image region.
    #[error("{operation}: index {index:?} out of bounds for size {size:?}")]
    OutOfBounds {
        /// The attempted operation
        operation: &'static str,
        /// Offending index (integer indices are widened)
        index: Vec<f64>,
        /// Image size
        size: Vec<u32>,
    },

    /// Metadata lookup miss.
    #[error("key \"{key}\" not found in metadata dictionary")]
    KeyNotFound {
        /// Missing key
        key: String,
    },

    /// The operation is not available for this pixel type.
    #[error("{operation} is not supported for pixel type {pixel_id}")]
    UnsupportedOperation {
        /// The attempted operation
        operation: String,
        /// Pixel type of the image
        pixel_id: PixelId,
    },

    /// Geometry cannot be used as given.
    #[error("invalid geometry: {reason}")]
    InvalidGeometry {
        /// Reason why the geometry is invalid
        reason: String,
    },

    /// The image was moved from and has not been reassigned.
    #[error("{operation}: image has been moved from")]
    MovedFrom {
        /// The attempted operation
        operation: &'static str,
    },
}

impl Error {
    /// Creates an [`Error::AllocationFailed`] error.
    #[inline]
    pub fn allocation_failed(size: &[u32], reason: impl Into<String>) -> Self {
        Self::AllocationFailed {
            size: size.to_vec(),
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::InvalidComponents`] error.
    #[inline]
    pub fn invalid_components(pixel_id: PixelId, components: u32, reason: impl Into<String>) -> Self {
        Self::InvalidComponents {
            pixel_id,
            components,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            what,
            expected,
            actual,
        }
    }

    /// Creates an [`Error::TypeMismatch`] error.
    #[inline]
    pub fn type_mismatch(operation: impl Into<String>, expected: PixelId, actual: PixelId) -> Self {
        Self::TypeMismatch {
            operation: operation.into(),
            expected,
            actual,
        }
    }

    /// Creates an [`Error::OutOfBounds`] error from an integer index.
    #[inline]
    pub fn out_of_bounds(operation: &'static str, index: &[u32], size: &[u32]) -> Self {
        Self::OutOfBounds {
            operation,
            index: index.iter().map(|&i| i as f64).collect(),
            size: size.to_vec(),
        }
    }

    /// Creates an [`Error::OutOfBounds`] error from a continuous index.
    #[inline]
    pub fn continuous_out_of_bounds(operation: &'static str, index: &[f64], size: &[u32]) -> Self {
        Self::OutOfBounds {
            operation,
            index: index.to_vec(),
            size: size.to_vec(),
        }
    }

    /// Creates an [`Error::UnsupportedOperation`] error.
    #[inline]
    pub fn unsupported(operation: impl Into<String>, pixel_id: PixelId) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
            pixel_id,
        }
    }

    /// Creates an [`Error::InvalidGeometry`] error.
    #[inline]
    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }

    /// Returns `true` if this is an allocation error.
    #[inline]
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. })
    }

    /// Returns `true` if the (pixel type, dimension, components) request was rejected.
    #[inline]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedPixelType { .. } | Self::InvalidComponents { .. }
        )
    }

    /// Returns `true` if a typed accessor was called on the wrong pixel type.
    #[inline]
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }

    /// Returns `true` for dimension and size mismatches.
    #[inline]
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::DimensionMismatch { .. } | Self::SizeMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_message() {
        let err = Error::type_mismatch("get_pixel_as_int16", PixelId::Int16, PixelId::Float32);
        let msg = err.to_string();
        assert!(msg.contains("get_pixel_as_int16"));
        assert!(msg.contains("int16"));
        assert!(msg.contains("float32"));
        assert!(err.is_type_error());
    }

    #[test]
    fn test_out_of_bounds() {
        let err = Error::out_of_bounds("get pixel", &[4, 1], &[4, 3]);
        let msg = err.to_string();
        assert!(msg.contains("[4.0, 1.0]"));
        assert!(msg.contains("[4, 3]"));
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = Error::dimension_mismatch("origin", 3, 2);
        assert_eq!(err.to_string(), "origin: expected length 3, got 2");
        assert!(err.is_shape_error());
    }

    #[test]
    fn test_configuration_errors() {
        let err = Error::UnsupportedPixelType {
            pixel_id: PixelId::LabelUInt8,
            dimension: 5,
        };
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("dimension 5"));

        let err = Error::invalid_components(PixelId::Int8, 3, "scalar pixels have one component");
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_allocation_failed() {
        let err = Error::allocation_failed(&[u32::MAX, u32::MAX, u32::MAX], "element count overflows");
        assert!(err.is_allocation_error());
        assert!(err.to_string().contains("overflows"));
    }
}
