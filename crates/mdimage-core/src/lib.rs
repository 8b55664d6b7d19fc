//! # mdimage-core
//!
//! Type-erased, copy-on-write N-dimensional images.
//!
//! This crate provides a single runtime image type that can hold any of the
//! supported pixel type and dimension combinations:
//!
//! - [`Image`] - The image value: geometry, metadata, typed pixel and buffer access
//! - [`PixelId`], [`ComponentType`], [`PixelKind`] - Pixel type tags
//! - [`PixelRegistry`] - Table of supported `(PixelId, dimension)` pairs
//! - [`Geometry`] - Origin, spacing and direction; index/point transforms
//! - [`MetaDataDictionary`] - String key/value metadata
//! - [`Interpolator`] - Nearest-neighbour and linear evaluation at continuous indices
//!
//! ## Design
//!
//! An [`Image`] is not generic. Its pixel type is a runtime [`PixelId`] and its
//! storage is a concrete representation ([`DenseImage<T>`](repr::DenseImage)
//! or [`LabelMap<T>`](repr::LabelMap)) behind the [`ImageBase`](repr::ImageBase)
//! trait. Typed accessors recover the concrete type and fail with
//! [`Error::TypeMismatch`] rather than reinterpret memory:
//!
//! ```rust
//! use mdimage_core::{Image, PixelId};
//!
//! let mut img = Image::new(&[4, 3], PixelId::Int16).unwrap();
//! img.set_pixel_as_int16(&[1, 1], 7).unwrap();
//! assert_eq!(img.get_pixel_as_int16(&[1, 1]).unwrap(), 7);
//! assert!(img.get_pixel_as_float32(&[1, 1]).is_err());
//! ```
//!
//! Images are values with shared storage. Clones share one reference-counted
//! cell and the first mutation through either clone copies it.
//!
//! ## Feature Flags
//!
//! - `parallel` - Parallel buffer conversion in [`Image::cast`] via rayon (enabled by default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod access;
pub mod buffer;
mod cast;
mod cell;
pub mod error;
pub mod geometry;
pub mod image;
pub mod interp;
pub mod metadata;
pub mod pixel;
pub mod registry;
pub mod repr;

// Re-exports for convenience
pub use buffer::{BufferMut, BufferRef};
pub use error::{Error, Result};
pub use geometry::Geometry;
pub use image::Image;
pub use interp::Interpolator;
pub use metadata::MetaDataDictionary;
pub use num_complex::Complex;
pub use pixel::{Component, ComponentType, LabelComponent, PixelId, PixelKind};
pub use registry::{MAX_DIMENSION, MAX_LABEL_DIMENSION, MIN_DIMENSION, PixelRegistry, RegistryEntry};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use mdimage_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::geometry::Geometry;
    pub use crate::image::Image;
    pub use crate::interp::Interpolator;
    pub use crate::metadata::MetaDataDictionary;
    pub use crate::pixel::{Component, ComponentType, PixelId, PixelKind};
    pub use num_complex::Complex;
}
