//! The type-erased image value.
//!
//! [`Image`] is a single non-generic handle for every supported pixel type and
//! dimension. Its pixel type, size and buffer live in a concrete
//! representation chosen at construction through the
//! [`PixelRegistry`](crate::PixelRegistry); the handle itself only holds a
//! reference-counted cell.
//!
//! # Value semantics
//!
//! Cloning an image is cheap: both values share one cell until either is
//! mutated. Every mutating call (geometry setters, pixel and buffer writes,
//! metadata writes) first makes the cell exclusive, copying it if needed, so
//! a write through one value is never visible through another.
//!
//! ```rust
//! use mdimage_core::{Image, PixelId};
//!
//! let mut a = Image::new(&[4, 3], PixelId::Int16).unwrap();
//! a.set_pixel_as_int16(&[1, 1], 7).unwrap();
//!
//! let mut b = a.clone();
//! assert!(b.shares_data_with(&a));
//!
//! b.set_pixel_as_int16(&[2, 2], -1).unwrap();
//! assert!(!b.shares_data_with(&a));
//! assert_eq!(a.get_pixel_as_int16(&[2, 2]).unwrap(), 0);
//! assert_eq!(b.get_pixel_as_int16(&[1, 1]).unwrap(), 7);
//! ```
//!
//! # Moved-from images
//!
//! [`Image::take`] moves the cell out and leaves the source empty. Every call
//! on a moved-from image fails with [`Error::MovedFrom`] until it is assigned
//! a new value.

use crate::cast;
use crate::cell::{ImageCell, SharedCell};
use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::interp::{self, Interpolator};
use crate::pixel::{Component, PixelId, PixelKind};
use crate::registry::{MAX_DIMENSION, MIN_DIMENSION, PixelRegistry, RegistryEntry};
use crate::repr::{DenseImage, ImageBase};
use std::fmt;
use tracing::trace;

/// Type-erased, copy-on-write N-dimensional image.
#[derive(Debug, Clone)]
pub struct Image {
    cell: Option<SharedCell>,
}

impl Image {
    /// Creates a zero-initialized image.
    ///
    /// The dimension is `size.len()`. Vector pixel types get one component per
    /// dimension; use [`with_components`](Self::with_components) to choose.
    ///
    /// # Errors
    ///
    /// - [`Error::AllocationFailed`] if `size` does not describe a supported
    ///   dimension or the buffer cannot be allocated
    /// - [`Error::UnsupportedPixelType`] for an unregistered (pixel type, dimension) pair
    ///
    /// # Example
    ///
    /// ```rust
    /// use mdimage_core::{Image, PixelId};
    ///
    /// let img = Image::new(&[64, 64, 16], PixelId::Float32).unwrap();
    /// assert_eq!(img.dimension().unwrap(), 3);
    /// assert_eq!(img.number_of_pixels().unwrap(), 64 * 64 * 16);
    /// ```
    pub fn new(size: &[u32], pixel_id: PixelId) -> Result<Self> {
        Self::with_components(size, pixel_id, 0)
    }

    /// Creates a zero-initialized image with an explicit component count.
    ///
    /// `components` of 0 selects the default: 1 for scalar, complex and label
    /// pixels, the dimension for vector pixels.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new), plus [`Error::InvalidComponents`] if a
    /// non-vector pixel type is given more than one component.
    pub fn with_components(size: &[u32], pixel_id: PixelId, components: u32) -> Result<Self> {
        let entry = Self::lookup(size, pixel_id)?;
        let components = entry.components(components)?;
        let repr = entry.allocate(size, components)?;
        trace!(pixel_id = %pixel_id, ?size, components, "Image::with_components");
        Ok(Self::from_repr(repr))
    }

    /// Creates a zero-initialized 2-D image.
    pub fn new_2d(width: u32, height: u32, pixel_id: PixelId) -> Result<Self> {
        Self::new(&[width, height], pixel_id)
    }

    /// Creates a zero-initialized 3-D image.
    pub fn new_3d(width: u32, height: u32, depth: u32, pixel_id: PixelId) -> Result<Self> {
        Self::new(&[width, height, depth], pixel_id)
    }

    /// Wraps an existing buffer as an image.
    ///
    /// `data` is laid out fastest axis first with the components of each
    /// pixel interleaved (real, imaginary for complex pixels). Label maps
    /// cannot be imported this way; build a scalar image and
    /// [`cast`](Self::cast) it.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeMismatch`] if `T` is not the component type of `pixel_id`
    /// - [`Error::AllocationFailed`] if `data.len()` does not match the size
    /// - as [`with_components`](Self::with_components) otherwise
    ///
    /// # Example
    ///
    /// ```rust
    /// use mdimage_core::{Image, PixelId};
    ///
    /// let img = Image::from_vec(&[2, 2], PixelId::UInt8, 0, vec![1u8, 2, 3, 4]).unwrap();
    /// assert_eq!(img.get_pixel_as_uint8(&[1, 1]).unwrap(), 4);
    /// ```
    pub fn from_vec<T: Component>(
        size: &[u32],
        pixel_id: PixelId,
        components: u32,
        data: Vec<T>,
    ) -> Result<Self> {
        let entry = Self::lookup(size, pixel_id)?;
        if pixel_id.is_label() {
            return Err(Error::unsupported("from_vec", pixel_id));
        }
        if pixel_id.component_type() != Some(T::TYPE) {
            let expected = PixelId::from_parts(pixel_id.kind(), T::TYPE).unwrap_or(PixelId::scalar(T::TYPE));
            return Err(Error::type_mismatch("from_vec", expected, pixel_id));
        }
        let components = entry.components(components)?;
        let repr = DenseImage::from_vec(pixel_id, size, components, data)?;
        Ok(Self::from_repr(Box::new(repr)))
    }

    fn lookup(size: &[u32], pixel_id: PixelId) -> Result<&'static RegistryEntry> {
        let dimension = size.len() as u32;
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&dimension) {
            return Err(Error::allocation_failed(
                size,
                format!(
                    "size has {} entries, supported dimensions are {MIN_DIMENSION} to {MAX_DIMENSION}",
                    size.len()
                ),
            ));
        }
        PixelRegistry::global().lookup(pixel_id, dimension)
    }

    pub(crate) fn from_repr(repr: Box<dyn ImageBase>) -> Self {
        Self {
            cell: Some(SharedCell::new(ImageCell::new(repr))),
        }
    }

    // ---- cell access ----

    pub(crate) fn cell(&self, operation: &'static str) -> Result<&ImageCell> {
        self.cell
            .as_ref()
            .map(SharedCell::get)
            .ok_or(Error::MovedFrom { operation })
    }

    /// Exclusive access for a mutation. Validate arguments before calling.
    pub(crate) fn cell_mut(&mut self, operation: &'static str) -> Result<&mut ImageCell> {
        self.cell
            .as_mut()
            .map(SharedCell::make_unique)
            .ok_or(Error::MovedFrom { operation })
    }

    pub(crate) fn repr(&self, operation: &'static str) -> Result<&dyn ImageBase> {
        Ok(&*self.cell(operation)?.repr)
    }

    // ---- ownership ----

    /// Moves the value out, leaving `self` moved-from.
    ///
    /// ```rust
    /// use mdimage_core::{Error, Image, PixelId};
    ///
    /// let mut a = Image::new(&[2, 2], PixelId::UInt8).unwrap();
    /// let b = a.take();
    /// assert!(a.is_moved_from());
    /// assert!(matches!(a.size(), Err(Error::MovedFrom { .. })));
    /// assert_eq!(b.size().unwrap(), &[2, 2]);
    /// ```
    pub fn take(&mut self) -> Image {
        Image {
            cell: self.cell.take(),
        }
    }

    /// Whether this image was moved from with [`take`](Self::take).
    #[inline]
    pub fn is_moved_from(&self) -> bool {
        self.cell.is_none()
    }

    /// Makes this image the only owner of its data, copying if it is shared.
    pub fn make_unique(&mut self) -> Result<()> {
        self.cell_mut("make_unique").map(|_| ())
    }

    /// Whether no other image shares this image's data.
    pub fn is_unique(&self) -> Result<bool> {
        self.cell
            .as_ref()
            .map(SharedCell::is_unique)
            .ok_or(Error::MovedFrom { operation: "is_unique" })
    }

    /// Whether both images currently share one buffer.
    ///
    /// Moved-from images share with nothing.
    pub fn shares_data_with(&self, other: &Image) -> bool {
        match (&self.cell, &other.cell) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    // ---- queries ----

    /// Pixel type.
    pub fn pixel_id(&self) -> Result<PixelId> {
        Ok(self.repr("pixel_id")?.pixel_id())
    }

    /// Stable integer value of the pixel type.
    pub fn pixel_id_value(&self) -> Result<i32> {
        Ok(self.repr("pixel_id_value")?.pixel_id().value())
    }

    /// Human readable pixel type, e.g. `"vector of 32-bit float"`.
    pub fn pixel_id_type_as_string(&self) -> Result<String> {
        Ok(self.repr("pixel_id_type_as_string")?.pixel_id().description())
    }

    /// Number of spatial axes.
    pub fn dimension(&self) -> Result<u32> {
        Ok(self.repr("dimension")?.dimension())
    }

    /// Size along each axis.
    pub fn size(&self) -> Result<&[u32]> {
        Ok(self.repr("size")?.size())
    }

    /// Size along the first axis.
    pub fn width(&self) -> Result<u32> {
        self.axis_size("width", 0)
    }

    /// Size along the second axis.
    pub fn height(&self) -> Result<u32> {
        self.axis_size("height", 1)
    }

    /// Size along the third axis, 0 for 2-D images.
    pub fn depth(&self) -> Result<u32> {
        self.axis_size("depth", 2)
    }

    fn axis_size(&self, operation: &'static str, axis: usize) -> Result<u32> {
        Ok(self.repr(operation)?.size().get(axis).copied().unwrap_or(0))
    }

    /// Logical components per pixel.
    pub fn number_of_components_per_pixel(&self) -> Result<u32> {
        Ok(self.repr("number_of_components_per_pixel")?.components_per_pixel())
    }

    /// Total number of pixels.
    pub fn number_of_pixels(&self) -> Result<u64> {
        Ok(self.repr("number_of_pixels")?.number_of_pixels())
    }

    /// Size in bytes of one stored component.
    pub fn size_of_pixel_component(&self) -> Result<usize> {
        let pixel_id = self.repr("size_of_pixel_component")?.pixel_id();
        Ok(pixel_id.component_type().map_or(0, |c| c.size_of()))
    }

    // ---- geometry ----

    /// Physical coordinates of pixel index zero.
    pub fn origin(&self) -> Result<&[f64]> {
        Ok(self.cell("origin")?.geometry.origin())
    }

    /// Physical distance between adjacent pixels along each axis.
    pub fn spacing(&self) -> Result<&[f64]> {
        Ok(self.cell("spacing")?.geometry.spacing())
    }

    /// Row-major direction cosine matrix.
    pub fn direction(&self) -> Result<&[f64]> {
        Ok(self.cell("direction")?.geometry.direction())
    }

    /// Origin, spacing and direction together.
    pub fn geometry(&self) -> Result<&Geometry> {
        Ok(&self.cell("geometry")?.geometry)
    }

    /// Sets the origin.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] unless `origin.len()` equals the dimension.
    pub fn set_origin(&mut self, origin: &[f64]) -> Result<()> {
        self.update_geometry("set_origin", |g| g.set_origin(origin))
    }

    /// Sets the spacing.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] unless `spacing.len()` equals the
    /// dimension, [`Error::InvalidGeometry`] for non-positive entries.
    pub fn set_spacing(&mut self, spacing: &[f64]) -> Result<()> {
        self.update_geometry("set_spacing", |g| g.set_spacing(spacing))
    }

    /// Sets the row-major direction cosine matrix.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] unless `direction.len()` is the dimension squared.
    pub fn set_direction(&mut self, direction: &[f64]) -> Result<()> {
        self.update_geometry("set_direction", |g| g.set_direction(direction))
    }

    fn update_geometry(
        &mut self,
        operation: &'static str,
        update: impl FnOnce(&mut Geometry) -> Result<()>,
    ) -> Result<()> {
        let mut geometry = self.cell(operation)?.geometry.clone();
        update(&mut geometry)?;
        self.cell_mut(operation)?.geometry = geometry;
        Ok(())
    }

    /// Copies origin, spacing and direction from `src`. Metadata is not copied.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] or [`Error::SizeMismatch`] unless both
    /// images have the same size.
    pub fn copy_information(&mut self, src: &Image) -> Result<()> {
        const OPERATION: &str = "copy_information";
        let source = src.cell(OPERATION)?;
        let size = self.repr(OPERATION)?.size();
        let src_size = source.repr.size();
        if size.len() != src_size.len() {
            return Err(Error::dimension_mismatch(OPERATION, size.len(), src_size.len()));
        }
        if size != src_size {
            return Err(Error::SizeMismatch {
                expected: size.to_vec(),
                actual: src_size.to_vec(),
            });
        }
        let geometry = source.geometry.clone();
        self.cell_mut(OPERATION)?.geometry = geometry;
        Ok(())
    }

    /// Physical point of an integer index.
    pub fn transform_index_to_physical_point(&self, index: &[i64]) -> Result<Vec<f64>> {
        self.geometry_for("transform_index_to_physical_point")?
            .index_to_physical_point(index)
    }

    /// Physical point of a continuous index.
    pub fn transform_continuous_index_to_physical_point(&self, index: &[f64]) -> Result<Vec<f64>> {
        self.geometry_for("transform_continuous_index_to_physical_point")?
            .continuous_index_to_physical_point(index)
    }

    /// Nearest integer index of a physical point.
    pub fn transform_physical_point_to_index(&self, point: &[f64]) -> Result<Vec<i64>> {
        self.geometry_for("transform_physical_point_to_index")?
            .physical_point_to_index(point)
    }

    /// Continuous index of a physical point.
    pub fn transform_physical_point_to_continuous_index(&self, point: &[f64]) -> Result<Vec<f64>> {
        self.geometry_for("transform_physical_point_to_continuous_index")?
            .physical_point_to_continuous_index(point)
    }

    fn geometry_for(&self, operation: &'static str) -> Result<&Geometry> {
        Ok(&self.cell(operation)?.geometry)
    }

    // ---- interpolation ----

    /// Interpolates the image at a continuous index.
    ///
    /// Returns every stored value of the interpolated pixel: one per vector
    /// component, real and imaginary part for complex pixels.
    ///
    /// # Errors
    ///
    /// - [`Error::OutOfBounds`] outside `[-0.5, size - 0.5]` on any axis
    /// - [`Error::UnsupportedOperation`] for label maps
    ///
    /// # Example
    ///
    /// ```rust
    /// use mdimage_core::{Image, Interpolator, PixelId};
    ///
    /// let img = Image::from_vec(&[2, 1], PixelId::Float64, 0, vec![0.0, 10.0]).unwrap();
    /// let v = img.evaluate_at_continuous_index(&[0.25, 0.0], Interpolator::Linear).unwrap();
    /// assert_eq!(v, vec![2.5]);
    /// assert!(img.evaluate_at_continuous_index(&[1.6, 0.0], Interpolator::Linear).is_err());
    /// ```
    pub fn evaluate_at_continuous_index(
        &self,
        index: &[f64],
        interpolator: Interpolator,
    ) -> Result<Vec<f64>> {
        interp::evaluate(self.repr("evaluate_at_continuous_index")?, index, interpolator)
    }

    /// Interpolates the image at a physical point.
    ///
    /// # Errors
    ///
    /// As [`evaluate_at_continuous_index`](Self::evaluate_at_continuous_index),
    /// plus [`Error::InvalidGeometry`] for a singular direction matrix.
    pub fn evaluate_at_physical_point(
        &self,
        point: &[f64],
        interpolator: Interpolator,
    ) -> Result<Vec<f64>> {
        const OPERATION: &str = "evaluate_at_physical_point";
        let cell = self.cell(OPERATION)?;
        if cell.repr.pixel_id().is_label() {
            return Err(Error::unsupported("interpolation", cell.repr.pixel_id()));
        }
        let index = cell.geometry.physical_point_to_continuous_index(point)?;
        interp::evaluate(&*cell.repr, &index, interpolator)
    }

    // ---- metadata ----

    /// All metadata keys in sorted order.
    pub fn metadata_keys(&self) -> Result<Vec<String>> {
        Ok(self.cell("metadata_keys")?.metadata.keys())
    }

    /// Whether `key` is present.
    pub fn has_metadata_key(&self, key: &str) -> Result<bool> {
        Ok(self.cell("has_metadata_key")?.metadata.contains(key))
    }

    /// Value stored under `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if the key is absent.
    pub fn get_metadata(&self, key: &str) -> Result<&str> {
        self.cell("get_metadata")?
            .metadata
            .get(key)
            .ok_or_else(|| Error::KeyNotFound {
                key: key.to_string(),
            })
    }

    /// Inserts or replaces an entry.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.cell_mut("set_metadata")?.metadata.set(key, value);
        Ok(())
    }

    /// Removes an entry. Returns `true` if the key was present.
    ///
    /// Erasing an absent key does not detach a shared image.
    pub fn erase_metadata(&mut self, key: &str) -> Result<bool> {
        const OPERATION: &str = "erase_metadata";
        if !self.cell(OPERATION)?.metadata.contains(key) {
            return Ok(false);
        }
        Ok(self.cell_mut(OPERATION)?.metadata.remove(key))
    }

    // ---- conversion ----

    /// Converts the image to another pixel type.
    ///
    /// Geometry and metadata carry over. Numeric conversion follows Rust `as`
    /// rules. Scalar images convert to any kind; vector images convert to
    /// vectors, or to scalars when they have one component; complex images
    /// convert to complex; label maps convert to scalars and labels.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedPixelType`] if `pixel_id` is not available at this dimension
    /// - [`Error::UnsupportedOperation`] for combinations without a defined conversion
    ///
    /// # Example
    ///
    /// ```rust
    /// use mdimage_core::{Image, PixelId};
    ///
    /// let img = Image::from_vec(&[2, 1], PixelId::Float32, 0, vec![2.7f32, -2.7]).unwrap();
    /// let ints = img.cast(PixelId::Int8).unwrap();
    /// assert_eq!(ints.get_buffer_as_int8().unwrap(), &[2, -2]);
    /// ```
    pub fn cast(&self, pixel_id: PixelId) -> Result<Image> {
        let cell = self.cell("cast")?;
        let repr = cast::cast(&*cell.repr, pixel_id)?;
        Ok(Self {
            cell: Some(SharedCell::new(ImageCell {
                repr,
                geometry: cell.geometry.clone(),
                metadata: cell.metadata.clone(),
            })),
        })
    }
}

impl Default for Image {
    /// A 2-D `UInt8` image of size `[0, 0]`.
    fn default() -> Self {
        Self::from_repr(Box::new(DenseImage::<u8>::empty(PixelId::UInt8, 2, 1)))
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(shared) = &self.cell else {
            return writeln!(f, "Image (moved from)");
        };
        let cell = shared.get();
        let repr = &*cell.repr;
        let pixel_id = repr.pixel_id();
        writeln!(f, "Image")?;
        writeln!(f, "  PixelId: {} ({})", pixel_id, pixel_id.description())?;
        writeln!(f, "  Dimension: {}", repr.dimension())?;
        writeln!(f, "  Size: {:?}", repr.size())?;
        if pixel_id.kind() == PixelKind::Vector {
            writeln!(f, "  Components: {}", repr.components_per_pixel())?;
        }
        writeln!(f, "  Origin: {:?}", cell.geometry.origin())?;
        writeln!(f, "  Spacing: {:?}", cell.geometry.spacing())?;
        writeln!(f, "  Direction: {:?}", cell.geometry.direction())?;
        writeln!(f, "  References: {}", shared.ref_count())?;
        if cell.metadata.is_empty() {
            return Ok(());
        }
        writeln!(f, "  MetaData:")?;
        for (key, value) in cell.metadata.iter() {
            writeln!(f, "    {key} = {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_length_must_match_dimension() {
        for size in [&[4u32][..], &[1, 1, 1, 1, 1, 1]] {
            let err = Image::new(size, PixelId::UInt8).unwrap_err();
            assert!(err.is_allocation_error(), "{size:?}");
        }
        let err = Image::new(&[2, 2, 2, 2, 2], PixelId::LabelUInt8).unwrap_err();
        assert!(err.is_configuration_error());
        let err = Image::new(&[2, 2], PixelId::Unknown).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_queries() {
        let img = Image::with_components(&[5, 4, 3], PixelId::VectorInt16, 2).unwrap();
        assert_eq!(img.pixel_id().unwrap(), PixelId::VectorInt16);
        assert_eq!(img.pixel_id_value().unwrap(), 15);
        assert_eq!(img.pixel_id_type_as_string().unwrap(), "vector of 16-bit signed integer");
        assert_eq!(img.dimension().unwrap(), 3);
        assert_eq!(img.number_of_components_per_pixel().unwrap(), 2);
        assert_eq!(img.number_of_pixels().unwrap(), 60);
        assert_eq!(img.size_of_pixel_component().unwrap(), 2);
        assert_eq!((img.width().unwrap(), img.height().unwrap(), img.depth().unwrap()), (5, 4, 3));
        assert_eq!(Image::new_2d(3, 2, PixelId::UInt8).unwrap().depth().unwrap(), 0);
    }

    #[test]
    fn test_vector_defaults_to_dimension() {
        let img = Image::new_3d(2, 2, 2, PixelId::VectorFloat32).unwrap();
        assert_eq!(img.number_of_components_per_pixel().unwrap(), 3);
    }

    #[test]
    fn test_default_image() {
        let img = Image::default();
        assert_eq!(img.pixel_id().unwrap(), PixelId::UInt8);
        assert_eq!(img.size().unwrap(), &[0, 0]);
        assert_eq!(img.number_of_pixels().unwrap(), 0);
        assert_eq!(img.origin().unwrap(), &[0.0, 0.0]);
    }

    #[test]
    fn test_failed_setter_keeps_sharing() {
        let a = Image::new(&[2, 2], PixelId::Float32).unwrap();
        let mut b = a.clone();
        assert!(b.set_origin(&[1.0]).unwrap_err().is_shape_error());
        assert!(b.set_spacing(&[0.0, 1.0]).is_err());
        assert!(b.shares_data_with(&a));
        b.set_spacing(&[2.0, 3.0]).unwrap();
        assert!(!b.shares_data_with(&a));
        assert_eq!(a.spacing().unwrap(), &[1.0, 1.0]);
    }

    #[test]
    fn test_copy_information() {
        let mut src = Image::new(&[4, 3], PixelId::UInt8).unwrap();
        src.set_origin(&[1.0, 2.0]).unwrap();
        src.set_metadata("k", "v").unwrap();

        let mut dst = Image::new(&[4, 3], PixelId::Float64).unwrap();
        dst.copy_information(&src).unwrap();
        assert_eq!(dst.origin().unwrap(), &[1.0, 2.0]);
        assert!(!dst.has_metadata_key("k").unwrap());

        let mut other = Image::new(&[4, 4], PixelId::UInt8).unwrap();
        assert!(matches!(other.copy_information(&src), Err(Error::SizeMismatch { .. })));
        let mut other = Image::new(&[4, 3, 1], PixelId::UInt8).unwrap();
        assert!(matches!(
            other.copy_information(&src),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_erase_absent_key_keeps_sharing() {
        let a = Image::new(&[2, 2], PixelId::UInt8).unwrap();
        let mut b = a.clone();
        assert!(!b.erase_metadata("missing").unwrap());
        assert!(b.shares_data_with(&a));
    }

    #[test]
    fn test_moved_from() {
        let mut a = Image::new(&[2, 2], PixelId::UInt8).unwrap();
        let _b = a.take();
        assert!(matches!(a.pixel_id(), Err(Error::MovedFrom { .. })));
        assert!(matches!(a.set_metadata("k", "v"), Err(Error::MovedFrom { .. })));
        assert!(a.is_unique().is_err());
        assert!(a.to_string().contains("moved"));
        a = Image::new(&[3, 3], PixelId::Int8).unwrap();
        assert_eq!(a.size().unwrap(), &[3, 3]);
    }

    #[test]
    fn test_display() {
        let mut img = Image::new(&[4, 3], PixelId::Int16).unwrap();
        img.set_metadata("modality", "CT").unwrap();
        let text = img.to_string();
        assert!(text.contains("int16 (16-bit signed integer)"));
        assert!(text.contains("Size: [4, 3]"));
        assert!(text.contains("modality = CT"));
    }

    #[test]
    fn test_from_vec_checks_type() {
        let err = Image::from_vec(&[2, 1], PixelId::Int16, 0, vec![1u8, 2]).unwrap_err();
        assert!(err.is_type_error());
        let err = Image::from_vec(&[2, 1], PixelId::UInt8, 0, vec![1u8]).unwrap_err();
        assert!(err.is_allocation_error());
        let err = Image::from_vec(&[2, 1], PixelId::LabelUInt8, 0, vec![1u8, 2]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedOperation { .. }));
    }
}
