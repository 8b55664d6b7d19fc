//! Contiguous buffer storage for scalar, vector and complex pixels.

use super::{ImageBase, element_count};
use crate::buffer::{BufferMut, BufferRef};
use crate::error::{Error, Result};
use crate::pixel::{Component, PixelId, PixelKind};
use std::any::Any;
use tracing::trace;

/// Image stored as one contiguous buffer of `T`.
///
/// The buffer always holds exactly `number_of_pixels * values_per_pixel`
/// elements. Complex pixels keep real and imaginary parts interleaved, so
/// they have one logical component but two stored values.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseImage<T: Component> {
    pixel_id: PixelId,
    size: Vec<u32>,
    components: u32,
    values_per_pixel: usize,
    data: Vec<T>,
}

impl<T: Component> DenseImage<T> {
    /// Allocates a zero-initialized image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailed`] if the element count overflows or
    /// the allocator refuses the request.
    pub fn allocate(pixel_id: PixelId, size: &[u32], components: u32) -> Result<Self> {
        let values_per_pixel = Self::values_per_pixel_for(pixel_id, components);
        let count = Self::checked_count(size, values_per_pixel)?;

        let mut data = Vec::new();
        data.try_reserve_exact(count)
            .map_err(|e| Error::allocation_failed(size, e.to_string()))?;
        data.resize(count, T::default());

        trace!(pixel_id = %pixel_id, ?size, components, count, "DenseImage::allocate");
        Ok(Self {
            pixel_id,
            size: size.to_vec(),
            components,
            values_per_pixel,
            data,
        })
    }

    /// Wraps an existing buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailed`] if `data` does not hold exactly
    /// `number_of_pixels * values_per_pixel` elements.
    pub fn from_vec(pixel_id: PixelId, size: &[u32], components: u32, data: Vec<T>) -> Result<Self> {
        let values_per_pixel = Self::values_per_pixel_for(pixel_id, components);
        let count = Self::checked_count(size, values_per_pixel)?;
        if data.len() != count {
            return Err(Error::allocation_failed(
                size,
                format!("expected {} elements, got {}", count, data.len()),
            ));
        }
        Ok(Self {
            pixel_id,
            size: size.to_vec(),
            components,
            values_per_pixel,
            data,
        })
    }

    /// Image with zero pixels along every axis.
    pub fn empty(pixel_id: PixelId, dimension: usize, components: u32) -> Self {
        Self {
            pixel_id,
            size: vec![0; dimension],
            components,
            values_per_pixel: Self::values_per_pixel_for(pixel_id, components),
            data: Vec::new(),
        }
    }

    fn values_per_pixel_for(pixel_id: PixelId, components: u32) -> usize {
        match pixel_id.kind() {
            PixelKind::Complex => 2,
            _ => components as usize,
        }
    }

    fn checked_count(size: &[u32], values_per_pixel: usize) -> Result<usize> {
        let count = element_count(size, values_per_pixel)
            .ok_or_else(|| Error::allocation_failed(size, "element count overflows usize"))?;
        if count.checked_mul(std::mem::size_of::<T>()).is_none_or(|b| b > isize::MAX as usize) {
            return Err(Error::allocation_failed(size, "buffer exceeds addressable memory"));
        }
        Ok(count)
    }

    /// The whole buffer.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// The whole buffer, mutably.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Stored values of the pixel at `offset`.
    #[inline]
    pub fn pixel(&self, offset: usize) -> &[T] {
        let start = offset * self.values_per_pixel;
        &self.data[start..start + self.values_per_pixel]
    }

    /// Stored values of the pixel at `offset`, mutably.
    #[inline]
    pub fn pixel_mut(&mut self, offset: usize) -> &mut [T] {
        let start = offset * self.values_per_pixel;
        &mut self.data[start..start + self.values_per_pixel]
    }
}

impl<T: Component> ImageBase for DenseImage<T> {
    fn pixel_id(&self) -> PixelId {
        self.pixel_id
    }

    fn size(&self) -> &[u32] {
        &self.size
    }

    fn components_per_pixel(&self) -> u32 {
        self.components
    }

    fn values_per_pixel(&self) -> usize {
        self.values_per_pixel
    }

    fn buffer(&self) -> Option<BufferRef<'_>> {
        Some(T::wrap(&self.data))
    }

    fn buffer_mut(&mut self) -> Option<BufferMut<'_>> {
        Some(T::wrap_mut(&mut self.data))
    }

    #[inline]
    fn read_component(&self, index: usize) -> f64 {
        debug_assert!(index < self.data.len(), "component index out of range");
        self.data[index].to_f64()
    }

    #[inline]
    fn write_component(&mut self, index: usize, value: f64) {
        debug_assert!(index < self.data.len(), "component index out of range");
        self.data[index] = T::from_f64(value);
    }

    fn read_pixel(&self, offset: usize, out: &mut Vec<f64>) {
        out.extend(self.pixel(offset).iter().map(|v| v.to_f64()));
    }

    fn copy(&self) -> Box<dyn ImageBase> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
