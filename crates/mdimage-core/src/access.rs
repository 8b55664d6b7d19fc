//! Typed pixel and buffer access.
//!
//! Every accessor is bound to one component type `T` and only succeeds on an
//! image whose pixel type stores exactly that type; anything else fails with
//! [`Error::TypeMismatch`]. Values are never reinterpreted or converted on
//! the way in or out: use [`Image::cast`] or [`Image::pixel_values`] for that.
//!
//! | accessor                           | accepted pixel types       |
//! |------------------------------------|----------------------------|
//! | `pixel`, `set_pixel`               | scalar `T`, label `T`      |
//! | `vector_pixel`, `set_vector_pixel` | vector `T`                 |
//! | `complex_pixel`, `set_complex_pixel` | complex `T`              |
//! | `buffer`, `buffer_mut`             | scalar, vector, complex `T` |
//! | `label_map`                        | label `T`                  |
//!
//! Each generic accessor also has named forms such as
//! [`get_pixel_as_int16`](Image::get_pixel_as_int16) or
//! [`get_buffer_as_float32_mut`](Image::get_buffer_as_float32_mut).
//!
//! Index arguments may have more entries than the image has dimensions; the
//! extra entries are ignored.

use crate::error::{Error, Result};
use crate::image::Image;
use crate::pixel::{Component, ComponentType, LabelComponent, PixelId};
use crate::repr::{DenseImage, ImageBase, LabelMap, pixel_offset};
use num_complex::Complex;

const GET_PIXEL: &str = "get_pixel";
const SET_PIXEL: &str = "set_pixel";
const GET_BUFFER: &str = "get_buffer";

/// Expected pixel type reported when a buffer accessor does not match.
fn expected_for(actual: PixelId, component: ComponentType) -> PixelId {
    PixelId::from_parts(actual.kind(), component).unwrap_or(PixelId::scalar(component))
}

fn dense<'a, T: Component>(
    repr: &'a dyn ImageBase,
    expected: PixelId,
    operation: impl FnOnce() -> String,
) -> Result<&'a DenseImage<T>> {
    let actual = repr.pixel_id();
    repr.as_any()
        .downcast_ref::<DenseImage<T>>()
        .filter(|_| actual == expected)
        .ok_or_else(|| Error::type_mismatch(operation(), expected, actual))
}

fn dense_mut<'a, T: Component>(
    repr: &'a mut dyn ImageBase,
    expected: PixelId,
    operation: impl FnOnce() -> String,
) -> Result<&'a mut DenseImage<T>> {
    let actual = repr.pixel_id();
    repr.as_any_mut()
        .downcast_mut::<DenseImage<T>>()
        .filter(|_| actual == expected)
        .ok_or_else(|| Error::type_mismatch(operation(), expected, actual))
}

impl Image {
    /// Reads a scalar pixel, or the label of a label map pixel.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeMismatch`] unless the image is scalar `T` or label `T`
    /// - [`Error::OutOfBounds`] for an index outside the image
    /// - [`Error::DimensionMismatch`] for an index shorter than the dimension
    pub fn pixel<T: Component>(&self, index: &[u32]) -> Result<T> {
        let repr = self.repr(GET_PIXEL)?;
        if repr.pixel_id() == PixelId::label(T::TYPE) {
            let offset = pixel_offset(GET_PIXEL, repr.size(), index)?;
            if let Some(label) = repr.get_label(offset) {
                return Ok(T::from_u64(label));
            }
        }
        let image = dense::<T>(repr, PixelId::scalar(T::TYPE), || {
            format!("get_pixel_as_{}", T::TYPE)
        })?;
        let offset = pixel_offset(GET_PIXEL, repr.size(), index)?;
        Ok(image.pixel(offset)[0])
    }

    /// Writes a scalar pixel, or the label of a label map pixel.
    ///
    /// # Errors
    ///
    /// As [`pixel`](Self::pixel). On error the image is left untouched and
    /// still shares its data.
    pub fn set_pixel<T: Component>(&mut self, index: &[u32], value: T) -> Result<()> {
        let expected = PixelId::scalar(T::TYPE);
        let operation = || format!("set_pixel_as_{}", T::TYPE);
        let (offset, label) = {
            let repr = self.repr(SET_PIXEL)?;
            let label = repr.pixel_id() == PixelId::label(T::TYPE);
            if !label {
                dense::<T>(repr, expected, operation)?;
            }
            (pixel_offset(SET_PIXEL, repr.size(), index)?, label)
        };

        let repr = &mut *self.cell_mut(SET_PIXEL)?.repr;
        if label {
            repr.set_label(offset, value.to_u64());
        } else {
            dense_mut::<T>(repr, expected, operation)?.pixel_mut(offset)[0] = value;
        }
        Ok(())
    }

    /// Reads every component of a vector pixel.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] unless the image is vector `T`; bounds as
    /// [`pixel`](Self::pixel).
    pub fn vector_pixel<T: Component>(&self, index: &[u32]) -> Result<Vec<T>> {
        let repr = self.repr(GET_PIXEL)?;
        let image = dense::<T>(repr, PixelId::vector(T::TYPE), || {
            format!("get_pixel_as_vector_{}", T::TYPE)
        })?;
        let offset = pixel_offset(GET_PIXEL, repr.size(), index)?;
        Ok(image.pixel(offset).to_vec())
    }

    /// Writes every component of a vector pixel.
    ///
    /// # Errors
    ///
    /// As [`vector_pixel`](Self::vector_pixel), plus
    /// [`Error::DimensionMismatch`] unless `value` has one entry per component.
    pub fn set_vector_pixel<T: Component>(&mut self, index: &[u32], value: &[T]) -> Result<()> {
        let expected = PixelId::vector(T::TYPE);
        let operation = || format!("set_pixel_as_vector_{}", T::TYPE);
        let offset = {
            let repr = self.repr(SET_PIXEL)?;
            dense::<T>(repr, expected, operation)?;
            let components = repr.components_per_pixel() as usize;
            if value.len() != components {
                return Err(Error::dimension_mismatch("vector pixel", components, value.len()));
            }
            pixel_offset(SET_PIXEL, repr.size(), index)?
        };

        let repr = &mut *self.cell_mut(SET_PIXEL)?.repr;
        dense_mut::<T>(repr, expected, operation)?
            .pixel_mut(offset)
            .copy_from_slice(value);
        Ok(())
    }

    /// Reads a complex pixel.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] unless the image is complex `T`; bounds as
    /// [`pixel`](Self::pixel).
    pub fn complex_pixel<T: Component>(&self, index: &[u32]) -> Result<Complex<T>> {
        let repr = self.repr(GET_PIXEL)?;
        let image = dense::<T>(repr, PixelId::complex(T::TYPE), || {
            format!("get_pixel_as_complex_{}", T::TYPE)
        })?;
        let offset = pixel_offset(GET_PIXEL, repr.size(), index)?;
        let parts = image.pixel(offset);
        Ok(Complex::new(parts[0], parts[1]))
    }

    /// Writes a complex pixel.
    ///
    /// # Errors
    ///
    /// As [`complex_pixel`](Self::complex_pixel).
    pub fn set_complex_pixel<T: Component>(&mut self, index: &[u32], value: Complex<T>) -> Result<()> {
        let expected = PixelId::complex(T::TYPE);
        let operation = || format!("set_pixel_as_complex_{}", T::TYPE);
        let offset = {
            let repr = self.repr(SET_PIXEL)?;
            dense::<T>(repr, expected, operation)?;
            pixel_offset(SET_PIXEL, repr.size(), index)?
        };

        let repr = &mut *self.cell_mut(SET_PIXEL)?.repr;
        let parts = dense_mut::<T>(repr, expected, operation)?.pixel_mut(offset);
        parts[0] = value.re;
        parts[1] = value.im;
        Ok(())
    }

    /// Reads every stored value of a pixel widened to `f64`.
    ///
    /// Works for every pixel type: one value for scalar and label pixels, one
    /// per component for vector pixels, real then imaginary part for complex
    /// pixels.
    pub fn pixel_values(&self, index: &[u32]) -> Result<Vec<f64>> {
        let repr = self.repr("pixel_values")?;
        let offset = pixel_offset("pixel_values", repr.size(), index)?;
        let mut out = Vec::with_capacity(repr.values_per_pixel());
        repr.read_pixel(offset, &mut out);
        Ok(out)
    }

    /// The whole pixel buffer.
    ///
    /// Vector and complex images expose their components, so a
    /// `VectorFloat32` image is read with `buffer::<f32>()`.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeMismatch`] unless `T` is the component type of the image
    /// - [`Error::UnsupportedOperation`] for label maps, which have no buffer
    ///
    /// # Example
    ///
    /// ```rust
    /// use mdimage_core::{Image, PixelId};
    ///
    /// let img = Image::new(&[3, 2], PixelId::VectorUInt16).unwrap();
    /// assert_eq!(img.buffer::<u16>().unwrap().len(), 3 * 2 * 2);
    /// assert!(img.buffer::<i16>().unwrap_err().is_type_error());
    /// ```
    pub fn buffer<T: Component>(&self) -> Result<&[T]> {
        let repr = self.repr(GET_BUFFER)?;
        let actual = repr.pixel_id();
        let operation = || format!("get_buffer_as_{}", T::TYPE);
        let buffer = repr
            .buffer()
            .ok_or_else(|| Error::unsupported(operation(), actual))?;
        T::from_buffer(buffer)
            .ok_or_else(|| Error::type_mismatch(operation(), expected_for(actual, T::TYPE), actual))
    }

    /// The whole pixel buffer, mutably.
    ///
    /// Detaches the image from any other image sharing its data before
    /// returning, so writes through the slice stay private.
    ///
    /// # Errors
    ///
    /// As [`buffer`](Self::buffer). On error the image still shares its data.
    pub fn buffer_mut<T: Component>(&mut self) -> Result<&mut [T]> {
        let operation = || format!("get_buffer_as_{}_mut", T::TYPE);
        let actual = {
            let repr = self.repr(GET_BUFFER)?;
            let actual = repr.pixel_id();
            let buffer = repr
                .buffer()
                .ok_or_else(|| Error::unsupported(operation(), actual))?;
            if buffer.component_type() != T::TYPE {
                return Err(Error::type_mismatch(operation(), expected_for(actual, T::TYPE), actual));
            }
            actual
        };

        self.cell_mut(GET_BUFFER)?
            .repr
            .buffer_mut()
            .and_then(T::from_buffer_mut)
            .ok_or_else(|| Error::type_mismatch(operation(), expected_for(actual, T::TYPE), actual))
    }

    /// Raw bytes of the pixel buffer in native endianness.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedOperation`] for label maps.
    pub fn buffer_bytes(&self) -> Result<&[u8]> {
        let repr = self.repr(GET_BUFFER)?;
        repr.buffer()
            .map(|b| b.as_bytes())
            .ok_or_else(|| Error::unsupported("get_buffer_as_bytes", repr.pixel_id()))
    }

    /// The run-length encoded storage of a label map, for diagnostics.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] unless the image is label `T`.
    pub fn label_map<T: LabelComponent>(&self) -> Result<&LabelMap<T>> {
        let repr = self.repr("label_map")?;
        let expected = PixelId::label(T::TYPE);
        let actual = repr.pixel_id();
        repr.as_any()
            .downcast_ref::<LabelMap<T>>()
            .filter(|_| actual == expected)
            .ok_or_else(|| Error::type_mismatch(format!("label_map_{}", T::TYPE), expected, actual))
    }
}

macro_rules! named_accessors {
    ($($t:ty {
        $get:ident, $set:ident,
        $get_vector:ident, $set_vector:ident,
        $buffer:ident, $buffer_mut:ident $(,)?
    }),* $(,)?) => {
        impl Image {
            $(
                #[doc = concat!("Reads a scalar or label pixel as `", stringify!($t), "`. See [`pixel`](Self::pixel).")]
                #[inline]
                pub fn $get(&self, index: &[u32]) -> Result<$t> {
                    self.pixel::<$t>(index)
                }

                #[doc = concat!("Writes a scalar or label pixel as `", stringify!($t), "`. See [`set_pixel`](Self::set_pixel).")]
                #[inline]
                pub fn $set(&mut self, index: &[u32], value: $t) -> Result<()> {
                    self.set_pixel::<$t>(index, value)
                }

                #[doc = concat!("Reads a vector pixel of `", stringify!($t), "`. See [`vector_pixel`](Self::vector_pixel).")]
                #[inline]
                pub fn $get_vector(&self, index: &[u32]) -> Result<Vec<$t>> {
                    self.vector_pixel::<$t>(index)
                }

                #[doc = concat!("Writes a vector pixel of `", stringify!($t), "`. See [`set_vector_pixel`](Self::set_vector_pixel).")]
                #[inline]
                pub fn $set_vector(&mut self, index: &[u32], value: &[$t]) -> Result<()> {
                    self.set_vector_pixel::<$t>(index, value)
                }

                #[doc = concat!("The pixel buffer as `", stringify!($t), "`. See [`buffer`](Self::buffer).")]
                #[inline]
                pub fn $buffer(&self) -> Result<&[$t]> {
                    self.buffer::<$t>()
                }

                #[doc = concat!("The pixel buffer as mutable `", stringify!($t), "`. See [`buffer_mut`](Self::buffer_mut).")]
                #[inline]
                pub fn $buffer_mut(&mut self) -> Result<&mut [$t]> {
                    self.buffer_mut::<$t>()
                }
            )*
        }
    };
}

named_accessors! {
    i8 {
        get_pixel_as_int8, set_pixel_as_int8,
        get_pixel_as_vector_int8, set_pixel_as_vector_int8,
        get_buffer_as_int8, get_buffer_as_int8_mut,
    },
    u8 {
        get_pixel_as_uint8, set_pixel_as_uint8,
        get_pixel_as_vector_uint8, set_pixel_as_vector_uint8,
        get_buffer_as_uint8, get_buffer_as_uint8_mut,
    },
    i16 {
        get_pixel_as_int16, set_pixel_as_int16,
        get_pixel_as_vector_int16, set_pixel_as_vector_int16,
        get_buffer_as_int16, get_buffer_as_int16_mut,
    },
    u16 {
        get_pixel_as_uint16, set_pixel_as_uint16,
        get_pixel_as_vector_uint16, set_pixel_as_vector_uint16,
        get_buffer_as_uint16, get_buffer_as_uint16_mut,
    },
    i32 {
        get_pixel_as_int32, set_pixel_as_int32,
        get_pixel_as_vector_int32, set_pixel_as_vector_int32,
        get_buffer_as_int32, get_buffer_as_int32_mut,
    },
    u32 {
        get_pixel_as_uint32, set_pixel_as_uint32,
        get_pixel_as_vector_uint32, set_pixel_as_vector_uint32,
        get_buffer_as_uint32, get_buffer_as_uint32_mut,
    },
    i64 {
        get_pixel_as_int64, set_pixel_as_int64,
        get_pixel_as_vector_int64, set_pixel_as_vector_int64,
        get_buffer_as_int64, get_buffer_as_int64_mut,
    },
    u64 {
        get_pixel_as_uint64, set_pixel_as_uint64,
        get_pixel_as_vector_uint64, set_pixel_as_vector_uint64,
        get_buffer_as_uint64, get_buffer_as_uint64_mut,
    },
    f32 {
        get_pixel_as_float32, set_pixel_as_float32,
        get_pixel_as_vector_float32, set_pixel_as_vector_float32,
        get_buffer_as_float32, get_buffer_as_float32_mut,
    },
    f64 {
        get_pixel_as_float64, set_pixel_as_float64,
        get_pixel_as_vector_float64, set_pixel_as_vector_float64,
        get_buffer_as_float64, get_buffer_as_float64_mut,
    },
}

impl Image {
    /// Reads a complex `f32` pixel. See [`complex_pixel`](Self::complex_pixel).
    #[inline]
    pub fn get_pixel_as_complex_float32(&self, index: &[u32]) -> Result<Complex<f32>> {
        self.complex_pixel::<f32>(index)
    }

    /// Writes a complex `f32` pixel. See [`set_complex_pixel`](Self::set_complex_pixel).
    #[inline]
    pub fn set_pixel_as_complex_float32(&mut self, index: &[u32], value: Complex<f32>) -> Result<()> {
        self.set_complex_pixel::<f32>(index, value)
    }

    /// Reads a complex `f64` pixel. See [`complex_pixel`](Self::complex_pixel).
    #[inline]
    pub fn get_pixel_as_complex_float64(&self, index: &[u32]) -> Result<Complex<f64>> {
        self.complex_pixel::<f64>(index)
    }

    /// Writes a complex `f64` pixel. See [`set_complex_pixel`](Self::set_complex_pixel).
    #[inline]
    pub fn set_pixel_as_complex_float64(&mut self, index: &[u32], value: Complex<f64>) -> Result<()> {
        self.set_complex_pixel::<f64>(index, value)
    }
}
