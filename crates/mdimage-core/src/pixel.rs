//! Pixel type identifiers and component types.
//!
//! A pixel representation is described on two levels:
//!
//! - [`ComponentType`] - the numeric type of one stored value (`i16`, `f32`, ...)
//! - [`PixelId`] - the full pixel type tag: component type combined with a
//!   [`PixelKind`] (scalar, vector, complex or run-length label)
//!
//! The [`Component`] trait ties the Rust primitive types to their runtime
//! [`ComponentType`] and is the bound used by every typed accessor.
//!
//! # Stable values
//!
//! [`PixelId::value`] returns a stable integer for each tag so that callers
//! outside Rust can key on it:
//!
//! | kind    | u8 | i8 | u16 | i16 | u32 | i32 | u64 | i64 | f32 | f64 |
//! |---------|----|----|-----|-----|-----|-----|-----|-----|-----|-----|
//! | scalar  | 0  | 1  | 2   | 3   | 4   | 5   | 6   | 7   | 8   | 9   |
//! | complex |    |    |     |     |     |     |     |     | 10  | 11  |
//! | vector  | 12 | 13 | 14  | 15  | 16  | 17  | 18  | 19  | 20  | 21  |
//! | label   | 22 |    | 23  |     | 24  |     | 25  |     |     |     |
//!
//! `Unknown` is `-1`.
//!
//! # Usage
//!
//! ```rust
//! use mdimage_core::{ComponentType, PixelId, PixelKind};
//!
//! let id: PixelId = "vector-float32".parse().unwrap();
//! assert_eq!(id.kind(), PixelKind::Vector);
//! assert_eq!(id.component_type(), Some(ComponentType::Float32));
//! assert_eq!(id.value(), 20);
//! assert_eq!(id.description(), "vector of 32-bit float");
//! ```

use crate::buffer::{BufferMut, BufferRef};
use std::fmt;
use std::str::FromStr;

/// Numeric type of a single stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// `i8`
    Int8,
    /// `u8`
    UInt8,
    /// `i16`
    Int16,
    /// `u16`
    UInt16,
    /// `i32`
    Int32,
    /// `u32`
    UInt32,
    /// `i64`
    Int64,
    /// `u64`
    UInt64,
    /// `f32`
    Float32,
    /// `f64`
    Float64,
}

impl ComponentType {
    /// All component types, narrowest integers first.
    pub const ALL: [ComponentType; 10] = [
        Self::UInt8,
        Self::Int8,
        Self::UInt16,
        Self::Int16,
        Self::UInt32,
        Self::Int32,
        Self::UInt64,
        Self::Int64,
        Self::Float32,
        Self::Float64,
    ];

    /// Size of one component in bytes.
    #[inline]
    pub const fn size_of(&self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }

    /// Whether this is a floating-point type.
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Whether this is an unsigned integer type.
    #[inline]
    pub const fn is_unsigned(&self) -> bool {
        matches!(self, Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64)
    }

    /// Short lower-case name (`"int16"`, `"float32"`).
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Human readable description (`"16-bit signed integer"`).
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Int8 => "8-bit signed integer",
            Self::UInt8 => "8-bit unsigned integer",
            Self::Int16 => "16-bit signed integer",
            Self::UInt16 => "16-bit unsigned integer",
            Self::Int32 => "32-bit signed integer",
            Self::UInt32 => "32-bit unsigned integer",
            Self::Int64 => "64-bit signed integer",
            Self::UInt64 => "64-bit unsigned integer",
            Self::Float32 => "32-bit float",
            Self::Float64 => "64-bit float",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How components are grouped into a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelKind {
    /// One component per pixel.
    Scalar,
    /// Real and imaginary part stored interleaved; one logical component.
    Complex,
    /// A runtime number of components per pixel.
    Vector,
    /// Run-length encoded label map.
    Label,
    /// The `Unknown` tag.
    Unknown,
}

/// Pixel type tag of an image.
///
/// The tag is fixed when the image is constructed. Changing the pixel type
/// means building a new image with [`Image::cast`](crate::Image::cast).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(i32)]
pub enum PixelId {
    /// Not a valid pixel type.
    #[default]
    Unknown = -1,
    /// Scalar `u8`
    UInt8 = 0,
    /// Scalar `i8`
    Int8 = 1,
    /// Scalar `u16`
    UInt16 = 2,
    /// Scalar `i16`
    Int16 = 3,
    /// Scalar `u32`
    UInt32 = 4,
    /// Scalar `i32`
    Int32 = 5,
    /// Scalar `u64`
    UInt64 = 6,
    /// Scalar `i64`
    Int64 = 7,
    /// Scalar `f32`
    Float32 = 8,
    /// Scalar `f64`
    Float64 = 9,
    /// Complex of `f32`
    ComplexFloat32 = 10,
    /// Complex of `f64`
    ComplexFloat64 = 11,
    /// Vector of `u8`
    VectorUInt8 = 12,
    /// Vector of `i8`
    VectorInt8 = 13,
    /// Vector of `u16`
    VectorUInt16 = 14,
    /// Vector of `i16`
    VectorInt16 = 15,
    /// Vector of `u32`
    VectorUInt32 = 16,
    /// Vector of `i32`
    VectorInt32 = 17,
    /// Vector of `u64`
    VectorUInt64 = 18,
    /// Vector of `i64`
    VectorInt64 = 19,
    /// Vector of `f32`
    VectorFloat32 = 20,
    /// Vector of `f64`
    VectorFloat64 = 21,
    /// Label map of `u8`
    LabelUInt8 = 22,
    /// Label map of `u16`
    LabelUInt16 = 23,
    /// Label map of `u32`
    LabelUInt32 = 24,
    /// Label map of `u64`
    LabelUInt64 = 25,
}

impl PixelId {
    /// Every valid tag in value order (`Unknown` excluded).
    pub const ALL: [PixelId; 26] = [
        Self::UInt8,
        Self::Int8,
        Self::UInt16,
        Self::Int16,
        Self::UInt32,
        Self::Int32,
        Self::UInt64,
        Self::Int64,
        Self::Float32,
        Self::Float64,
        Self::ComplexFloat32,
        Self::ComplexFloat64,
        Self::VectorUInt8,
        Self::VectorInt8,
        Self::VectorUInt16,
        Self::VectorInt16,
        Self::VectorUInt32,
        Self::VectorInt32,
        Self::VectorUInt64,
        Self::VectorInt64,
        Self::VectorFloat32,
        Self::VectorFloat64,
        Self::LabelUInt8,
        Self::LabelUInt16,
        Self::LabelUInt32,
        Self::LabelUInt64,
    ];

    /// Stable integer value of this tag.
    #[inline]
    pub const fn value(&self) -> i32 {
        *self as i32
    }

    /// Looks up a tag by its stable integer value.
    pub fn from_value(value: i32) -> Option<Self> {
        if value == -1 {
            return Some(Self::Unknown);
        }
        usize::try_from(value).ok().and_then(|v| Self::ALL.get(v).copied())
    }

    /// Builds the tag for a kind and component type, if that combination exists.
    ///
    /// Complex pixels exist for float components only, label maps for unsigned
    /// integers only.
    pub const fn from_parts(kind: PixelKind, component: ComponentType) -> Option<Self> {
        use ComponentType as C;
        let id = match (kind, component) {
            (PixelKind::Scalar, C::UInt8) => Self::UInt8,
            (PixelKind::Scalar, C::Int8) => Self::Int8,
            (PixelKind::Scalar, C::UInt16) => Self::UInt16,
            (PixelKind::Scalar, C::Int16) => Self::Int16,
            (PixelKind::Scalar, C::UInt32) => Self::UInt32,
            (PixelKind::Scalar, C::Int32) => Self::Int32,
            (PixelKind::Scalar, C::UInt64) => Self::UInt64,
            (PixelKind::Scalar, C::Int64) => Self::Int64,
            (PixelKind::Scalar, C::Float32) => Self::Float32,
            (PixelKind::Scalar, C::Float64) => Self::Float64,
            (PixelKind::Complex, C::Float32) => Self::ComplexFloat32,
            (PixelKind::Complex, C::Float64) => Self::ComplexFloat64,
            (PixelKind::Vector, C::UInt8) => Self::VectorUInt8,
            (PixelKind::Vector, C::Int8) => Self::VectorInt8,
            (PixelKind::Vector, C::UInt16) => Self::VectorUInt16,
            (PixelKind::Vector, C::Int16) => Self::VectorInt16,
            (PixelKind::Vector, C::UInt32) => Self::VectorUInt32,
            (PixelKind::Vector, C::Int32) => Self::VectorInt32,
            (PixelKind::Vector, C::UInt64) => Self::VectorUInt64,
            (PixelKind::Vector, C::Int64) => Self::VectorInt64,
            (PixelKind::Vector, C::Float32) => Self::VectorFloat32,
            (PixelKind::Vector, C::Float64) => Self::VectorFloat64,
            (PixelKind::Label, C::UInt8) => Self::LabelUInt8,
            (PixelKind::Label, C::UInt16) => Self::LabelUInt16,
            (PixelKind::Label, C::UInt32) => Self::LabelUInt32,
            (PixelKind::Label, C::UInt64) => Self::LabelUInt64,
            _ => return None,
        };
        Some(id)
    }

    /// Scalar tag for a component type.
    #[inline]
    pub const fn scalar(component: ComponentType) -> Self {
        match Self::from_parts(PixelKind::Scalar, component) {
            Some(id) => id,
            None => Self::Unknown,
        }
    }

    /// Vector tag for a component type.
    #[inline]
    pub const fn vector(component: ComponentType) -> Self {
        match Self::from_parts(PixelKind::Vector, component) {
            Some(id) => id,
            None => Self::Unknown,
        }
    }

    /// Complex tag for a component type, `Unknown` for integers.
    #[inline]
    pub const fn complex(component: ComponentType) -> Self {
        match Self::from_parts(PixelKind::Complex, component) {
            Some(id) => id,
            None => Self::Unknown,
        }
    }

    /// Label tag for a component type, `Unknown` for signed and float types.
    #[inline]
    pub const fn label(component: ComponentType) -> Self {
        match Self::from_parts(PixelKind::Label, component) {
            Some(id) => id,
            None => Self::Unknown,
        }
    }

    /// Kind of this tag.
    pub const fn kind(&self) -> PixelKind {
        match self.value() {
            -1 => PixelKind::Unknown,
            0..=9 => PixelKind::Scalar,
            10 | 11 => PixelKind::Complex,
            12..=21 => PixelKind::Vector,
            _ => PixelKind::Label,
        }
    }

    /// Component type of this tag, `None` for `Unknown`.
    pub const fn component_type(&self) -> Option<ComponentType> {
        use ComponentType as C;
        let component = match self {
            Self::Unknown => return None,
            Self::UInt8 | Self::VectorUInt8 | Self::LabelUInt8 => C::UInt8,
            Self::Int8 | Self::VectorInt8 => C::Int8,
            Self::UInt16 | Self::VectorUInt16 | Self::LabelUInt16 => C::UInt16,
            Self::Int16 | Self::VectorInt16 => C::Int16,
            Self::UInt32 | Self::VectorUInt32 | Self::LabelUInt32 => C::UInt32,
            Self::Int32 | Self::VectorInt32 => C::Int32,
            Self::UInt64 | Self::VectorUInt64 | Self::LabelUInt64 => C::UInt64,
            Self::Int64 | Self::VectorInt64 => C::Int64,
            Self::Float32 | Self::ComplexFloat32 | Self::VectorFloat32 => C::Float32,
            Self::Float64 | Self::ComplexFloat64 | Self::VectorFloat64 => C::Float64,
        };
        Some(component)
    }

    /// Whether this is a label map tag.
    #[inline]
    pub const fn is_label(&self) -> bool {
        matches!(self.kind(), PixelKind::Label)
    }

    /// Short lower-case name, the inverse of [`FromStr`].
    pub fn name(&self) -> String {
        let Some(component) = self.component_type() else {
            return "unknown".to_string();
        };
        match self.kind() {
            PixelKind::Scalar => component.name().to_string(),
            PixelKind::Complex => format!("complex-{}", component.name()),
            PixelKind::Vector => format!("vector-{}", component.name()),
            PixelKind::Label => format!("label-{}", component.name()),
            PixelKind::Unknown => "unknown".to_string(),
        }
    }

    /// Human readable description, e.g. `"vector of 16-bit signed integer"`.
    pub fn description(&self) -> String {
        let Some(component) = self.component_type() else {
            return "Unknown pixel id".to_string();
        };
        match self.kind() {
            PixelKind::Scalar => component.description().to_string(),
            PixelKind::Complex => format!("complex of {}", component.description()),
            PixelKind::Vector => format!("vector of {}", component.description()),
            PixelKind::Label => format!("label of {}", component.description()),
            PixelKind::Unknown => "Unknown pixel id".to_string(),
        }
    }
}

impl fmt::Display for PixelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for PixelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "unknown" {
            return Ok(Self::Unknown);
        }
        let (kind, component) = match lower.split_once('-') {
            Some(("vector", c)) => (PixelKind::Vector, c),
            Some(("complex", c)) => (PixelKind::Complex, c),
            Some(("label", c)) => (PixelKind::Label, c),
            Some(_) => return Err(format!("unknown pixel type: {s}")),
            None => (PixelKind::Scalar, lower.as_str()),
        };
        let component = ComponentType::ALL
            .iter()
            .find(|c| c.name() == component)
            .ok_or_else(|| format!("unknown component type in pixel type: {s}"))?;
        Self::from_parts(kind, *component)
            .ok_or_else(|| format!("no {kind:?} pixel type with {component} components"))
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A primitive numeric type that can be stored in an image buffer.
///
/// Implemented for `i8`, `u8`, `i16`, `u16`, `i32`, `u32`, `i64`, `u64`,
/// `f32` and `f64`. The trait is sealed.
pub trait Component:
    Copy
    + Default
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + fmt::Debug
    + fmt::Display
    + bytemuck::Pod
    + sealed::Sealed
    + 'static
{
    /// Runtime type of this component.
    const TYPE: ComponentType;

    /// Widens to `f64`.
    fn to_f64(self) -> f64;

    /// Narrows from `f64` with `as` semantics.
    fn from_f64(v: f64) -> Self;

    /// Converts to `u64` with `as` semantics.
    fn to_u64(self) -> u64;

    /// Converts from `u64` with `as` semantics.
    fn from_u64(v: u64) -> Self;

    /// Returns the slice if `buffer` holds this component type.
    fn from_buffer(buffer: BufferRef<'_>) -> Option<&[Self]>;

    /// Returns the mutable slice if `buffer` holds this component type.
    fn from_buffer_mut(buffer: BufferMut<'_>) -> Option<&mut [Self]>;

    /// Wraps a slice into a type-erased view.
    fn wrap(slice: &[Self]) -> BufferRef<'_>;

    /// Wraps a mutable slice into a type-erased view.
    fn wrap_mut(slice: &mut [Self]) -> BufferMut<'_>;

    /// Converts `src` element-wise into `dst` using `as` semantics.
    ///
    /// Both buffers must have the same length.
    fn convert_into(src: &[Self], dst: BufferMut<'_>);
}

/// Component types usable as label values (unsigned integers).
pub trait LabelComponent: Component + Eq + Ord + std::hash::Hash {}

macro_rules! impl_component {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl Component for $t {
                const TYPE: ComponentType = ComponentType::$variant;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(v: f64) -> Self {
                    v as $t
                }

                #[inline]
                fn to_u64(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn from_u64(v: u64) -> Self {
                    v as $t
                }

                #[inline]
                fn from_buffer(buffer: BufferRef<'_>) -> Option<&[Self]> {
                    match buffer {
                        BufferRef::$variant(s) => Some(s),
                        _ => None,
                    }
                }

                #[inline]
                fn from_buffer_mut(buffer: BufferMut<'_>) -> Option<&mut [Self]> {
                    match buffer {
                        BufferMut::$variant(s) => Some(s),
                        _ => None,
                    }
                }

                #[inline]
                fn wrap(slice: &[Self]) -> BufferRef<'_> {
                    BufferRef::$variant(slice)
                }

                #[inline]
                fn wrap_mut(slice: &mut [Self]) -> BufferMut<'_> {
                    BufferMut::$variant(slice)
                }

                fn convert_into(src: &[Self], dst: BufferMut<'_>) {
                    crate::buffer::convert_buffer!(src, dst);
                }
            }
        )*
    };
}

impl_component! {
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
}

impl LabelComponent for u8 {}
impl LabelComponent for u16 {}
impl LabelComponent for u32 {}
impl LabelComponent for u64 {}
