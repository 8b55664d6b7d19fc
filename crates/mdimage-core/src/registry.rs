//! Pixel representation registry.
//!
//! The registry maps every supported `(PixelId, dimension)` pair to the
//! function that allocates its concrete representation. It is built once on
//! first use and never changes afterwards; construction consults it and fails
//! early for combinations it does not contain, so accessors never see an
//! unsupported representation.
//!
//! # Supported combinations
//!
//! | kind    | components                        | dimensions |
//! |---------|-----------------------------------|------------|
//! | scalar  | 1                                 | 2..=5      |
//! | complex | 1 (real and imaginary interleaved)| 2..=5      |
//! | vector  | any, defaults to the dimension    | 2..=5      |
//! | label   | 1                                 | 2..=4      |
//!
//! # Example
//!
//! ```rust
//! use mdimage_core::{PixelId, PixelRegistry};
//!
//! let registry = PixelRegistry::global();
//! assert!(registry.is_supported(PixelId::VectorFloat32, 5));
//! assert!(!registry.is_supported(PixelId::LabelUInt8, 5));
//!
//! let entry = registry.lookup(PixelId::VectorFloat32, 3).unwrap();
//! assert_eq!(entry.components(0).unwrap(), 3);
//! ```

use crate::error::{Error, Result};
use crate::pixel::{Component, ComponentType, LabelComponent, PixelId, PixelKind};
use crate::repr::{DenseImage, ImageBase, LabelMap};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

/// Smallest supported dimension.
pub const MIN_DIMENSION: u32 = 2;
/// Largest supported dimension for scalar, vector and complex pixels.
pub const MAX_DIMENSION: u32 = 5;
/// Largest supported dimension for label maps.
pub const MAX_LABEL_DIMENSION: u32 = 4;

/// Allocation function stored per registry entry.
pub type AllocateFn = fn(PixelId, &[u32], u32) -> Result<Box<dyn ImageBase>>;

/// One supported `(PixelId, dimension)` combination.
#[derive(Clone, Copy)]
pub struct RegistryEntry {
    /// Pixel type.
    pub pixel_id: PixelId,
    /// Number of spatial axes.
    pub dimension: u32,
    allocate: AllocateFn,
}

impl RegistryEntry {
    /// Resolves a requested component count against the pixel kind.
    ///
    /// Scalar, complex and label pixels accept 0 or 1 and always have one
    /// component. Vector pixels take the requested count, or the dimension
    /// when 0 is given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidComponents`] for a count the kind cannot hold.
    pub fn components(&self, requested: u32) -> Result<u32> {
        match self.pixel_id.kind() {
            PixelKind::Vector if requested == 0 => Ok(self.dimension),
            PixelKind::Vector => Ok(requested),
            _ if requested <= 1 => Ok(1),
            _ => Err(Error::invalid_components(
                self.pixel_id,
                requested,
                "only vector pixel types have more than one component",
            )),
        }
    }

    /// Allocates a zero-initialized representation.
    ///
    /// `size.len()` must equal the entry dimension and `components` must
    /// already be resolved through [`components`](Self::components).
    pub fn allocate(&self, size: &[u32], components: u32) -> Result<Box<dyn ImageBase>> {
        debug_assert_eq!(size.len(), self.dimension as usize);
        (self.allocate)(self.pixel_id, size, components)
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("pixel_id", &self.pixel_id)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

/// Lookup table of every supported pixel representation.
///
/// # Thread Safety
///
/// The global instance is built once behind a [`OnceLock`] and is read-only
/// afterwards, so it can be used from any thread.
pub struct PixelRegistry {
    entries: HashMap<(PixelId, u32), RegistryEntry>,
}

impl PixelRegistry {
    /// Returns the global registry.
    pub fn global() -> &'static PixelRegistry {
        static INSTANCE: OnceLock<PixelRegistry> = OnceLock::new();
        INSTANCE.get_or_init(Self::builtin)
    }

    fn builtin() -> Self {
        let mut entries = HashMap::new();
        for pixel_id in PixelId::ALL {
            let Some(allocate) = allocator_for(pixel_id) else {
                continue;
            };
            for dimension in MIN_DIMENSION..=max_dimension(pixel_id) {
                entries.insert(
                    (pixel_id, dimension),
                    RegistryEntry {
                        pixel_id,
                        dimension,
                        allocate,
                    },
                );
            }
        }
        debug!(entries = entries.len(), "pixel registry built");
        Self { entries }
    }

    /// Entry for a pixel type and dimension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPixelType`] if the pair is not registered.
    pub fn lookup(&self, pixel_id: PixelId, dimension: u32) -> Result<&RegistryEntry> {
        self.entries
            .get(&(pixel_id, dimension))
            .ok_or(Error::UnsupportedPixelType {
                pixel_id,
                dimension,
            })
    }

    /// Whether the pair is registered.
    pub fn is_supported(&self, pixel_id: PixelId, dimension: u32) -> bool {
        self.entries.contains_key(&(pixel_id, dimension))
    }

    /// Every entry, ordered by pixel id value then dimension.
    pub fn entries(&self) -> Vec<&RegistryEntry> {
        let mut all: Vec<_> = self.entries.values().collect();
        all.sort_by_key(|e| (e.pixel_id.value(), e.dimension));
        all
    }

    /// Number of registered combinations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn max_dimension(pixel_id: PixelId) -> u32 {
    if pixel_id.is_label() {
        MAX_LABEL_DIMENSION
    } else {
        MAX_DIMENSION
    }
}

fn allocate_dense<T: Component>(
    pixel_id: PixelId,
    size: &[u32],
    components: u32,
) -> Result<Box<dyn ImageBase>> {
    Ok(Box::new(DenseImage::<T>::allocate(pixel_id, size, components)?))
}

fn allocate_label<T: LabelComponent>(
    pixel_id: PixelId,
    size: &[u32],
    _components: u32,
) -> Result<Box<dyn ImageBase>> {
    Ok(Box::new(LabelMap::<T>::allocate(pixel_id, size)?))
}

/// Selects the allocation strategy for a pixel type.
fn allocator_for(pixel_id: PixelId) -> Option<AllocateFn> {
    use ComponentType as C;
    let component = pixel_id.component_type()?;
    let f: AllocateFn = match (pixel_id.kind(), component) {
        (PixelKind::Label, C::UInt8) => allocate_label::<u8>,
        (PixelKind::Label, C::UInt16) => allocate_label::<u16>,
        (PixelKind::Label, C::UInt32) => allocate_label::<u32>,
        (PixelKind::Label, C::UInt64) => allocate_label::<u64>,
        (PixelKind::Label, _) | (PixelKind::Unknown, _) => return None,
        (_, C::Int8) => allocate_dense::<i8>,
        (_, C::UInt8) => allocate_dense::<u8>,
        (_, C::Int16) => allocate_dense::<i16>,
        (_, C::UInt16) => allocate_dense::<u16>,
        (_, C::Int32) => allocate_dense::<i32>,
        (_, C::UInt32) => allocate_dense::<u32>,
        (_, C::Int64) => allocate_dense::<i64>,
        (_, C::UInt64) => allocate_dense::<u64>,
        (_, C::Float32) => allocate_dense::<f32>,
        (_, C::Float64) => allocate_dense::<f64>,
    };
    Some(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_count() {
        // 22 dense types x 4 dimensions + 4 label types x 3 dimensions
        assert_eq!(PixelRegistry::global().len(), 22 * 4 + 4 * 3);
    }

    #[test]
    fn test_unsupported_pairs() {
        let registry = PixelRegistry::global();
        for (id, dim) in [
            (PixelId::UInt8, 1),
            (PixelId::UInt8, 6),
            (PixelId::LabelUInt64, 5),
            (PixelId::Unknown, 2),
        ] {
            let err = registry.lookup(id, dim).unwrap_err();
            assert!(err.is_configuration_error(), "{id} {dim}");
        }
        assert!(registry.is_supported(PixelId::LabelUInt64, 4));
        assert!(registry.is_supported(PixelId::ComplexFloat32, 5));
    }

    #[test]
    fn test_component_policy() {
        let registry = PixelRegistry::global();
        let scalar = registry.lookup(PixelId::Int16, 3).unwrap();
        assert_eq!(scalar.components(0).unwrap(), 1);
        assert_eq!(scalar.components(1).unwrap(), 1);
        assert!(scalar.components(2).unwrap_err().is_configuration_error());

        let vector = registry.lookup(PixelId::VectorUInt8, 4).unwrap();
        assert_eq!(vector.components(0).unwrap(), 4);
        assert_eq!(vector.components(7).unwrap(), 7);

        let label = registry.lookup(PixelId::LabelUInt8, 2).unwrap();
        assert!(label.components(3).is_err());
    }

    #[test]
    fn test_allocate_matches_tag() {
        let registry = PixelRegistry::global();
        for entry in registry.entries() {
            let size = vec![2; entry.dimension as usize];
            let components = entry.components(0).unwrap();
            let repr = entry.allocate(&size, components).unwrap();
            assert_eq!(repr.pixel_id(), entry.pixel_id);
            assert_eq!(repr.dimension(), entry.dimension);
            assert_eq!(repr.buffer().is_none(), entry.pixel_id.is_label());
            if let Some(buffer) = repr.buffer() {
                assert_eq!(Some(buffer.component_type()), entry.pixel_id.component_type());
            }
        }
    }

    #[test]
    fn test_entries_sorted() {
        let entries = PixelRegistry::global().entries();
        assert_eq!(entries[0].pixel_id, PixelId::UInt8);
        assert_eq!(entries[0].dimension, 2);
        let last = entries[entries.len() - 1];
        assert_eq!((last.pixel_id, last.dimension), (PixelId::LabelUInt64, 4));
    }
}
