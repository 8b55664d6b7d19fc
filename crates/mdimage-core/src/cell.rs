//! Reference-counted ownership of image state.
//!
//! An [`ImageCell`] bundles the concrete representation with its geometry and
//! metadata. [`SharedCell`] wraps it in an [`Arc`]; cloning the handle shares
//! the cell and every mutation goes through [`SharedCell::make_unique`], which
//! deep-copies the cell first if anyone else still holds it.
//!
//! The count is atomic and the copy is published into a fresh `Arc` before the
//! old reference is released, so handles may be cloned, read and dropped from
//! several threads at once. Writers racing on the same handle still need the
//! usual `&mut` exclusivity, which the borrow checker enforces.

use crate::geometry::Geometry;
use crate::metadata::MetaDataDictionary;
use crate::repr::ImageBase;
use std::sync::Arc;
use tracing::debug;

/// Representation, geometry and metadata of one image.
#[derive(Debug)]
pub(crate) struct ImageCell {
    pub(crate) repr: Box<dyn ImageBase>,
    pub(crate) geometry: Geometry,
    pub(crate) metadata: MetaDataDictionary,
}

impl ImageCell {
    /// Cell with identity geometry and no metadata.
    pub(crate) fn new(repr: Box<dyn ImageBase>) -> Self {
        let geometry = Geometry::identity(repr.dimension());
        Self {
            repr,
            geometry,
            metadata: MetaDataDictionary::new(),
        }
    }
}

impl Clone for ImageCell {
    fn clone(&self) -> Self {
        Self {
            repr: self.repr.copy(),
            geometry: self.geometry.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Shared handle to an [`ImageCell`].
#[derive(Debug, Clone)]
pub(crate) struct SharedCell(Arc<ImageCell>);

impl SharedCell {
    pub(crate) fn new(cell: ImageCell) -> Self {
        Self(Arc::new(cell))
    }

    /// Read access. Never copies.
    #[inline]
    pub(crate) fn get(&self) -> &ImageCell {
        &self.0
    }

    /// Whether this handle is the only reference to the cell.
    #[inline]
    pub(crate) fn is_unique(&self) -> bool {
        Arc::strong_count(&self.0) == 1 && Arc::weak_count(&self.0) == 0
    }

    /// Number of handles sharing the cell.
    #[inline]
    pub(crate) fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// Whether both handles point at the same cell.
    #[inline]
    pub(crate) fn ptr_eq(&self, other: &SharedCell) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Exclusive access, deep-copying the cell first if it is shared.
    pub(crate) fn make_unique(&mut self) -> &mut ImageCell {
        if !self.is_unique() {
            debug!(
                pixel_id = %self.0.repr.pixel_id(),
                size = ?self.0.repr.size(),
                refs = Arc::strong_count(&self.0),
                "copy-on-write: detaching shared image"
            );
        }
        Arc::make_mut(&mut self.0)
    }
}
