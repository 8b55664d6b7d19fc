//! Physical-space geometry of an image.
//!
//! [`Geometry`] maps pixel indices to physical points:
//!
//! ```text
//! point = origin + direction * (spacing ⊙ index)
//! ```
//!
//! where `direction` is a row-major `D x D` matrix of direction cosines and
//! `⊙` is the element-wise product. The inverse mapping solves the same linear
//! system, so it fails only if the direction matrix is singular.
//!
//! # Usage
//!
//! ```rust
//! use mdimage_core::Geometry;
//!
//! let mut geom = Geometry::identity(2);
//! geom.set_origin(&[10.0, -5.0]).unwrap();
//! geom.set_spacing(&[0.5, 2.0]).unwrap();
//!
//! let p = geom.index_to_physical_point(&[4, 3]).unwrap();
//! assert_eq!(p, vec![12.0, 1.0]);
//! assert_eq!(geom.physical_point_to_index(&p).unwrap(), vec![4, 3]);
//! ```

use crate::error::{Error, Result};

/// Relative pivot threshold below which the direction matrix counts as singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Origin, spacing and direction cosines of an image.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    origin: Vec<f64>,
    spacing: Vec<f64>,
    direction: Vec<f64>,
}

impl Geometry {
    /// Zero origin, unit spacing and identity direction.
    pub fn identity(dimension: u32) -> Self {
        let d = dimension as usize;
        let mut direction = vec![0.0; d * d];
        for i in 0..d {
            direction[i * d + i] = 1.0;
        }
        Self {
            origin: vec![0.0; d],
            spacing: vec![1.0; d],
            direction,
        }
    }

    /// Number of spatial axes.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.origin.len()
    }

    /// Physical position of pixel index zero.
    #[inline]
    pub fn origin(&self) -> &[f64] {
        &self.origin
    }

    /// Physical distance between pixel centers along each axis.
    #[inline]
    pub fn spacing(&self) -> &[f64] {
        &self.spacing
    }

    /// Row-major direction cosine matrix.
    #[inline]
    pub fn direction(&self) -> &[f64] {
        &self.direction
    }

    /// Sets the origin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] unless `origin.len() == dimension`.
    pub fn set_origin(&mut self, origin: &[f64]) -> Result<()> {
        self.check_len("origin", self.dimension(), origin.len())?;
        self.origin.copy_from_slice(origin);
        Ok(())
    }

    /// Sets the spacing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] unless `spacing.len() == dimension`,
    /// and [`Error::InvalidGeometry`] if any entry is not a positive finite number.
    pub fn set_spacing(&mut self, spacing: &[f64]) -> Result<()> {
        self.check_len("spacing", self.dimension(), spacing.len())?;
        if let Some(bad) = spacing.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
            return Err(Error::invalid_geometry(format!(
                "spacing must be positive, got {bad} in {spacing:?}"
            )));
        }
        self.spacing.copy_from_slice(spacing);
        Ok(())
    }

    /// Sets the direction matrix (row-major).
    ///
    /// Only the length is validated; a singular matrix is accepted here and
    /// reported by the physical-to-index transforms.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] unless `direction.len() == dimension²`.
    pub fn set_direction(&mut self, direction: &[f64]) -> Result<()> {
        let d = self.dimension();
        self.check_len("direction", d * d, direction.len())?;
        self.direction.copy_from_slice(direction);
        Ok(())
    }

    /// Maps a continuous index to a physical point.
    pub fn continuous_index_to_physical_point(&self, index: &[f64]) -> Result<Vec<f64>> {
        let d = self.dimension();
        self.check_len("continuous index", d, index.len())?;
        let point = (0..d)
            .map(|i| {
                let row = &self.direction[i * d..(i + 1) * d];
                self.origin[i]
                    + row
                        .iter()
                        .zip(&self.spacing)
                        .zip(index)
                        .map(|((m, s), x)| m * s * x)
                        .sum::<f64>()
            })
            .collect();
        Ok(point)
    }

    /// Maps an integer index to a physical point.
    pub fn index_to_physical_point(&self, index: &[i64]) -> Result<Vec<f64>> {
        let index: Vec<f64> = index.iter().map(|&i| i as f64).collect();
        self.check_len("index", self.dimension(), index.len())?;
        self.continuous_index_to_physical_point(&index)
    }

    /// Maps a physical point to a continuous index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if the direction matrix is singular.
    pub fn physical_point_to_continuous_index(&self, point: &[f64]) -> Result<Vec<f64>> {
        let d = self.dimension();
        self.check_len("point", d, point.len())?;

        let mut matrix: Vec<f64> = (0..d * d)
            .map(|k| self.direction[k] * self.spacing[k % d])
            .collect();
        let mut rhs: Vec<f64> = point.iter().zip(&self.origin).map(|(p, o)| p - o).collect();
        solve_in_place(&mut matrix, &mut rhs, d).ok_or_else(|| {
            Error::invalid_geometry(format!("direction matrix {:?} is singular", self.direction))
        })?;
        Ok(rhs)
    }

    /// Maps a physical point to the nearest integer index.
    ///
    /// Halfway cases round up.
    pub fn physical_point_to_index(&self, point: &[f64]) -> Result<Vec<i64>> {
        let index = self.physical_point_to_continuous_index(point)?;
        Ok(index.iter().map(|&x| (x + 0.5).floor() as i64).collect())
    }

    fn check_len(&self, what: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected != actual {
            return Err(Error::dimension_mismatch(what, expected, actual));
        }
        Ok(())
    }
}

/// Solves `matrix * x = rhs` by Gaussian elimination with partial pivoting.
///
/// `matrix` is row-major `n x n`; the solution replaces `rhs`. Returns `None`
/// for a singular matrix.
fn solve_in_place(matrix: &mut [f64], rhs: &mut [f64], n: usize) -> Option<()> {
    let scale = matrix.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if scale == 0.0 && n > 0 {
        return None;
    }

    for col in 0..n {
        let pivot = (col..n).max_by(|&a, &b| {
            matrix[a * n + col]
                .abs()
                .total_cmp(&matrix[b * n + col].abs())
        })?;
        if matrix[pivot * n + col].abs() <= SINGULAR_EPSILON * scale {
            return None;
        }
        if pivot != col {
            for k in 0..n {
                matrix.swap(pivot * n + k, col * n + k);
            }
            rhs.swap(pivot, col);
        }
        for row in col + 1..n {
            let factor = matrix[row * n + col] / matrix[col * n + col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                matrix[row * n + k] -= factor * matrix[col * n + k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| matrix[row * n + k] * rhs[k]).sum();
        rhs[row] = (rhs[row] - tail) / matrix[row * n + row];
    }
    Some(())
}
