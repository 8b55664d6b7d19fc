//! Pixel interpolation at continuous indices.
//!
//! The valid domain along each axis is `[-0.5, size - 0.5]`, i.e. the region
//! covered by the pixels themselves. Inside that domain neighbours past the
//! last pixel are clamped to the edge, so evaluation at the boundary returns
//! the edge pixel.
//!
//! Every stored value of a pixel is interpolated independently: vector pixels
//! yield one value per component, complex pixels yield real then imaginary part.

use crate::error::{Error, Result};
use crate::repr::ImageBase;
use std::fmt;
use std::str::FromStr;

/// Interpolation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interpolator {
    /// Value of the closest pixel; halfway cases round up.
    NearestNeighbor,
    /// Multilinear interpolation between the `2^D` surrounding pixels.
    #[default]
    Linear,
}

impl fmt::Display for Interpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NearestNeighbor => write!(f, "nearest"),
            Self::Linear => write!(f, "linear"),
        }
    }
}

impl FromStr for Interpolator {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" | "nearestneighbor" | "nn" => Ok(Self::NearestNeighbor),
            "linear" => Ok(Self::Linear),
            _ => Err(format!("unknown interpolator: {s}")),
        }
    }
}

/// Interpolates `image` at a continuous index.
pub(crate) fn evaluate(
    image: &dyn ImageBase,
    index: &[f64],
    interpolator: Interpolator,
) -> Result<Vec<f64>> {
    const OPERATION: &str = "evaluate_at_continuous_index";

    let pixel_id = image.pixel_id();
    if pixel_id.is_label() {
        return Err(Error::unsupported("interpolation", pixel_id));
    }
    let size = image.size();
    if index.len() != size.len() {
        return Err(Error::dimension_mismatch("continuous index", size.len(), index.len()));
    }
    let inside = index
        .iter()
        .zip(size)
        .all(|(&c, &s)| s > 0 && c >= -0.5 && c <= s as f64 - 0.5);
    if !inside {
        return Err(Error::continuous_out_of_bounds(OPERATION, index, size));
    }

    let mut out = Vec::with_capacity(image.values_per_pixel());
    match interpolator {
        Interpolator::NearestNeighbor => {
            let offset = flat_offset(size, |axis| (index[axis] + 0.5).floor() as i64);
            image.read_pixel(offset, &mut out);
        }
        Interpolator::Linear => {
            let base: Vec<f64> = index.iter().map(|c| c.floor()).collect();
            let frac: Vec<f64> = index.iter().zip(&base).map(|(c, b)| c - b).collect();
            out.resize(image.values_per_pixel(), 0.0);
            let mut scratch = Vec::with_capacity(out.len());

            for corner in 0..(1usize << size.len()) {
                let weight: f64 = (0..size.len())
                    .map(|axis| {
                        if corner >> axis & 1 == 1 {
                            frac[axis]
                        } else {
                            1.0 - frac[axis]
                        }
                    })
                    .product();
                if weight == 0.0 {
                    continue;
                }
                let offset = flat_offset(size, |axis| base[axis] as i64 + (corner >> axis & 1) as i64);
                scratch.clear();
                image.read_pixel(offset, &mut scratch);
                for (acc, v) in out.iter_mut().zip(&scratch) {
                    *acc += weight * v;
                }
            }
        }
    }
    Ok(out)
}

/// Flat offset of a per-axis coordinate, clamped into the image.
fn flat_offset(size: &[u32], coord: impl Fn(usize) -> i64) -> usize {
    (0..size.len()).rev().fold(0usize, |acc, axis| {
        let s = size[axis] as i64;
        let c = coord(axis).clamp(0, s - 1) as usize;
        acc * size[axis] as usize + c
    })
}
