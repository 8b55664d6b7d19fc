//! CLI command implementations

pub mod create;
pub mod probe;
pub mod types;

use crate::ImageArgs;
use anyhow::{Context, Result};
use mdimage_core::{Image, PixelId};

/// Builds an image from the shared construction arguments.
pub fn build_image(args: &ImageArgs) -> Result<Image> {
    let mut image = Image::with_components(&args.size, args.pixel, args.components)
        .with_context(|| format!("Failed to create {} image of size {:?}", args.pixel, args.size))?;
    apply_geometry(&mut image, args)?;
    Ok(image)
}

/// Applies origin, spacing and direction overrides.
pub fn apply_geometry(image: &mut Image, args: &ImageArgs) -> Result<()> {
    if let Some(origin) = &args.origin {
        image.set_origin(origin).context("Invalid --origin")?;
    }
    if let Some(spacing) = &args.spacing {
        image.set_spacing(spacing).context("Invalid --spacing")?;
    }
    if let Some(direction) = &args.direction {
        image.set_direction(direction).context("Invalid --direction")?;
    }
    Ok(())
}

/// Image of the given size holding `0, 1, 2, ...` in pixel order, cast to `pixel`.
pub fn ramp_image(size: &[u32], pixel: PixelId) -> Result<Image> {
    let count: u64 = size.iter().map(|&s| s as u64).product();
    let values: Vec<f64> = (0..count).map(|v| v as f64).collect();
    let ramp = Image::from_vec(size, PixelId::Float64, 1, values)
        .with_context(|| format!("Failed to create ramp of size {size:?}"))?;
    ramp.cast(pixel)
        .with_context(|| format!("Failed to convert ramp to {pixel}"))
}

/// Formats a float slice with fixed precision.
pub fn format_values(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:.6}")).collect();
    format!("[{}]", parts.join(", "))
}
