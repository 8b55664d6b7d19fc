//! Interpolation probe command.
//!
//! Fills the image with a ramp (pixel value = flat pixel offset) so the
//! interpolated result can be checked by hand.

use super::format_values;
use crate::ProbeArgs;
use anyhow::{Context, Result, bail};

/// Evaluates a ramp image at the requested index or physical point.
pub fn run(args: ProbeArgs, verbose: bool) -> Result<()> {
    if args.image.components > 1 {
        bail!("probe builds scalar ramps; --components is not supported here");
    }
    let mut image = super::ramp_image(&args.image.size, args.image.pixel)?;
    super::apply_geometry(&mut image, &args.image)?;

    let (index, point) = match (&args.index, &args.point) {
        (Some(index), _) => {
            let point = image.transform_continuous_index_to_physical_point(index)?;
            (index.clone(), point)
        }
        (None, Some(point)) => {
            let index = image
                .transform_physical_point_to_continuous_index(point)
                .context("Failed to map point to index")?;
            (index, point.clone())
        }
        (None, None) => bail!("either --index or --point is required"),
    };

    let values = match &args.point {
        Some(point) => image.evaluate_at_physical_point(point, args.interp),
        None => image.evaluate_at_continuous_index(&index, args.interp),
    }
    .with_context(|| format!("Failed to evaluate at index {}", format_values(&index)))?;

    println!("Pixel type:  {}", image.pixel_id()?);
    println!("Index:       {}", format_values(&index));
    println!("Point:       {}", format_values(&point));
    println!("Interpolator: {}", args.interp);
    println!("Value:       {}", format_values(&values));

    if verbose {
        let nearest = image.transform_physical_point_to_index(&point)?;
        println!("Nearest index: {nearest:?}");
        let in_range: Option<Vec<u32>> = nearest
            .iter()
            .zip(image.size()?)
            .map(|(&i, &s)| u32::try_from(i).ok().filter(|&i| i < s))
            .collect();
        if let Some(idx) = in_range {
            println!("Nearest value: {}", format_values(&image.pixel_values(&idx)?));
        }
    }
    Ok(())
}
