//! Pixel registry listing.

use crate::TypesArgs;
use anyhow::{Result, bail};
use mdimage_core::{MAX_DIMENSION, MIN_DIMENSION, PixelId, PixelRegistry};

/// Prints every registered pixel type with its supported dimensions.
pub fn run(args: TypesArgs, verbose: bool) -> Result<()> {
    let registry = PixelRegistry::global();
    if let Some(dim) = args.dimension {
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&dim) {
            bail!("dimension must be between {MIN_DIMENSION} and {MAX_DIMENSION}, got {dim}");
        }
    }

    println!("{:<4} {:<18} {:<10} Description", "Id", "Name", "Dims");
    for id in PixelId::ALL {
        let dims: Vec<u32> = (MIN_DIMENSION..=MAX_DIMENSION)
            .filter(|&d| registry.is_supported(id, d))
            .collect();
        if args.dimension.is_some_and(|d| !dims.contains(&d)) {
            continue;
        }
        let range = match (dims.first(), dims.last()) {
            (Some(lo), Some(hi)) => format!("{lo}-{hi}"),
            _ => "-".to_string(),
        };
        println!("{:<4} {:<18} {:<10} {}", id.value(), id.name(), range, id.description());
    }

    if verbose {
        println!();
        println!("{} registered combinations", registry.len());
    }
    Ok(())
}
