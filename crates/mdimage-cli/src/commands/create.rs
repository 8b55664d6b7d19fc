//! Image creation command.

use crate::CreateArgs;
use anyhow::{Context, Result, bail};
use tracing::debug;

/// Builds an image from the arguments and prints its description.
pub fn run(args: CreateArgs, verbose: bool) -> Result<()> {
    let mut image = super::build_image(&args.image)?;

    for entry in &args.meta {
        let Some((key, value)) = entry.split_once('=') else {
            bail!("Metadata entry must be key=value, got '{entry}'");
        };
        image.set_metadata(key.trim(), value.trim())?;
    }

    if let Some(target) = args.cast {
        let source = image.pixel_id()?;
        image = image
            .cast(target)
            .with_context(|| format!("Failed to cast {source} to {target}"))?;
        debug!(from = %source, to = %target, "cast image");
    }

    print!("{image}");
    if verbose {
        println!("  Pixels: {}", image.number_of_pixels()?);
        println!(
            "  Bytes per component: {}",
            image.size_of_pixel_component()?
        );
        if let Ok(bytes) = image.buffer_bytes() {
            println!("  Buffer: {} bytes", bytes.len());
        }
    }
    Ok(())
}
