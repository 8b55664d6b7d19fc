//! Explicit pixel type conversion.
//!
//! A cast always allocates a new representation; the pixel type of an existing
//! image never changes. Values are converted with Rust `as` semantics:
//! integer to integer wraps, float to integer truncates toward zero and
//! saturates (NaN becomes 0), and anything to float rounds to nearest.
//!
//! | from \ to | scalar | vector | complex | label |
//! |-----------|--------|--------|---------|-------|
//! | scalar    | yes    | yes    | yes     | yes   |
//! | vector    | 1 comp | yes    | -       | -     |
//! | complex   | -      | -      | yes     | -     |
//! | label     | yes    | -      | -       | yes   |
//!
//! Buffer-to-buffer conversions run in parallel when the `parallel` feature
//! is enabled. Conversions into or out of label maps move integer values as
//! `u64`, so they wrap exactly like the dense integer casts and keep 64-bit
//! labels intact. Float sources and scalar to complex conversions go through
//! `f64`.

use crate::error::{Error, Result};
use crate::pixel::{PixelId, PixelKind};
use crate::registry::PixelRegistry;
use crate::repr::ImageBase;
use tracing::debug;

/// Converts `src` into a new representation of type `target`.
pub(crate) fn cast(src: &dyn ImageBase, target: PixelId) -> Result<Box<dyn ImageBase>> {
    let source = src.pixel_id();
    let entry = PixelRegistry::global().lookup(target, src.dimension())?;
    if source == target {
        return Ok(src.copy());
    }

    let unsupported = || Error::unsupported(format!("cast to {target}"), source);
    let components = src.components_per_pixel();

    use PixelKind as K;
    let dst = match (source.kind(), target.kind()) {
        (K::Scalar | K::Vector, K::Scalar) if components != 1 => return Err(unsupported()),
        (K::Scalar | K::Vector, K::Scalar | K::Vector) | (K::Complex, K::Complex) => {
            let mut dst = entry.allocate(src.size(), entry.components(components)?)?;
            if let (Some(from), Some(to)) = (src.buffer(), dst.buffer_mut()) {
                from.convert_into(to);
            }
            dst
        }
        (K::Scalar, K::Complex) => {
            let mut dst = entry.allocate(src.size(), 1)?;
            for i in 0..src.number_of_pixels() as usize {
                dst.write_component(2 * i, src.read_component(i));
            }
            dst
        }
        (K::Scalar | K::Label, K::Label) | (K::Label, K::Scalar) => {
            let mut dst = entry.allocate(src.size(), 1)?;
            if source.component_type().is_some_and(|c| c.is_float()) {
                copy_floats(src, &mut *dst);
            } else {
                copy_integers(src, &mut *dst);
            }
            dst
        }
        _ => return Err(unsupported()),
    };

    debug_assert_eq!(dst.pixel_id(), target);
    debug!(from = %source, to = %target, size = ?src.size(), "cast");
    Ok(dst)
}

/// Copies scalar float pixels into `dst` through `f64`. Zeros are skipped.
fn copy_floats(src: &dyn ImageBase, dst: &mut dyn ImageBase) {
    for i in 0..src.number_of_pixels() as usize {
        let value = src.read_component(i);
        if value != 0.0 {
            dst.write_component(i, value);
        }
    }
}

/// Copies integer or label pixels into `dst` without going through `f64`.
///
/// Values travel as sign-extended `u64`, so the narrowing on write matches a
/// direct `as` cast between the two component types. Zeros are skipped.
fn copy_integers(src: &dyn ImageBase, dst: &mut dyn ImageBase) {
    let input = src.buffer();
    let value_at = |i: usize| match input {
        Some(buffer) => buffer.get_u64(i),
        None => src.get_label(i).unwrap_or_default(),
    };
    let count = src.number_of_pixels() as usize;

    if dst.buffer().is_some() {
        if let Some(mut out) = dst.buffer_mut() {
            for i in 0..count {
                let value = value_at(i);
                if value != 0 {
                    out.set_u64(i, value);
                }
            }
        }
    } else {
        for i in 0..count {
            let value = value_at(i);
            if value != 0 {
                dst.set_label(i, value);
            }
        }
    }
}
