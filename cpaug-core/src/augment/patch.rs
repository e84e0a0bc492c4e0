//! Pixel-level region operations: crop, rescale, composite.
//!
//! Two rasters exist while an image is processed: the pristine source,
//! read only by [`crop`], and the working copy, written only by
//! [`composite`]. Keeping the two apart is what guarantees that pastes
//! never bleed into later crops of the same image.

use image::RgbImage;
use image::imageops::{self, FilterType};
use snafu::ensure;

use crate::error::*;

/// Crops the `width`x`height` region at `(x, y)` out of the raster.
///
/// Fails with an out-of-bounds error when the region exceeds the
/// raster extents; source boxes are expected to lie fully inside the
/// source raster, so a failure here means the annotation was bad.
pub fn crop(raster: &RgbImage, x: u32, y: u32, width: u32, height: u32) -> Result<RgbImage, CpaugError> {
    let (raster_width, raster_height) = raster.dimensions();
    ensure!(
        x.checked_add(width).is_some_and(|right| right <= raster_width)
            && y.checked_add(height).is_some_and(|bottom| bottom <= raster_height),
        OutOfBoundsSnafu {
            x: x as i64,
            y: y as i64,
            width,
            height,
            raster_width,
            raster_height,
        }
    );

    Ok(imageops::crop_imm(raster, x, y, width, height).to_image())
}

/// Resamples the patch to the target integer dimensions.
///
/// Bilinear filtering, matching the interpolation the augmented
/// datasets were originally produced with. The caller is responsible
/// for rejecting zero target dimensions before getting here.
pub fn rescale(patch: &RgbImage, new_width: u32, new_height: u32) -> RgbImage {
    imageops::resize(patch, new_width, new_height, FilterType::Triangle)
}

/// Overwrites the region of `target` at `(x, y)` with the patch pixels.
///
/// A hard overwrite, no blending or alpha. The region must lie fully
/// inside the target raster; accepted placements satisfy this by
/// construction, so a failure here indicates a placement bug rather
/// than bad input.
pub fn composite(target: &mut RgbImage, patch: &RgbImage, x: u32, y: u32) -> Result<(), CpaugError> {
    let (target_width, target_height) = target.dimensions();
    let (patch_width, patch_height) = patch.dimensions();
    ensure!(
        x.checked_add(patch_width).is_some_and(|right| right <= target_width)
            && y.checked_add(patch_height).is_some_and(|bottom| bottom <= target_height),
        OutOfBoundsSnafu {
            x: x as i64,
            y: y as i64,
            width: patch_width,
            height: patch_height,
            raster_width: target_width,
            raster_height: target_height,
        }
    );

    imageops::replace(target, patch, x as i64, y as i64);
    Ok(())
}
