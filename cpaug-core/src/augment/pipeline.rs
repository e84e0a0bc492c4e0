//! One-image augmentation pass.
//!
//! Ties the pieces together: denormalize the source boxes into the
//! location map, draw the per-image scale factor, then for every box
//! crop, rescale, search for a placement and composite. The source
//! raster is only ever read; all pastes land on a working clone.

use image::RgbImage;
use rand::Rng;
use snafu::ensure;
use tracing::{debug, warn};

use crate::analysis::bbox::OverlapPolicy;
use crate::annotation::{Annotation, LabeledBox, location_map};
use crate::augment::patch::{composite, crop, rescale};
use crate::augment::placement::{PasteCandidate, find_placement};
use crate::consts::{RESCALE_MAX, RESCALE_MIN};
use crate::error::*;

/// Knobs of a single augmentation pass.
///
/// The rescale bounds and edge margin are fixed constants; the only
/// behavioral choice is which overlap predicate rejects placements.
#[derive(Clone, Copy, Debug, Default)]
pub struct AugmentConfig {
    pub policy: OverlapPolicy,
}

/// Result of augmenting one image.
#[derive(Debug)]
pub struct Augmented {
    /// The working raster with every accepted paste composited in.
    pub image: RgbImage,
    /// Full output annotation content: the input content verbatim,
    /// followed by one line per accepted paste.
    pub annotation: String,
    /// Accepted pastes, in the order the source boxes were processed.
    pub pasted: Vec<LabeledBox>,
    /// Boxes dropped because no valid placement was found in budget.
    pub skipped: usize,
    /// The scale factor sampled for this image.
    pub scale: f32,
}

/// Runs the copy-paste pass over one image.
///
/// `raw_annotation` is the input file content and is copied verbatim
/// to the head of the output annotation; `records` are its parsed
/// lines. Geometry and bounds failures propagate and abort this image;
/// a box that merely cannot be placed is skipped with a warning and
/// counted in [`Augmented::skipped`].
pub fn augment_image(
    source: &RgbImage,
    raw_annotation: &str,
    records: &[Annotation],
    config: &AugmentConfig,
    rng: &mut impl Rng,
) -> Result<Augmented, CpaugError> {
    let (image_width, image_height) = source.dimensions();
    let image_size = glam::Vec2::new(image_width as f32, image_height as f32);

    // Ground truth for overlap checks. Accepted pastes are not added:
    // candidates are only ever rejected against the source boxes.
    let map = location_map(records, image_size);

    let scale = rng.gen_range(RESCALE_MIN..RESCALE_MAX);
    let mut working = source.clone();

    let mut annotation = String::from(raw_annotation);
    let mut separated = raw_annotation.is_empty() || raw_annotation.ends_with('\n');
    let mut pasted = Vec::new();
    let mut skipped = 0usize;

    for (index, record) in records.iter().enumerate() {
        let bbox = record.to_bbox(image_size);
        if bbox.is_zero() {
            debug!("skipping all-zero box {}", index);
            continue;
        }

        // Integer truncation of the corner form, matching how the
        // datasets were originally cut.
        let x = bbox.min.x.trunc() as i64;
        let y = bbox.min.y.trunc() as i64;
        let width = bbox.width().trunc() as i64;
        let height = bbox.height().trunc() as i64;

        ensure!(
            width > 0 && height > 0,
            GeometrySnafu {
                index,
                reason: format!("non-positive extent {}x{} after truncation", width, height),
            }
        );
        ensure!(
            x >= 0 && y >= 0,
            OutOfBoundsSnafu {
                x,
                y,
                width: width as u32,
                height: height as u32,
                raster_width: image_width,
                raster_height: image_height,
            }
        );

        let (width, height) = (width as u32, height as u32);
        let cropped = crop(source, x as u32, y as u32, width, height)?;

        let scaled_width = (width as f32 * scale) as u32;
        let scaled_height = (height as f32 * scale) as u32;
        ensure!(
            scaled_width >= 1 && scaled_height >= 1,
            GeometrySnafu {
                index,
                reason: format!(
                    "rescale by {} truncated {}x{} to zero extent",
                    scale, width, height
                ),
            }
        );

        let patch = rescale(&cropped, scaled_width, scaled_height);

        let candidate = PasteCandidate {
            index,
            class_id: record.class_id,
            original: (width, height),
            scaled: (scaled_width, scaled_height),
        };
        let placement = match find_placement(
            rng,
            (image_width, image_height),
            candidate,
            &map,
            config.policy,
        ) {
            Ok(placement) => placement,
            Err(err @ CpaugError::PlacementExhausted { .. }) => {
                warn!("{}", err);
                skipped += 1;
                continue;
            }
            Err(err) => return Err(err),
        };

        composite(&mut working, &patch, placement.x, placement.y)?;

        if !separated {
            annotation.push('\n');
            separated = true;
        }
        let line = Annotation::from_bbox(record.class_id, &placement.placed.bbox, image_size);
        annotation.push_str(&line.to_line());
        annotation.push('\n');
        pasted.push(placement.placed);
    }

    Ok(Augmented {
        image: working,
        annotation,
        pasted,
        skipped,
        scale,
    })
}
