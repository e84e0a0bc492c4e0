//! Rejection-sampling search for a non-overlapping paste location.
//!
//! A candidate offset is drawn uniformly inside the margin-adjusted
//! image extent and tested against every box of the source location
//! map; any overlap rejects the candidate and draws a fresh one. The
//! search is bounded: once the attempt budget is spent the box is
//! reported as exhausted instead of looping forever on geometry that
//! has no valid answer.

use glam::Vec2;
use rand::Rng;

use crate::analysis::bbox::{Bbox, OverlapPolicy};
use crate::annotation::LabeledBox;
use crate::consts::{EDGE_MARGIN, MAX_PLACEMENT_ATTEMPTS};
use crate::error::*;

/// One box queued for pasting.
///
/// `original` is the pre-rescale pixel extent of the source box; the
/// sampling window is derived from it. `scaled` is the extent of the
/// rescaled patch that will actually be composited, and is what the
/// candidate box is built from.
#[derive(Clone, Copy, Debug)]
pub struct PasteCandidate {
    /// Position of the box in the source annotation, for error context.
    pub index: usize,
    pub class_id: u32,
    pub original: (u32, u32),
    pub scaled: (u32, u32),
}

/// An accepted placement: the offset to composite at, plus the
/// resulting absolute box for the location map and the output
/// annotation.
#[derive(Clone, Copy, Debug)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub placed: LabeledBox,
}

/// Searches for an offset where the candidate box overlaps nothing in
/// the location map.
///
/// Offsets are drawn from `[0, image_extent - original_extent - margin]`
/// on each axis — note the *original* extent, so the window is
/// conservative for a shrunken patch and an accepted offset always
/// keeps the patch fully inside the image. Candidates are only checked
/// against `location_map`, which holds the source boxes; pastes
/// accepted earlier for the same image are deliberately not consulted.
///
/// Returns a placement-exhausted error when the sampling window is
/// empty or the attempt budget runs out.
pub fn find_placement(
    rng: &mut impl Rng,
    image_size: (u32, u32),
    candidate: PasteCandidate,
    location_map: &[LabeledBox],
    policy: OverlapPolicy,
) -> Result<Placement, CpaugError> {
    let (image_width, image_height) = image_size;
    let (original_width, original_height) = candidate.original;
    let (scaled_width, scaled_height) = candidate.scaled;

    let max_x = image_width as i64 - original_width as i64 - EDGE_MARGIN as i64;
    let max_y = image_height as i64 - original_height as i64 - EDGE_MARGIN as i64;
    if max_x < 0 || max_y < 0 {
        // The box cannot fit anywhere once the edge margin is applied.
        return PlacementExhaustedSnafu {
            index: candidate.index,
            attempts: 0usize,
        }
        .fail();
    }

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let x = rng.gen_range(0..=max_x) as u32;
        let y = rng.gen_range(0..=max_y) as u32;

        let bbox = Bbox::new(
            Vec2::new(x as f32, y as f32),
            Vec2::new((x + scaled_width) as f32, (y + scaled_height) as f32),
        );

        let collides = location_map
            .iter()
            .any(|existing| policy.overlaps(&bbox, &existing.bbox));
        if !collides {
            return Ok(Placement {
                x,
                y,
                placed: LabeledBox {
                    class_id: candidate.class_id,
                    bbox,
                },
            });
        }
    }

    PlacementExhaustedSnafu {
        index: candidate.index,
        attempts: MAX_PLACEMENT_ATTEMPTS,
    }
    .fail()
}
