/// Lower bound of the per-image rescale ratio.
///
/// Each image draws a single scale factor uniformly from
/// [`RESCALE_MIN`, `RESCALE_MAX`) and applies it to every patch pasted
/// into that image. The ratio is never re-sampled per box, so all
/// copies within one image shrink by the same amount.
pub const RESCALE_MIN: f32 = 0.7;

/// Upper bound (exclusive) of the per-image rescale ratio.
///
/// Pasted patches are never enlarged: 1.0 keeps the original extent,
/// and the sampled ratio always stays strictly below it.
pub const RESCALE_MAX: f32 = 1.0;

/// Safety margin, in pixels, kept between a paste candidate and the
/// right/bottom image edges.
///
/// Placement offsets are drawn from
/// `[0, image_extent - box_extent - EDGE_MARGIN]` using the box's
/// pre-rescale extent, so even an unscaled patch can never touch the
/// image border.
pub const EDGE_MARGIN: u32 = 5;

/// Maximum number of placement candidates drawn for a single box.
///
/// The rejection-sampling search re-draws unconditionally on any
/// overlap; without a cap a densely annotated or undersized image
/// would spin forever. Once the budget is spent the box is reported
/// as exhausted and skipped, and processing moves on to the next box.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 100;
