use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CpaugError {
    #[snafu(display("Degenerate geometry for box {}: {}", index, reason))]
    Geometry { index: usize, reason: String },
    #[snafu(display(
        "Region {}x{} at ({}, {}) exceeds raster extents {}x{}",
        width,
        height,
        x,
        y,
        raster_width,
        raster_height
    ))]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
        raster_width: u32,
        raster_height: u32,
    },
    #[snafu(display(
        "No non-overlapping placement for box {} after {} attempts",
        index,
        attempts
    ))]
    PlacementExhausted { index: usize, attempts: usize },
    #[snafu(display("Malformed annotation at `{}` line {}: {}", path, line, message))]
    AnnotationParse {
        path: String,
        line: usize,
        message: String,
    },
    #[snafu(display("Image read error for `{}`: {}", path, source))]
    ImageRead {
        source: image::ImageError,
        path: String,
    },
    #[snafu(display("Image write error for `{}`: {}", path, source))]
    ImageWrite {
        source: image::ImageError,
        path: String,
    },
    #[snafu(display("Read `{}` error: {}", path, source))]
    IoRead {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Write `{}` error: {}", path, source))]
    IoWrite {
        source: std::io::Error,
        path: String,
    },
}
