//! YOLO annotation records and their text representation.
//!
//! Annotation files carry one box per line in normalized center form:
//! `class_id x_center y_center width height`, with the four floats in
//! `[0, 1]` relative to the image dimensions. This module parses and
//! formats those lines and seeds the location map of absolute boxes
//! that placement is checked against.

use std::fs;
use std::path::Path;

use serde::Serialize;
use snafu::ResultExt;

use crate::analysis::bbox::Bbox;
use crate::error::*;

/// A normalized center-form bounding box as read from an annotation file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Annotation {
    pub class_id: u32,
    pub x_center: f32,
    pub y_center: f32,
    pub width: f32,
    pub height: f32,
}

/// An absolute corner-form box paired with its class.
///
/// The working representation for overlap checks and compositing; the
/// location map is an ordered sequence of these.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct LabeledBox {
    pub class_id: u32,
    pub bbox: Bbox,
}

impl Annotation {
    /// Parses one `class cx cy w h` line.
    ///
    /// `path` and `line` only feed the error context; the caller keeps
    /// iterating the file.
    pub fn parse_line(text: &str, path: &str, line: usize) -> Result<Self, CpaugError> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() != 5 {
            return AnnotationParseSnafu {
                path,
                line,
                message: format!("expected 5 fields, got {}", fields.len()),
            }
            .fail();
        }

        let class_id = fields[0].parse::<u32>().map_err(|err| {
            AnnotationParseSnafu {
                path,
                line,
                message: format!("bad class id `{}`: {}", fields[0], err),
            }
            .build()
        })?;

        let mut values = [0f32; 4];
        for (slot, field) in values.iter_mut().zip(&fields[1..]) {
            *slot = field.parse::<f32>().map_err(|err| {
                AnnotationParseSnafu {
                    path,
                    line,
                    message: format!("bad coordinate `{}`: {}", field, err),
                }
                .build()
            })?;
        }

        Ok(Self {
            class_id,
            x_center: values[0],
            y_center: values[1],
            width: values[2],
            height: values[3],
        })
    }

    /// Formats this record back into a `class cx cy w h` line,
    /// without a trailing newline.
    pub fn to_line(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.class_id, self.x_center, self.y_center, self.width, self.height
        )
    }

    /// Denormalizes into an absolute corner-form box for the given
    /// image dimensions.
    pub fn to_bbox(&self, image_size: glam::Vec2) -> Bbox {
        Bbox::from_normalized(
            glam::Vec2::new(self.x_center, self.y_center),
            glam::Vec2::new(self.width, self.height),
            image_size,
        )
    }

    /// Normalizes an absolute corner-form box back into a record.
    pub fn from_bbox(class_id: u32, bbox: &Bbox, image_size: glam::Vec2) -> Self {
        let (center, size) = bbox.to_normalized(image_size);
        Self {
            class_id,
            x_center: center.x,
            y_center: center.y,
            width: size.x,
            height: size.y,
        }
    }

    /// Denormalizes into a [`LabeledBox`], keeping the class attached.
    pub fn to_labeled(&self, image_size: glam::Vec2) -> LabeledBox {
        LabeledBox {
            class_id: self.class_id,
            bbox: self.to_bbox(image_size),
        }
    }
}

/// Reads an annotation file, returning both the raw content and the
/// parsed records.
///
/// The raw content is kept around because the output file must start
/// with a verbatim copy of the input before any pasted lines are
/// appended. Blank lines are ignored when parsing; any malformed line
/// is a typed parse error that aborts this image only.
pub fn read_annotation_file(path: &Path) -> Result<(String, Vec<Annotation>), CpaugError> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).context(IoReadSnafu { path: &display })?;

    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        records.push(Annotation::parse_line(line, &display, idx + 1)?);
    }

    Ok((content, records))
}

/// Seeds the location map: every source record denormalized into
/// absolute corner form, in file order.
pub fn location_map(records: &[Annotation], image_size: glam::Vec2) -> Vec<LabeledBox> {
    records
        .iter()
        .map(|record| record.to_labeled(image_size))
        .collect()
}
