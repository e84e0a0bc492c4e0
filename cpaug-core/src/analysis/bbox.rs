use serde::Serialize;

/// A 2D axis-aligned bounding box represented by minimum and maximum points.
///
/// Boxes live in image coordinates: the origin is the top-left corner,
/// x grows rightward and y grows downward, so `min` is the top-left
/// corner and `max` the bottom-right one. All geometric operations in
/// this crate work on this corner form; the normalized center form used
/// by annotation files exists only at the I/O boundary.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Bbox {
    /// The minimum point of the bounding box (top-left corner).
    pub min: glam::Vec2,
    /// The maximum point of the bounding box (bottom-right corner).
    pub max: glam::Vec2,
}

/// Selects which overlap predicate drives placement rejection.
///
/// The legacy predicate reproduces the corner comparison that generated
/// existing datasets; it is loose and misses some true overlaps. The
/// strict predicate is a proper axis-aligned rectangle intersection
/// test. Legacy is the default so that re-running the tool over a
/// dataset keeps its historical placement behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverlapPolicy {
    #[default]
    Legacy,
    Strict,
}

impl OverlapPolicy {
    /// Applies the selected predicate to a candidate/existing box pair.
    pub fn overlaps(self, candidate: &Bbox, existing: &Bbox) -> bool {
        match self {
            OverlapPolicy::Legacy => candidate.coincide(existing),
            OverlapPolicy::Strict => candidate.intersects(existing),
        }
    }
}

impl Bbox {
    /// Creates a new bounding box from minimum and maximum points.
    ///
    /// # Example
    /// ```
    /// use glam::Vec2;
    /// use cpaug_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 5.0));
    /// assert_eq!(bbox.width(), 10.0);
    /// ```
    pub fn new(min: glam::Vec2, max: glam::Vec2) -> Self {
        Self { min, max }
    }

    /// Creates a new bounding box from a center point and size vector.
    ///
    /// This is the constructor used for YOLO-style records where boxes
    /// are represented as (center_x, center_y, width, height).
    ///
    /// # Example
    /// ```
    /// use glam::Vec2;
    /// use cpaug_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::from_center_size(Vec2::new(100.0, 200.0), Vec2::new(50.0, 80.0));
    /// assert_eq!(bbox.min, Vec2::new(75.0, 160.0));
    /// assert_eq!(bbox.max, Vec2::new(125.0, 240.0));
    /// ```
    pub fn from_center_size(center: glam::Vec2, size: glam::Vec2) -> Self {
        let half_size = size / 2.0;
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    /// Converts a normalized center-form box into absolute corner form.
    ///
    /// `center` and `size` are fractions of the image dimensions in
    /// `[0, 1]`, as read from a YOLO annotation line. No range
    /// validation is performed: out-of-range normalized values
    /// propagate silently into out-of-range pixel coordinates, which
    /// the cropping layer rejects later with a bounds error.
    ///
    /// # Example
    /// ```
    /// use glam::Vec2;
    /// use cpaug_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::from_normalized(
    ///     Vec2::new(0.25, 0.25),
    ///     Vec2::new(0.25, 0.25),
    ///     Vec2::new(100.0, 100.0),
    /// );
    /// assert_eq!(bbox.min, Vec2::new(12.5, 12.5));
    /// assert_eq!(bbox.max, Vec2::new(37.5, 37.5));
    /// ```
    pub fn from_normalized(center: glam::Vec2, size: glam::Vec2, image_size: glam::Vec2) -> Self {
        Self::from_center_size(center * image_size, size * image_size)
    }

    /// Converts this corner-form box back to normalized center form.
    ///
    /// Returns `(center, size)` as fractions of the image dimensions.
    /// This is the exact inverse of [`Bbox::from_normalized`] up to
    /// floating-point rounding, so a round trip through both
    /// reconstructs the original values within tolerance.
    pub fn to_normalized(&self, image_size: glam::Vec2) -> (glam::Vec2, glam::Vec2) {
        let center = (self.min + self.max) / 2.0 / image_size;
        let size = (self.max - self.min) / image_size;
        (center, size)
    }

    /// Calculates the width of the bounding box.
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Calculates the height of the bounding box.
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Calculates the center point of the bounding box.
    pub fn center(&self) -> glam::Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Calculates the area of the bounding box.
    pub fn area(&self) -> f32 {
        let length = self.max - self.min;

        length.x * length.y
    }

    /// Reports whether all four corner coordinates are exactly zero.
    ///
    /// Source annotations sometimes carry empty placeholder rows; such
    /// a box denormalizes to the zero rectangle and must be skipped
    /// before any cropping happens.
    pub fn is_zero(&self) -> bool {
        self.min == glam::Vec2::ZERO && self.max == glam::Vec2::ZERO
    }

    /// Calculates the area of intersection between this bounding box and another.
    ///
    /// Returns 0.0 when the boxes do not overlap.
    pub fn intersection(&self, other: &Self) -> f32 {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);

        if max.x > min.x && max.y > min.y {
            (max.x - min.x) * (max.y - min.y)
        } else {
            0.
        }
    }

    /// True axis-aligned rectangle intersection test.
    ///
    /// Two boxes intersect when their overlapping region has positive
    /// area; touching edges do not count. This is the predicate behind
    /// [`OverlapPolicy::Strict`].
    ///
    /// # Example
    /// ```
    /// use glam::Vec2;
    /// use cpaug_core::analysis::bbox::Bbox;
    /// let a = Bbox::new(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0));
    /// let b = Bbox::new(Vec2::new(15.0, 15.0), Vec2::new(25.0, 25.0));
    /// assert!(a.intersects(&b));
    /// ```
    pub fn intersects(&self, other: &Self) -> bool {
        self.intersection(other) > 0.0
    }

    /// Legacy overlap predicate behind [`OverlapPolicy::Legacy`].
    ///
    /// Each box is reduced to a single derived corner,
    /// `(min of the two x coordinates, max of the two y coordinates)`,
    /// and the boxes are declared coincident when
    /// `(xa > xb && ya < yb) || (ya > yb && xa < xb)`.
    ///
    /// This is deliberately not a rectangle intersection test: it
    /// compares one corner pair instead of both box extents, so it can
    /// miss true overlaps (e.g. containment along a single axis) and
    /// can flag disjoint boxes as coincident. Placement quality of
    /// previously generated datasets depends on this exact behavior,
    /// so the comparison is reproduced verbatim; use
    /// [`Bbox::intersects`] for the geometrically correct test.
    pub fn coincide(&self, other: &Self) -> bool {
        let xa = self.min.x.min(self.max.x);
        let ya = self.min.y.max(self.max.y);

        let xb = other.min.x.min(other.max.x);
        let yb = other.min.y.max(other.max.y);

        (xa > xb && ya < yb) || (ya > yb && xa < xb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_bbox_area_and_center() {
        let bbox = Bbox::new(Vec2::ZERO, Vec2::new(4.0, 3.0));
        assert_eq!(bbox.area(), 12.0);
        assert_eq!(bbox.center(), Vec2::new(2.0, 1.5));
        assert_eq!(bbox.width(), 4.0);
        assert_eq!(bbox.height(), 3.0);

        // Degenerate line box
        let line = Bbox::new(Vec2::ZERO, Vec2::new(5.0, 0.0));
        assert_eq!(line.area(), 0.0);
    }

    #[test]
    fn test_from_normalized() {
        // 100x100 image, box covering 20% of each axis. Values like
        // 0.3 are not exactly representable, so compare with tolerance.
        let bbox = Bbox::from_normalized(
            Vec2::new(0.3, 0.3),
            Vec2::new(0.2, 0.2),
            Vec2::new(100.0, 100.0),
        );
        assert!((bbox.min - Vec2::new(20.0, 20.0)).abs().max_element() < 1e-3);
        assert!((bbox.max - Vec2::new(40.0, 40.0)).abs().max_element() < 1e-3);

        // Non-square image, exactly representable fractions
        let wide = Bbox::from_normalized(
            Vec2::new(0.5, 0.5),
            Vec2::new(0.5, 0.25),
            Vec2::new(640.0, 480.0),
        );
        assert_eq!(wide.min, Vec2::new(160.0, 180.0));
        assert_eq!(wide.max, Vec2::new(480.0, 300.0));

        // Out-of-range normalized values pass through unvalidated
        let outside = Bbox::from_normalized(
            Vec2::new(1.25, 0.5),
            Vec2::new(0.25, 0.25),
            Vec2::new(100.0, 100.0),
        );
        assert_eq!(outside.min.x, 112.5);
        assert_eq!(outside.max.x, 137.5);
    }

    #[test]
    fn test_normalized_round_trip() {
        let sizes = [
            Vec2::new(100.0, 100.0),
            Vec2::new(640.0, 480.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1920.0, 1080.0),
        ];
        let boxes = [
            (Vec2::new(0.3, 0.3), Vec2::new(0.2, 0.2)),
            (Vec2::new(0.5, 0.5), Vec2::new(1.0, 1.0)),
            (Vec2::new(0.875, 0.125), Vec2::new(0.25, 0.0625)),
            (Vec2::new(0.01, 0.99), Vec2::new(0.02, 0.02)),
        ];

        for image_size in sizes {
            for (center, size) in boxes {
                let bbox = Bbox::from_normalized(center, size, image_size);
                let (rt_center, rt_size) = bbox.to_normalized(image_size);
                assert!((rt_center - center).abs().max_element() < 1e-5);
                assert!((rt_size - size).abs().max_element() < 1e-5);
            }
        }
    }

    #[test]
    fn test_intersects() {
        // Partial overlap
        let a = Bbox::new(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0));
        let b = Bbox::new(Vec2::new(15.0, 15.0), Vec2::new(25.0, 25.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert_eq!(a.intersection(&b), 25.0);

        // Disjoint
        let far = Bbox::new(Vec2::new(100.0, 100.0), Vec2::new(110.0, 110.0));
        assert!(!a.intersects(&far));
        assert_eq!(a.intersection(&far), 0.0);

        // Touching edges do not intersect
        let touching = Bbox::new(Vec2::new(20.0, 10.0), Vec2::new(30.0, 20.0));
        assert!(!a.intersects(&touching));

        // Containment
        let outer = Bbox::new(Vec2::ZERO, Vec2::new(30.0, 30.0));
        assert!(outer.intersects(&a));
        assert!(a.intersects(&outer));
    }

    #[test]
    fn test_coincide_misses_partial_overlap() {
        // A=(10,10)-(20,20), B=(15,15)-(25,25): genuinely overlapping
        // rectangles that the legacy corner comparison misses.
        let a = Bbox::new(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0));
        let b = Bbox::new(Vec2::new(15.0, 15.0), Vec2::new(25.0, 25.0));
        assert!(!a.coincide(&b));
        assert!(!b.coincide(&a));
        assert!(a.intersects(&b)); // the strict test catches it
    }

    #[test]
    fn test_coincide_containment() {
        // A inside B: xa=10 > xb=0 and ya=10 < yb=30 -> flagged
        let inner = Bbox::new(Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0));
        let outer = Bbox::new(Vec2::ZERO, Vec2::new(30.0, 30.0));
        assert!(inner.coincide(&outer));
        // Swapped arguments hit the mirrored branch
        assert!(outer.coincide(&inner));
    }

    #[test]
    fn test_coincide_false_positive_on_disjoint_boxes() {
        // Disjoint boxes that the legacy comparison still flags:
        // xa=100 > xb=0 and ya=10 < yb=30.
        let a = Bbox::new(Vec2::new(100.0, 0.0), Vec2::new(110.0, 10.0));
        let b = Bbox::new(Vec2::ZERO, Vec2::new(30.0, 30.0));
        assert!(a.coincide(&b));
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_coincide_one_axis_containment_false_negative() {
        // B spans A fully along x but sits strictly inside along y.
        // They overlap, yet the derived corners compare as
        // xa=10 > xb=0 with ya=40 < yb=30 false, and ya > yb with
        // xa < xb false.
        let a = Bbox::new(Vec2::new(10.0, 0.0), Vec2::new(20.0, 40.0));
        let b = Bbox::new(Vec2::new(0.0, 10.0), Vec2::new(30.0, 30.0));
        assert!(a.intersects(&b));
        assert!(!a.coincide(&b));
    }

    #[test]
    fn test_overlap_policy_dispatch() {
        let a = Bbox::new(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0));
        let b = Bbox::new(Vec2::new(15.0, 15.0), Vec2::new(25.0, 25.0));

        assert!(!OverlapPolicy::Legacy.overlaps(&a, &b));
        assert!(OverlapPolicy::Strict.overlaps(&a, &b));
        assert_eq!(OverlapPolicy::default(), OverlapPolicy::Legacy);
    }

    #[test]
    fn test_is_zero() {
        assert!(Bbox::new(Vec2::ZERO, Vec2::ZERO).is_zero());
        assert!(!Bbox::new(Vec2::ZERO, Vec2::new(0.0, 1.0)).is_zero());
        assert!(!Bbox::new(Vec2::new(1.0, 0.0), Vec2::ZERO).is_zero());
    }
}
