//! Affine transformations of path geometry.
//!
//! ## Rotation Convention
//!
//! Angles are in degrees and follow the SVG convention: with the y axis
//! pointing down, a positive angle turns clockwise on screen.
//! - 0° = no rotation
//! - 90° = right becomes down
//!
//! Arcs keep their radii under rotation and translation; their x-axis
//! rotation absorbs the rotation angle. Uniform scaling scales arc radii.

use super::geometry::{Path, Point, Segment};

/// A 2D rotation around a center point.
#[derive(Debug, Clone, Copy)]
pub struct RotationTransform {
    /// Rotation angle in degrees (clockwise positive, per SVG convention)
    pub angle_degrees: f64,
    /// Center point of rotation
    pub center: Point,
}

impl RotationTransform {
    pub fn new(angle_degrees: f64, center: Point) -> Self {
        Self {
            angle_degrees,
            center,
        }
    }

    /// Check if this is effectively a no-op (0° rotation).
    pub fn is_identity(&self) -> bool {
        self.angle_degrees.abs() < f64::EPSILON
    }

    /// Rotate a point around the center.
    ///
    /// ```text
    /// x' = cx + (x - cx) * cos(θ) - (y - cy) * sin(θ)
    /// y' = cy + (x - cx) * sin(θ) + (y - cy) * cos(θ)
    /// ```
    pub fn transform_point(&self, point: Point) -> Point {
        if self.is_identity() {
            return point;
        }

        let radians = self.angle_degrees.to_radians();
        let cos_a = radians.cos();
        let sin_a = radians.sin();

        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;

        Point {
            x: self.center.x + dx * cos_a - dy * sin_a,
            y: self.center.y + dx * sin_a + dy * cos_a,
        }
    }

    pub fn transform_segment(&self, segment: &Segment) -> Segment {
        if self.is_identity() {
            return segment.clone();
        }

        let moved = segment.map_points(|p| self.transform_point(p));
        match moved {
            Segment::Arc {
                start,
                radius,
                rotation,
                large_arc,
                sweep,
                end,
            } => Segment::Arc {
                start,
                radius,
                rotation: rotation + self.angle_degrees,
                large_arc,
                sweep,
                end,
            },
            other => other,
        }
    }

    pub fn transform_path(&self, path: &Path) -> Path {
        path.map_segments(|s| self.transform_segment(s))
    }
}

/// Translate every control point of a path by `offset`
pub fn translate_path(path: &Path, offset: Point) -> Path {
    path.map_segments(|s| s.map_points(|p| p + offset))
}

/// Scale a path uniformly about the origin.
pub fn scale_path(path: &Path, factor: f64) -> Path {
    path.map_segments(|s| {
        let scaled = s.map_points(|p| Point::new(p.x * factor, p.y * factor));
        match scaled {
            Segment::Arc {
                start,
                radius,
                rotation,
                large_arc,
                sweep,
                end,
            } => Segment::Arc {
                start,
                radius: Point::new(radius.x * factor.abs(), radius.y * factor.abs()),
                rotation,
                large_arc,
                // A negative factor is a point reflection, which keeps orientation
                sweep,
                end,
            },
            other => other,
        }
    })
}
