//! Path geometry: points, segments and their `d` serialization

use std::fmt::Write as _;

/// A point in SVG user space (y axis pointing down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise distance check used for continuity tests
    pub fn approx_eq(&self, other: Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// One drawing primitive of a path, in absolute coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Line {
        start: Point,
        end: Point,
    },
    Cubic {
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
    },
    Quadratic {
        start: Point,
        control: Point,
        end: Point,
    },
    /// Elliptical arc; `radius` holds (rx, ry), `rotation` is the x-axis rotation in degrees
    Arc {
        start: Point,
        radius: Point,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        end: Point,
    },
}

impl Segment {
    pub fn start(&self) -> Point {
        match self {
            Segment::Line { start, .. }
            | Segment::Cubic { start, .. }
            | Segment::Quadratic { start, .. }
            | Segment::Arc { start, .. } => *start,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Segment::Line { end, .. }
            | Segment::Cubic { end, .. }
            | Segment::Quadratic { end, .. }
            | Segment::Arc { end, .. } => *end,
        }
    }

    /// Control points in drawing order. Lines and arcs expose their two endpoints.
    pub fn points(&self) -> Vec<Point> {
        match self {
            Segment::Line { start, end } | Segment::Arc { start, end, .. } => vec![*start, *end],
            Segment::Cubic {
                start,
                control1,
                control2,
                end,
            } => vec![*start, *control1, *control2, *end],
            Segment::Quadratic {
                start,
                control,
                end,
            } => vec![*start, *control, *end],
        }
    }

    /// Rebuild a segment of the same kind from new control points.
    ///
    /// `points` must have the length returned by [`Segment::points`]. Arc radius,
    /// rotation and flags are carried over unchanged.
    pub fn with_points(&self, points: &[Point]) -> Segment {
        match (self, points) {
            (Segment::Line { .. }, [start, end]) => Segment::Line {
                start: *start,
                end: *end,
            },
            (Segment::Cubic { .. }, [start, control1, control2, end]) => Segment::Cubic {
                start: *start,
                control1: *control1,
                control2: *control2,
                end: *end,
            },
            (Segment::Quadratic { .. }, [start, control, end]) => Segment::Quadratic {
                start: *start,
                control: *control,
                end: *end,
            },
            (
                Segment::Arc {
                    radius,
                    rotation,
                    large_arc,
                    sweep,
                    ..
                },
                [start, end],
            ) => Segment::Arc {
                start: *start,
                radius: *radius,
                rotation: *rotation,
                large_arc: *large_arc,
                sweep: *sweep,
                end: *end,
            },
            _ => self.clone(),
        }
    }

    /// Apply a point mapping to every control point
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> Segment {
        let mapped: Vec<Point> = self.points().into_iter().map(f).collect();
        self.with_points(&mapped)
    }
}

/// A parsed path: segments plus the indices after which a subpath was closed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub segments: Vec<Segment>,
    /// Segment indices followed by a `Z` command, ascending
    pub closures: Vec<usize>,
}

impl Path {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            closures: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Map every segment, keeping the closure markers
    pub fn map_segments(&self, f: impl Fn(&Segment) -> Segment) -> Path {
        Path {
            segments: self.segments.iter().map(f).collect(),
            closures: self.closures.clone(),
        }
    }

    /// Convert to an SVG path `d` attribute string with absolute commands
    pub fn to_svg_d(&self) -> String {
        let mut d = String::new();
        let mut current: Option<Point> = None;

        for (i, seg) in self.segments.iter().enumerate() {
            let start = seg.start();
            if current != Some(start) {
                if !d.is_empty() {
                    d.push(' ');
                }
                let _ = write!(d, "M{} {}", fmt_num(start.x), fmt_num(start.y));
            }

            match seg {
                Segment::Line { end, .. } => {
                    let _ = write!(d, " L{} {}", fmt_num(end.x), fmt_num(end.y));
                }
                Segment::Cubic {
                    control1,
                    control2,
                    end,
                    ..
                } => {
                    let _ = write!(
                        d,
                        " C{} {} {} {} {} {}",
                        fmt_num(control1.x),
                        fmt_num(control1.y),
                        fmt_num(control2.x),
                        fmt_num(control2.y),
                        fmt_num(end.x),
                        fmt_num(end.y)
                    );
                }
                Segment::Quadratic { control, end, .. } => {
                    let _ = write!(
                        d,
                        " Q{} {} {} {}",
                        fmt_num(control.x),
                        fmt_num(control.y),
                        fmt_num(end.x),
                        fmt_num(end.y)
                    );
                }
                Segment::Arc {
                    radius,
                    rotation,
                    large_arc,
                    sweep,
                    end,
                    ..
                } => {
                    // A rx ry x-axis-rotation large-arc-flag sweep-flag x y
                    let _ = write!(
                        d,
                        " A{} {} {} {} {} {} {}",
                        fmt_num(radius.x),
                        fmt_num(radius.y),
                        fmt_num(*rotation),
                        u8::from(*large_arc),
                        u8::from(*sweep),
                        fmt_num(end.x),
                        fmt_num(end.y)
                    );
                }
            }

            if self.closures.contains(&i) {
                d.push_str(" Z");
                // After Z the pen returns to the subpath start; force an explicit M next
                current = None;
            } else {
                current = Some(seg.end());
            }
        }

        d
    }
}

/// Format a coordinate with the shortest representation that parses back to
/// the same value. Negative zero is written as `0`.
pub fn fmt_num(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        Segment::Line {
            start: Point::new(x0, y0),
            end: Point::new(x1, y1),
        }
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(10.0), "10");
        assert_eq!(fmt_num(-2.5), "-2.5");
        assert_eq!(fmt_num(1.23456), "1.23456");
        assert_eq!(fmt_num(-0.0), "0");
        assert_eq!(fmt_num(0.0004), "0.0004");
        assert_eq!(fmt_num(1e-7), "0.0000001");
    }

    #[test]
    fn test_contiguous_path_to_d() {
        let path = Path::new(vec![line(0.0, 0.0, 100.0, 0.0), line(100.0, 0.0, 100.0, 100.0)]);
        assert_eq!(path.to_svg_d(), "M0 0 L100 0 L100 100");
    }

    #[test]
    fn test_discontinuity_emits_move() {
        let path = Path::new(vec![line(0.0, 0.0, 10.0, 0.0), line(20.0, 0.0, 30.0, 0.0)]);
        assert_eq!(path.to_svg_d(), "M0 0 L10 0 M20 0 L30 0");
    }

    #[test]
    fn test_closure_marker() {
        let path = Path {
            segments: vec![
                line(0.0, 0.0, 10.0, 0.0),
                line(10.0, 0.0, 10.0, 10.0),
                line(10.0, 10.0, 0.0, 0.0),
            ],
            closures: vec![2],
        };
        assert_eq!(path.to_svg_d(), "M0 0 L10 0 L10 10 L0 0 Z");
    }

    #[test]
    fn test_arc_to_d() {
        let path = Path::new(vec![Segment::Arc {
            start: Point::new(50.0, 150.0),
            radius: Point::new(50.0, 50.0),
            rotation: 0.0,
            large_arc: true,
            sweep: true,
            end: Point::new(150.0, 150.0),
        }]);
        assert_eq!(path.to_svg_d(), "M50 150 A50 50 0 1 1 150 150");
    }

    #[test]
    fn test_with_points_preserves_arc_parameters() {
        let arc = Segment::Arc {
            start: Point::new(0.0, 0.0),
            radius: Point::new(5.0, 3.0),
            rotation: 30.0,
            large_arc: false,
            sweep: true,
            end: Point::new(10.0, 0.0),
        };
        let moved = arc.map_points(|p| p + Point::new(1.0, 1.0));
        match moved {
            Segment::Arc {
                start,
                radius,
                rotation,
                sweep,
                end,
                ..
            } => {
                assert_eq!(start, Point::new(1.0, 1.0));
                assert_eq!(end, Point::new(11.0, 1.0));
                assert_eq!(radius, Point::new(5.0, 3.0));
                assert_eq!(rotation, 30.0);
                assert!(sweep);
            }
            other => panic!("expected arc, got {:?}", other),
        }
    }

    #[test]
    fn test_cubic_points_order() {
        let seg = Segment::Cubic {
            start: Point::new(0.0, 0.0),
            control1: Point::new(1.0, 0.0),
            control2: Point::new(2.0, 0.0),
            end: Point::new(3.0, 0.0),
        };
        let xs: Vec<f64> = seg.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
    }
}
