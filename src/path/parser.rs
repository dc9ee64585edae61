//! Parser for SVG path data
//!
//! Resolves relative commands, implicit repetitions and smooth curve
//! reflections into absolute [`Segment`]s.

use super::geometry::{Path, Point, Segment};
use super::lexer::{lex, Token};
use crate::error::{PathDataError, Span};

/// Parse a path `d` attribute into absolute geometry
pub fn parse_path(d: &str) -> Result<Path, PathDataError> {
    let mut tokens = Vec::new();
    for (tok, span) in lex(d) {
        match tok {
            Ok(t) => tokens.push((t, span)),
            Err(()) => {
                let found = d.get(span.clone()).unwrap_or("?");
                let message = if found.parse::<f64>().is_ok() {
                    format!("Number out of range '{}'", found)
                } else {
                    format!("Unexpected character '{}'", found)
                };
                return Err(PathDataError::syntax(span, message, &["command", "number"]));
            }
        }
    }

    PathParser::new(tokens, d.len()).parse()
}

struct PathParser {
    tokens: Vec<(Token, Span)>,
    pos: usize,
    end_of_input: usize,
    segments: Vec<Segment>,
    closures: Vec<usize>,
    current: Point,
    subpath_start: Point,
    /// Index of the first segment of the current subpath
    subpath_first: usize,
    last_cubic_control: Option<Point>,
    last_quadratic_control: Option<Point>,
}

impl PathParser {
    fn new(tokens: Vec<(Token, Span)>, end_of_input: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            end_of_input,
            segments: Vec::new(),
            closures: Vec::new(),
            current: Point::new(0.0, 0.0),
            subpath_start: Point::new(0.0, 0.0),
            subpath_first: 0,
            last_cubic_control: None,
            last_quadratic_control: None,
        }
    }

    fn parse(mut self) -> Result<Path, PathDataError> {
        let mut first = true;

        while let Some((tok, span)) = self.tokens.get(self.pos).cloned() {
            let command = match tok {
                Token::Command(c) => c,
                Token::Number(_) => {
                    let message = if first {
                        "Path data must start with a moveto command"
                    } else {
                        "Unexpected number after closepath"
                    };
                    return Err(PathDataError::syntax(span, message, &["command"]));
                }
            };
            self.pos += 1;

            if first && !matches!(command, 'M' | 'm') {
                return Err(PathDataError::syntax(
                    span,
                    format!("Path data must start with a moveto command, found '{}'", command),
                    &["M", "m"],
                ));
            }
            first = false;

            if matches!(command, 'Z' | 'z') {
                self.close();
                continue;
            }

            let mut command = command;
            loop {
                self.apply(command)?;
                if !self.next_is_number() {
                    break;
                }
                // Extra coordinate pairs after a moveto are implicit linetos
                command = match command {
                    'M' => 'L',
                    'm' => 'l',
                    other => other,
                };
            }
        }

        Ok(Path {
            segments: self.segments,
            closures: self.closures,
        })
    }

    fn next_is_number(&self) -> bool {
        matches!(self.tokens.get(self.pos), Some((Token::Number(_), _)))
    }

    fn number(&mut self) -> Result<f64, PathDataError> {
        match self.tokens.get(self.pos) {
            Some((Token::Number(n), _)) => {
                self.pos += 1;
                Ok(*n)
            }
            Some((Token::Command(c), span)) => Err(PathDataError::syntax(
                span.clone(),
                format!("Expected number, found command '{}'", c),
                &["number"],
            )),
            None => Err(PathDataError::syntax(
                self.end_of_input..self.end_of_input,
                "Expected number, found end of path data",
                &["number"],
            )),
        }
    }

    fn flag(&mut self) -> Result<bool, PathDataError> {
        let span = self
            .tokens
            .get(self.pos)
            .map(|(_, s)| s.clone())
            .unwrap_or(self.end_of_input..self.end_of_input);
        let value = self.number()?;
        if value == 0.0 {
            Ok(false)
        } else if value == 1.0 {
            Ok(true)
        } else {
            Err(PathDataError::syntax(
                span,
                format!("Arc flag must be 0 or 1, found {}", value),
                &["0", "1"],
            ))
        }
    }

    /// Read a coordinate pair, resolving it against the current point when relative
    fn point(&mut self, relative: bool) -> Result<Point, PathDataError> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(if relative {
            self.current + Point::new(x, y)
        } else {
            Point::new(x, y)
        })
    }

    fn push(&mut self, segment: Segment) {
        self.current = segment.end();
        self.segments.push(segment);
    }

    fn apply(&mut self, command: char) -> Result<(), PathDataError> {
        let relative = command.is_ascii_lowercase();
        let mut cubic_control = None;
        let mut quadratic_control = None;

        match command.to_ascii_uppercase() {
            'M' => {
                let p = self.point(relative)?;
                self.current = p;
                self.subpath_start = p;
                self.subpath_first = self.segments.len();
            }
            'L' => {
                let end = self.point(relative)?;
                self.push(Segment::Line {
                    start: self.current,
                    end,
                });
            }
            'H' => {
                let x = self.number()?;
                let x = if relative { self.current.x + x } else { x };
                self.push(Segment::Line {
                    start: self.current,
                    end: Point::new(x, self.current.y),
                });
            }
            'V' => {
                let y = self.number()?;
                let y = if relative { self.current.y + y } else { y };
                self.push(Segment::Line {
                    start: self.current,
                    end: Point::new(self.current.x, y),
                });
            }
            'C' => {
                let control1 = self.point(relative)?;
                let control2 = self.point(relative)?;
                let end = self.point(relative)?;
                cubic_control = Some(control2);
                self.push(Segment::Cubic {
                    start: self.current,
                    control1,
                    control2,
                    end,
                });
            }
            'S' => {
                let control1 = reflect(self.last_cubic_control, self.current);
                let control2 = self.point(relative)?;
                let end = self.point(relative)?;
                cubic_control = Some(control2);
                self.push(Segment::Cubic {
                    start: self.current,
                    control1,
                    control2,
                    end,
                });
            }
            'Q' => {
                let control = self.point(relative)?;
                let end = self.point(relative)?;
                quadratic_control = Some(control);
                self.push(Segment::Quadratic {
                    start: self.current,
                    control,
                    end,
                });
            }
            'T' => {
                let control = reflect(self.last_quadratic_control, self.current);
                let end = self.point(relative)?;
                quadratic_control = Some(control);
                self.push(Segment::Quadratic {
                    start: self.current,
                    control,
                    end,
                });
            }
            'A' => {
                let rx = self.number()?.abs();
                let ry = self.number()?.abs();
                let rotation = self.number()?;
                let large_arc = self.flag()?;
                let sweep = self.flag()?;
                let end = self.point(relative)?;

                if end == self.current {
                    // Zero-length arcs are omitted
                } else if rx == 0.0 || ry == 0.0 {
                    self.push(Segment::Line {
                        start: self.current,
                        end,
                    });
                } else {
                    self.push(Segment::Arc {
                        start: self.current,
                        radius: Point::new(rx, ry),
                        rotation,
                        large_arc,
                        sweep,
                        end,
                    });
                }
            }
            _ => unreachable!("lexer only yields path commands"),
        }

        self.last_cubic_control = cubic_control;
        self.last_quadratic_control = quadratic_control;
        Ok(())
    }

    fn close(&mut self) {
        if self.current != self.subpath_start {
            self.push(Segment::Line {
                start: self.current,
                end: self.subpath_start,
            });
        }
        if self.segments.len() > self.subpath_first {
            let last = self.segments.len() - 1;
            if self.closures.last() != Some(&last) {
                self.closures.push(last);
            }
        }
        self.current = self.subpath_start;
        self.subpath_first = self.segments.len();
        self.last_cubic_control = None;
        self.last_quadratic_control = None;
    }
}

/// Reflect the previous control point through the current point
fn reflect(control: Option<Point>, current: Point) -> Point {
    match control {
        Some(c) => Point::new(2.0 * current.x - c.x, 2.0 * current.y - c.y),
        None => current,
    }
}
