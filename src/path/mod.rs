//! Vector path geometry: lexing and parsing of `d` data, segment types and
//! affine transforms.

pub mod geometry;
pub mod lexer;
mod parser;
pub mod transform;

pub use geometry::{Path, Point, Segment};
pub use parser::parse_path;
pub use transform::{scale_path, translate_path, RotationTransform};
