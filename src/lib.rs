//! svg-augment - Geometric and color augmentation of SVG documents
//!
//! This library parses SVG paths, applies stochastic rotation, translation,
//! scaling, coherent noise and color remapping, and repairs generated markup
//! that fails to parse.
//!
//! # Example
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use svg_augment::{SvgTransforms, TransformConfig};
//!
//! let config = TransformConfig::new().with_scale(2.0, 2.0).with_p(1.0);
//! let mut transforms = SvgTransforms::with_noise_seed(config, 7);
//! let mut rng = StdRng::seed_from_u64(1);
//!
//! let svg = transforms.augment_text(r#"<svg><path d="M0 0 L10 0"/></svg>"#, &mut rng);
//! assert_eq!(svg, r#"<svg><path d="M0 0 L20 0"/></svg>"#);
//! ```

pub mod augment;
pub mod convert;
pub mod document;
pub mod error;
pub mod path;
pub mod repair;

pub use augment::{ConfigError, Range, SampledParams, SvgTransforms, TransformConfig};
pub use convert::{
    ConvertError, Converted, Converter, Embedding, GenerationParams, HealthStatus, ModelError,
    VisionToSequenceModel,
};
pub use document::{viewbox_size, Attributes, PathAttributes, PathElement, PathGroup, SvgDocument};
pub use error::{AugmentError, PathDataError, RepairError};
pub use path::{parse_path, Path, Point, Segment};
pub use repair::{
    find_unclosed_tags, is_valid, normalize, path_diagnostics, repair, repair_or_placeholder,
    NormalizeOptions, PathDiagnostic, Repair, RepairStage, PLACEHOLDER_SVG,
};
