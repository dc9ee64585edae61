//! Stochastic augmentation of SVG documents.
//!
//! One set of transform parameters is sampled per document; each path then
//! runs through rotate → shift → scale → noise → color change, every step
//! gated by an independent draw against `p`.

pub mod config;

use std::fmt;

use noise::{NoiseFn, OpenSimplex};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::document::{PathAttributes, SvgDocument};
use crate::error::AugmentError;
use crate::path::{scale_path, translate_path, Path, Point, RotationTransform};

pub use config::{ConfigError, Range, TransformConfig};

/// Spacing between noise sample positions for consecutive control points
const NOISE_FREQUENCY_STEP: f64 = 20.0;

/// Upper bound (exclusive) for randomly chosen noise seeds
const MAX_NOISE_SEED: u32 = 1_000_000;

/// Parameters drawn once per augmented document
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SampledParams {
    pub rotation_angle: Option<f64>,
    pub shift_re: Option<f64>,
    pub shift_im: Option<f64>,
    pub scale: Option<f64>,
    /// Drawn for parity with the configuration; nothing consumes it
    pub color_noise_std: Option<f64>,
}

/// The augmentation engine.
///
/// Sampled parameters are instance state, so one instance must not serve two
/// documents at the same time; `&mut self` on the entry points enforces this.
pub struct SvgTransforms {
    config: TransformConfig,
    noise: OpenSimplex,
    noise_seed: u32,
    sampled: SampledParams,
}

impl fmt::Debug for SvgTransforms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SvgTransforms")
            .field("config", &self.config)
            .field("noise_seed", &self.noise_seed)
            .field("sampled", &self.sampled)
            .finish()
    }
}

impl SvgTransforms {
    /// Create an engine whose noise generator uses a random seed in `[0, 1_000_000)`
    pub fn new(config: TransformConfig) -> Self {
        let seed = rand::thread_rng().gen_range(0..MAX_NOISE_SEED);
        Self::with_noise_seed(config, seed)
    }

    /// Create an engine with a fixed noise seed
    pub fn with_noise_seed(config: TransformConfig, seed: u32) -> Self {
        Self {
            config,
            noise: OpenSimplex::new(seed),
            noise_seed: seed,
            sampled: SampledParams::default(),
        }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    pub fn noise_seed(&self) -> u32 {
        self.noise_seed
    }

    /// Parameters drawn by the most recent [`SvgTransforms::sample_transformations`]
    pub fn sampled(&self) -> &SampledParams {
        &self.sampled
    }

    /// Draw one value for every configured ranged option
    pub fn sample_transformations<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let c = &self.config;
        self.sampled = SampledParams {
            rotation_angle: c.rotate.map(|r| r.sample(rng)),
            shift_re: c.shift_re.map(|r| r.sample(rng)),
            shift_im: c.shift_im.map(|r| r.sample(rng)),
            scale: c.scale.map(|r| r.sample(rng)),
            color_noise_std: c.color_noise.map(|r| r.sample(rng)),
        };
        debug!(sampled = ?self.sampled, "sampled transformations");
        if self.sampled.color_noise_std.is_some() {
            debug!("color_noise is sampled but not applied");
        }
    }

    /// Augment inline SVG markup.
    ///
    /// Markup without an `<svg>` element, or that is not well-formed XML, is
    /// returned unchanged.
    pub fn augment_text<R: Rng + ?Sized>(&mut self, markup: &str, rng: &mut R) -> String {
        self.augment_markup(markup, false, rng)
    }

    /// Like [`SvgTransforms::augment_text`], with indented output
    pub fn augment_text_pretty<R: Rng + ?Sized>(&mut self, markup: &str, rng: &mut R) -> String {
        self.augment_markup(markup, true, rng)
    }

    fn augment_markup<R: Rng + ?Sized>(&mut self, markup: &str, pretty: bool, rng: &mut R) -> String {
        self.sample_transformations(rng);

        let mut doc = match SvgDocument::parse(markup) {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                debug!("no <svg> element, returning input unchanged");
                return markup.to_string();
            }
            Err(e) => {
                warn!(error = %e, "unparseable markup, returning input unchanged");
                return markup.to_string();
            }
        };

        self.augment_document(&mut doc, rng);
        if pretty {
            doc.to_svg_pretty()
        } else {
            doc.to_svg()
        }
    }

    /// Augment the SVG file at `path`
    pub fn augment_file<R: Rng + ?Sized>(
        &mut self,
        path: &std::path::Path,
        rng: &mut R,
    ) -> Result<String, AugmentError> {
        let markup = std::fs::read_to_string(path)?;
        Ok(self.augment_text(&markup, rng))
    }

    /// Transform every path of an already parsed document with the current sample
    pub fn augment_document<R: Rng + ?Sized>(&self, doc: &mut SvgDocument, rng: &mut R) {
        let (width, height) = doc.viewbox;
        let center = Point::new(width / 2.0, height / 2.0);

        for element in doc.paths_mut() {
            let path = self.rotate(&element.path, center, rng);
            let path = self.shift(&path, rng);
            let path = self.scale(&path, rng);
            let path = match self.config.noise_std {
                Some(range) => {
                    let magnitude = range.sample(rng);
                    self.add_noise(&path, magnitude, rng)
                }
                None => path,
            };
            element.path = path;
            self.change_color(&mut element.attributes, rng);
        }
    }

    /// Independent Bernoulli draw against `p`
    fn fires<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen::<f64>() < self.config.p
    }

    fn rotate<R: Rng + ?Sized>(&self, path: &Path, center: Point, rng: &mut R) -> Path {
        let Some(angle) = self.sampled.rotation_angle else {
            return path.clone();
        };
        if !self.fires(rng) {
            return path.clone();
        }
        RotationTransform::new(angle, center).transform_path(path)
    }

    fn shift<R: Rng + ?Sized>(&self, path: &Path, rng: &mut R) -> Path {
        let (re, im) = (self.sampled.shift_re, self.sampled.shift_im);
        if (re.is_none() && im.is_none()) || !self.fires(rng) {
            return path.clone();
        }
        translate_path(path, Point::new(re.unwrap_or(0.0), im.unwrap_or(0.0)))
    }

    fn scale<R: Rng + ?Sized>(&self, path: &Path, rng: &mut R) -> Path {
        let Some(factor) = self.sampled.scale else {
            return path.clone();
        };
        if !self.fires(rng) {
            return path.clone();
        }
        scale_path(path, factor)
    }

    /// Displace control points with coherent noise.
    ///
    /// Control point `i` of each segment moves by `noise(i·20, 0)` in x and
    /// `noise(0, i·20)` in y, scaled by `magnitude`. Segments are displaced
    /// independently, so shared endpoints may separate.
    pub fn add_noise<R: Rng + ?Sized>(&self, path: &Path, magnitude: f64, rng: &mut R) -> Path {
        if !self.fires(rng) {
            return path.clone();
        }

        path.map_segments(|segment| {
            let noisy: Vec<Point> = segment
                .points()
                .into_iter()
                .enumerate()
                .map(|(i, p)| {
                    let offset = i as f64 * NOISE_FREQUENCY_STEP;
                    Point::new(
                        p.x + self.noise.get([offset, 0.0]) * magnitude,
                        p.y + self.noise.get([0.0, offset]) * magnitude,
                    )
                })
                .collect();
            segment.with_points(&noisy)
        })
    }

    fn change_color<R: Rng + ?Sized>(&self, attributes: &mut PathAttributes, rng: &mut R) {
        if !self.config.color_change || !self.fires(rng) {
            return;
        }
        for key in ["fill", "stroke"] {
            if !attributes.contains(key) {
                continue;
            }
            if let Some(color) = self.config.colors.choose(rng) {
                attributes.set(key, color.as_str());
            }
        }
    }
}
