//! Image-to-SVG conversion on top of an external vision-to-sequence model.
//!
//! The model is an opaque capability: it encodes image bytes into an
//! embedding and generates markup from it. [`Converter`] validates the
//! upload, calls the model and repairs whatever markup comes back. Failures
//! carry the status code and JSON body an HTTP front end should answer with.

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::repair::{repair, RepairStage};

/// Media type of successful conversion output
pub const SVG_MEDIA_TYPE: &str = "image/svg+xml";

/// Image embedding produced by a model's encoder
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding(pub Vec<f32>);

/// Decoding parameters passed to [`VisionToSequenceModel::generate`]
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub max_length: usize,
    pub temperature: f64,
    pub length_penalty: f64,
    pub repetition_penalty: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 4000,
            temperature: 1.5,
            length_penalty: -1.0,
            repetition_penalty: 3.1,
        }
    }
}

/// Failure reported by a model implementation
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct ModelError(pub String);

impl ModelError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// An image encoder plus autoregressive decoder that emits SVG text
pub trait VisionToSequenceModel {
    fn encode_image(&self, image: &[u8]) -> Result<Embedding, ModelError>;

    /// Generate markup from an embedding. The text is not guaranteed to be well-formed.
    fn generate(&self, embedding: &Embedding, params: &GenerationParams) -> Result<String, ModelError>;
}

/// JSON body of a failed conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
}

/// Errors from [`Converter::convert`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error("File must be an image (got content type '{content_type}')")]
    InvalidContentType { content_type: String },

    #[error("SVG generation failed: {0}")]
    Generation(#[from] ModelError),
}

impl ConvertError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ConvertError::InvalidContentType { .. } => 400,
            ConvertError::Generation(_) => 500,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            ConvertError::InvalidContentType { .. } => ErrorBody {
                error: "Invalid input".to_string(),
                detail: "File must be an image".to_string(),
            },
            ConvertError::Generation(e) => ErrorBody {
                error: "SVG generation failed".to_string(),
                detail: e.to_string(),
            },
        }
    }
}

/// Successful conversion output
#[derive(Debug, Clone, PartialEq)]
pub struct Converted {
    pub svg: String,
    /// How much repair the generated markup needed
    pub stage: RepairStage,
}

impl Converted {
    pub fn media_type(&self) -> &'static str {
        SVG_MEDIA_TYPE
    }
}

/// Service health report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Chains a model into validation and repair
pub struct Converter<M> {
    model: M,
    params: GenerationParams,
}

impl<M: VisionToSequenceModel> Converter<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            params: GenerationParams::default(),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Convert an uploaded image into repaired SVG markup
    pub fn convert(&self, content_type: &str, image: &[u8]) -> Result<Converted, ConvertError> {
        if !content_type.starts_with("image/") {
            return Err(ConvertError::InvalidContentType {
                content_type: content_type.to_string(),
            });
        }
        info!(content_type, bytes = image.len(), "converting image");

        let generated = self
            .model
            .encode_image(image)
            .and_then(|embedding| self.model.generate(&embedding, &self.params))
            .map_err(|e| {
                error!(error = %e, "model error");
                ConvertError::Generation(e)
            })?;

        let repaired = repair(&generated);
        info!(stage = ?repaired.stage, "generated SVG");
        Ok(Converted {
            svg: repaired.svg,
            stage: repaired.stage,
        })
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
