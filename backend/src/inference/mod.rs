pub mod model;
pub mod preprocess;
pub mod resolver;

use ndarray::Array4;

/// Failures on the prediction path. None of these are retried; each aborts
/// the request that triggered it.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("could not decode uploaded image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("classifier failure: {0}")]
    Inference(String),
    #[error("unsupported language code {0:?} (expected one of en, hi, te)")]
    UnsupportedLanguage(String),
    #[error("catalog inconsistency: {0}")]
    Configuration(String),
}

impl PredictError {
    /// Whether the failure was caused by the request rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PredictError::Decode(_) | PredictError::UnsupportedLanguage(_)
        )
    }
}

/// Seam to the pretrained classifier: a batched NHWC image tensor in, one
/// softmax score per catalog label out.
pub trait Classifier: Send + Sync {
    fn predict(&self, input: &Array4<f32>) -> Result<Vec<f32>, PredictError>;
}
