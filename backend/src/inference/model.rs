use std::path::Path;

use ndarray::Array4;
use tract_onnx::prelude::*;

use super::preprocess::INPUT_SIZE;
use super::{Classifier, PredictError};

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Pretrained disease classifier loaded from an ONNX export.
///
/// The artifact is a MobileNetV2 transfer-learning model taking one NHWC
/// 224x224x3 float image and returning softmax scores in catalog order.
/// Parsing and optimization happen once at startup; the resulting plan is
/// immutable and shared across requests.
pub struct OnnxClassifier {
    model: TractModel,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> TractResult<Self> {
        let size = INPUT_SIZE as usize;
        let model = tract_onnx::onnx()
            .model_for_path(path)?
            .with_input_fact(0, f32::fact([1, size, size, 3]).into())?
            .into_optimized()?
            .into_runnable()?;
        Ok(Self { model })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, input: &Array4<f32>) -> Result<Vec<f32>, PredictError> {
        let data: Vec<f32> = input.iter().copied().collect();
        let tensor = Tensor::from_shape(input.shape(), &data)
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        let outputs = self
            .model
            .run(tvec!(tensor.into()))
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        let scores = outputs
            .first()
            .ok_or_else(|| PredictError::Inference("classifier produced no output".to_string()))?
            .to_array_view::<f32>()
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        Ok(scores.iter().copied().collect())
    }
}
