use std::io::Cursor;
use std::sync::Arc;

use tract_onnx::prelude::*;

use crate::error::{ArtifactError, RankError};
use crate::models::FeatureVector;

/// Ranking model capability
///
/// Maps one feature vector to the model's positive-class probability. The
/// model is trained elsewhere; this crate only evaluates it.
#[cfg_attr(test, mockall::automock)]
pub trait Scorer: Send + Sync {
    fn score_one(&self, features: &FeatureVector) -> Result<f64, RankError>;
}

type RankPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Binary classifier exported to ONNX
///
/// The graph takes one `[1, FeatureVector::LEN]` f32 row in `as_array` order.
/// Classifier exports emit a label tensor next to a `[1, 2]` probability
/// tensor; the positive class is column 1. A graph with a single float output
/// is read as the probability itself.
#[derive(Clone)]
pub struct OnnxModel {
    plan: Arc<RankPlan>,
}

impl OnnxModel {
    /// Parses, optimizes and smoke-tests a serialized model
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let plan = tract_onnx::onnx()
            .model_for_read(&mut Cursor::new(bytes))
            .and_then(|model| {
                model.with_input_fact(0, f32::fact([1, FeatureVector::LEN]).into())
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| ArtifactError::InvalidModel(format!("{:#}", e)))?;

        let model = Self {
            plan: Arc::new(plan),
        };

        // A model that loads but cannot score fails here, not on the first request
        model
            .score_one(&FeatureVector::default())
            .map_err(|e| ArtifactError::InvalidModel(e.to_string()))?;

        Ok(model)
    }
}

impl Scorer for OnnxModel {
    fn score_one(&self, features: &FeatureVector) -> Result<f64, RankError> {
        let row: Vec<f32> = features.as_array().iter().map(|&value| value as f32).collect();
        let input = Tensor::from_shape(&[1, FeatureVector::LEN], &row)
            .map_err(|e| RankError::Model(format!("input tensor: {}", e)))?;

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| RankError::Model(format!("inference failed: {}", e)))?;

        // Integer label outputs fail the f32 view and are skipped
        outputs
            .iter()
            .filter_map(|output| output.to_array_view::<f32>().ok())
            .find_map(|view| match view.len() {
                1 => view.iter().next().copied(),
                2 => view.iter().nth(1).copied(),
                _ => None,
            })
            .map(f64::from)
            .ok_or_else(|| RankError::Model("model has no probability output".to_string()))
    }
}
