pub mod encoder;
pub mod forest;

use crate::data::training_set::TrainingExample;
use crate::error::AppError;
use crate::roster::HeroId;
use chrono::{DateTime, Utc};
use encoder::MultiHotEncoder;
use forest::{ForestSettings, RandomForest};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What the draft query engine needs from a trained model.
pub trait ProbabilityModel {
    /// Hero ids the model can predict, ascending.
    fn class_universe(&self) -> &[HeroId];

    /// Probability for every hero in the class universe given a team context.
    fn predict_probabilities(&self, context: &[HeroId]) -> HashMap<HeroId, f64>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub trained_at: DateTime<Utc>,
    pub examples: usize,
}

/// The persisted unit: fitted ensemble plus the encoder it was trained with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    encoder: MultiHotEncoder,
    forest: RandomForest,
    metadata: ModelMetadata,
}

impl TrainedModel {
    pub fn train<F>(
        examples: &[TrainingExample],
        settings: ForestSettings,
        on_tree: F,
    ) -> Result<Self, AppError>
    where
        F: FnMut(usize),
    {
        let encoder = MultiHotEncoder::fit_roster();
        let features = encoder.encode_all(examples.iter().map(|e| e.context.as_slice()));
        let labels: Vec<HeroId> = examples.iter().map(|e| e.label).collect();

        let forest = RandomForest::fit(&features, &labels, settings, on_tree)?;
        log::info!(
            "Trained {} trees on {} examples, {} suggestable heroes",
            forest.tree_count(),
            examples.len(),
            forest.classes().len()
        );

        Ok(TrainedModel {
            encoder,
            forest,
            metadata: ModelMetadata {
                trained_at: Utc::now(),
                examples: examples.len(),
            },
        })
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn settings(&self) -> ForestSettings {
        self.forest.settings()
    }

    pub fn tree_count(&self) -> usize {
        self.forest.tree_count()
    }
}

impl ProbabilityModel for TrainedModel {
    fn class_universe(&self) -> &[HeroId] {
        self.forest.classes()
    }

    fn predict_probabilities(&self, context: &[HeroId]) -> HashMap<HeroId, f64> {
        let features = self.encoder.encode(context);
        self.forest
            .classes()
            .iter()
            .copied()
            .zip(self.forest.predict_proba(&features))
            .collect()
    }
}
