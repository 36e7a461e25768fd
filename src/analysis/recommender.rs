use super::draft::DraftContext;
use crate::error::AppError;
use crate::model::ProbabilityModel;
use crate::roster::{self, HeroId};
use serde::Serialize;
use std::cmp::Ordering;

pub const DEFAULT_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroSuggestion {
    pub hero_id: HeroId,
    pub hero_name: String,
    pub score: f64,
}

impl HeroSuggestion {
    pub fn new(hero_id: HeroId, score: f64) -> Self {
        HeroSuggestion {
            hero_id,
            hero_name: roster::id_to_name(hero_id),
            score,
        }
    }
}

/// Fewer suggestable heroes than were asked for. Not an error: the
/// available ones are still returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shortfall {
    pub requested: usize,
    pub available: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionReport {
    pub suggestions: Vec<HeroSuggestion>,
    pub shortfall: Option<Shortfall>,
}

impl SuggestionReport {
    pub fn hero_ids(&self) -> Vec<HeroId> {
        self.suggestions.iter().map(|s| s.hero_id).collect()
    }
}

pub struct HeroRecommender;

impl HeroRecommender {
    /// Checks a user-supplied suggestion count.
    pub fn validate_count(requested: i64) -> Result<usize, AppError> {
        if requested < 1 {
            return Err(AppError::Validation(format!(
                "suggestion count must be at least 1, got {}",
                requested
            )));
        }
        usize::try_from(requested)
            .map_err(|_| AppError::Validation(format!("suggestion count {} is too large", requested)))
    }

    /// Scores candidate `hero` by folding it into the team's picks and reading
    /// back the model's probability for that same hero.
    pub fn score_candidate<M: ProbabilityModel>(model: &M, team_pick: &[HeroId], hero: HeroId) -> f64 {
        let mut context = team_pick.to_vec();
        context.push(hero);
        model
            .predict_probabilities(&context)
            .get(&hero)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn suggest<M: ProbabilityModel>(
        model: &M,
        draft: &DraftContext,
        top_n: usize,
    ) -> Result<SuggestionReport, AppError> {
        if top_n == 0 {
            return Err(AppError::Validation(
                "suggestion count must be at least 1".to_string(),
            ));
        }

        let excluded = draft.excluded();
        let candidates: Vec<HeroId> = model
            .class_universe()
            .iter()
            .copied()
            .filter(|hero| !excluded.contains(hero))
            .collect();

        log::debug!(
            "{} candidates after excluding {} drafted heroes from {} known",
            candidates.len(),
            excluded.len(),
            model.class_universe().len()
        );

        let shortfall = if candidates.len() < top_n {
            log::warn!(
                "Only {} heroes available for suggestion (some heroes not in model/classes), {} requested",
                candidates.len(),
                top_n
            );
            Some(Shortfall {
                requested: top_n,
                available: candidates.len(),
            })
        } else {
            None
        };

        let mut suggestions: Vec<HeroSuggestion> = candidates
            .into_iter()
            .map(|hero| HeroSuggestion::new(hero, Self::score_candidate(model, &draft.team_pick, hero)))
            .collect();

        suggestions.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(a.hero_id.cmp(&b.hero_id))
        });
        suggestions.truncate(top_n);

        Ok(SuggestionReport {
            suggestions,
            shortfall,
        })
    }
}
