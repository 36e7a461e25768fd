use crate::roster::{self, HeroId};
use serde::{Deserialize, Serialize};

/// Multi-hot encoding of a hero set: one cell per roster id, 1 when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector(Vec<u8>);

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_set(&self, column: usize) -> bool {
        self.0.get(column).copied().unwrap_or(0) == 1
    }

    pub fn ones(&self) -> usize {
        self.0.iter().filter(|v| **v == 1).count()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

/// Maps hero ids to feature columns. Fitted against the closed roster range
/// rather than the ids that happen to appear in a dataset, so column layout
/// never shifts between training runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiHotEncoder {
    classes: Vec<HeroId>,
}

impl MultiHotEncoder {
    pub fn fit_roster() -> Self {
        MultiHotEncoder {
            classes: roster::all_ids().collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.classes.len()
    }

    pub fn column_of(&self, hero: HeroId) -> Option<usize> {
        self.classes.binary_search(&hero).ok()
    }

    /// Encodes `heroes` as a set. Ids outside the fitted range are ignored
    /// and duplicates collapse.
    pub fn encode(&self, heroes: &[HeroId]) -> FeatureVector {
        let mut cells = vec![0u8; self.width()];
        for hero in heroes {
            match self.column_of(*hero) {
                Some(col) => cells[col] = 1,
                None => log::debug!("Ignoring unknown hero id {} while encoding", hero),
            }
        }
        FeatureVector(cells)
    }

    pub fn encode_all<'a, I>(&self, contexts: I) -> Vec<FeatureVector>
    where
        I: IntoIterator<Item = &'a [HeroId]>,
    {
        contexts.into_iter().map(|c| self.encode(c)).collect()
    }
}
