//! Bagged decision-tree ensemble over multi-hot features.
//!
//! Each tree is grown on a bootstrap sample with Gini impurity, trying a
//! random subset of `sqrt(width)` columns per node, until its leaves are
//! pure or can no longer be split. Class probabilities are the mean of the
//! per-tree leaf frequencies.

use super::encoder::FeatureVector;
use crate::error::AppError;
use crate::roster::HeroId;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestSettings {
    pub trees: usize,
    pub seed: u64,
}

impl Default for ForestSettings {
    fn default() -> Self {
        ForestSettings {
            trees: crate::config::DEFAULT_TREES,
            seed: crate::config::DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    /// Sparse class frequencies, `(class index, probability)`
    Leaf { distribution: Vec<(u32, f64)> },
    Split {
        column: usize,
        absent: usize,
        present: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn leaf_for(&self, features: &FeatureVector) -> &[(u32, f64)] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    column,
                    absent,
                    present,
                } => {
                    idx = if features.is_set(*column) { *present } else { *absent };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

struct TreeBuilder<'a> {
    features: &'a [FeatureVector],
    targets: &'a [usize],
    n_classes: usize,
    width: usize,
    max_features: usize,
    nodes: Vec<Node>,
}

impl<'a> TreeBuilder<'a> {
    fn class_counts(&self, samples: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &s in samples {
            counts[self.targets[s]] += 1;
        }
        counts
    }

    fn leaf(&mut self, samples: &[usize]) -> usize {
        let total = samples.len() as f64;
        let distribution = self
            .class_counts(samples)
            .into_iter()
            .enumerate()
            .filter(|(_, count)| *count > 0)
            .map(|(class, count)| (class as u32, count as f64 / total))
            .collect();
        self.nodes.push(Node::Leaf { distribution });
        self.nodes.len() - 1
    }

    /// Picks the column whose split gives the lowest weighted child impurity,
    /// or `None` when every candidate column is constant over `samples`.
    fn best_split(&self, samples: &[usize], rng: &mut ChaCha8Rng) -> Option<usize> {
        let mut columns: Vec<usize> = (0..self.width).collect();
        columns.shuffle(rng);

        let total = samples.len() as f64;
        let mut best: Option<(usize, f64)> = None;
        let mut visited = 0;

        for column in columns {
            if visited >= self.max_features && best.is_some() {
                break;
            }

            let mut present = vec![0usize; self.n_classes];
            let mut absent = vec![0usize; self.n_classes];
            for &s in samples {
                if self.features[s].is_set(column) {
                    present[self.targets[s]] += 1;
                } else {
                    absent[self.targets[s]] += 1;
                }
            }

            let n_present: usize = present.iter().sum();
            let n_absent = samples.len() - n_present;
            if n_present == 0 || n_absent == 0 {
                continue;
            }
            visited += 1;

            let impurity = (n_present as f64 * gini(&present, n_present)
                + n_absent as f64 * gini(&absent, n_absent))
                / total;

            if best.map_or(true, |(_, b)| impurity < b) {
                best = Some((column, impurity));
            }
        }

        best.map(|(column, _)| column)
    }

    fn grow(&mut self, samples: Vec<usize>, rng: &mut ChaCha8Rng) -> usize {
        let counts = self.class_counts(&samples);
        let distinct = counts.iter().filter(|c| **c > 0).count();
        if samples.len() < 2 || distinct <= 1 {
            return self.leaf(&samples);
        }

        let Some(column) = self.best_split(&samples, rng) else {
            return self.leaf(&samples);
        };

        let (present, absent): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&s| self.features[s].is_set(column));

        // reserve the slot so the split precedes its children
        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf {
            distribution: Vec::new(),
        });
        let absent = self.grow(absent, rng);
        let present = self.grow(present, rng);
        self.nodes[idx] = Node::Split {
            column,
            absent,
            present,
        };
        idx
    }
}

fn gini(counts: &[usize], total: usize) -> f64 {
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    classes: Vec<HeroId>,
    trees: Vec<DecisionTree>,
    settings: ForestSettings,
}

impl RandomForest {
    /// Fits the ensemble. `on_tree` is called with the number of finished
    /// trees after each one is grown.
    pub fn fit<F>(
        features: &[FeatureVector],
        labels: &[HeroId],
        settings: ForestSettings,
        mut on_tree: F,
    ) -> Result<Self, AppError>
    where
        F: FnMut(usize),
    {
        if features.len() != labels.len() {
            return Err(AppError::Validation(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if settings.trees == 0 {
            return Err(AppError::Validation(
                "ensemble needs at least one tree".to_string(),
            ));
        }

        let mut classes = labels.to_vec();
        classes.sort_unstable();
        classes.dedup();

        if features.is_empty() {
            log::warn!("No training examples; the model will not be able to suggest any hero");
            return Ok(RandomForest {
                classes,
                trees: Vec::new(),
                settings,
            });
        }

        let width = features[0].len();
        if let Some(bad) = features.iter().find(|f| f.len() != width) {
            return Err(AppError::Validation(format!(
                "feature rows have mixed widths ({} and {})",
                width,
                bad.len()
            )));
        }

        let targets: Vec<usize> = labels
            .iter()
            .map(|l| classes.binary_search(l).unwrap_or_default())
            .collect();

        let max_features = ((width as f64).sqrt() as usize).max(1);
        let n = features.len();
        let mut seeder = ChaCha8Rng::seed_from_u64(settings.seed);
        let mut trees = Vec::with_capacity(settings.trees);

        for built in 1..=settings.trees {
            let mut rng = ChaCha8Rng::seed_from_u64(seeder.gen());
            let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();

            let mut builder = TreeBuilder {
                features,
                targets: &targets,
                n_classes: classes.len(),
                width,
                max_features,
                nodes: Vec::new(),
            };
            builder.grow(bootstrap, &mut rng);
            trees.push(DecisionTree {
                nodes: builder.nodes,
            });
            on_tree(built);
        }

        log::debug!(
            "Grew {} trees, {} nodes in total",
            trees.len(),
            trees.iter().map(DecisionTree::node_count).sum::<usize>()
        );

        Ok(RandomForest {
            classes,
            trees,
            settings,
        })
    }

    /// Labels the forest can predict, ascending.
    pub fn classes(&self) -> &[HeroId] {
        &self.classes
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn settings(&self) -> ForestSettings {
        self.settings
    }

    /// Probability per entry of [`classes`](Self::classes); sums to 1 unless
    /// the forest is empty.
    pub fn predict_proba(&self, features: &FeatureVector) -> Vec<f64> {
        let mut probabilities = vec![0.0; self.classes.len()];
        if self.trees.is_empty() {
            return probabilities;
        }

        for tree in &self.trees {
            for &(class, p) in tree.leaf_for(features) {
                probabilities[class as usize] += p;
            }
        }

        let n = self.trees.len() as f64;
        probabilities.iter_mut().for_each(|p| *p /= n);
        probabilities
    }
}
