use super::models::{HeroRow, Relation};
use crate::roster::{self, HeroId};

/// A single supervised example: the heroes already on a team and one hero
/// historically associated with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingExample {
    pub context: Vec<HeroId>,
    pub label: HeroId,
}

#[derive(Debug, Clone, Copy)]
pub struct TrainingSetBuilder {
    counters_as_synergy: bool,
}

impl TrainingSetBuilder {
    pub fn new(counters_as_synergy: bool) -> Self {
        TrainingSetBuilder { counters_as_synergy }
    }

    /// Relations whose heroes become labels for the row's main hero.
    ///
    /// Counter targets are labelled exactly like synergy partners. The two
    /// relations have opposite meaning, but the historical model was trained
    /// this way and rankings depend on it.
    pub fn label_relations(&self) -> Vec<Relation> {
        if self.counters_as_synergy {
            vec![Relation::Best, Relation::Counter]
        } else {
            vec![Relation::Best]
        }
    }

    pub fn build(&self, rows: &[HeroRow]) -> Vec<TrainingExample> {
        let relations = self.label_relations();
        let mut examples = Vec::with_capacity(rows.len() * 10);
        let mut skipped_rows = 0;

        for (idx, row) in rows.iter().enumerate() {
            let Some(main) = row.main_heroid.and_then(to_hero_id) else {
                log::warn!(
                    "Skipping row {}: main_heroid {:?} is missing or outside {}..={}",
                    idx + 1,
                    row.main_heroid,
                    roster::MIN_HERO_ID,
                    roster::MAX_HERO_ID
                );
                skipped_rows += 1;
                continue;
            };

            for &relation in &relations {
                for cell in row.related(relation).iter().flatten() {
                    match to_hero_id(*cell) {
                        Some(label) => examples.push(TrainingExample {
                            context: vec![main],
                            label,
                        }),
                        None => log::warn!(
                            "Dropping {} label {} for hero {}: not a known hero id",
                            relation.column_prefix(),
                            cell,
                            main
                        ),
                    }
                }
            }
        }

        log::info!(
            "Built {} training examples from {} rows ({} skipped)",
            examples.len(),
            rows.len(),
            skipped_rows
        );
        examples
    }
}

impl Default for TrainingSetBuilder {
    fn default() -> Self {
        TrainingSetBuilder::new(true)
    }
}

fn to_hero_id(value: i64) -> Option<HeroId> {
    HeroId::try_from(value).ok().filter(|id| roster::is_valid_id(*id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(main: Option<i64>, best: &[i64], counter: &[i64]) -> HeroRow {
        let mut row = HeroRow {
            main_heroid: main,
            ..HeroRow::default()
        };
        for (slot, id) in best.iter().enumerate() {
            row.best[slot] = Some(*id);
        }
        for (slot, id) in counter.iter().enumerate() {
            row.counter[slot] = Some(*id);
        }
        row
    }

    fn labels(examples: &[TrainingExample]) -> Vec<HeroId> {
        examples.iter().map(|e| e.label).collect()
    }

    #[test]
    fn test_best_then_counter_labels_in_order() {
        let rows = vec![row(Some(1), &[5, 6], &[7])];
        let examples = TrainingSetBuilder::default().build(&rows);
        assert_eq!(labels(&examples), vec![5, 6, 7]);
        assert!(examples.iter().all(|e| e.context == vec![1]));
    }

    #[test]
    fn test_missing_slots_are_skipped_not_padded() {
        let mut r = row(Some(2), &[], &[]);
        r.best = [None, Some(9), None, Some(10), None];
        let examples = TrainingSetBuilder::default().build(&[r]);
        assert_eq!(labels(&examples), vec![9, 10]);
    }

    #[test]
    fn test_worst_and_countered_are_unused() {
        let mut r = row(Some(3), &[], &[]);
        r.worst = [Some(4); 5];
        r.countered = [Some(8); 5];
        assert!(TrainingSetBuilder::default().build(&[r]).is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let rows = vec![row(Some(1), &[5], &[5])];
        let examples = TrainingSetBuilder::default().build(&rows);
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0], examples[1]);
    }

    #[test]
    fn test_row_without_main_hero_is_skipped() {
        let rows = vec![row(None, &[5], &[6]), row(Some(500), &[5], &[]), row(Some(2), &[3], &[])];
        let examples = TrainingSetBuilder::default().build(&rows);
        assert_eq!(examples, vec![TrainingExample { context: vec![2], label: 3 }]);
    }

    #[test]
    fn test_out_of_range_labels_are_dropped() {
        let rows = vec![row(Some(1), &[0, 129, 12], &[-4])];
        let examples = TrainingSetBuilder::default().build(&rows);
        assert_eq!(labels(&examples), vec![12]);
    }

    #[test]
    fn test_synergy_only_mode() {
        let rows = vec![row(Some(1), &[5], &[7, 8])];
        let examples = TrainingSetBuilder::new(false).build(&rows);
        assert_eq!(labels(&examples), vec![5]);
    }

    #[test]
    fn test_empty_input() {
        assert!(TrainingSetBuilder::default().build(&[]).is_empty());
    }
}
