use crate::error::AppError;
use crate::roster::{self, HeroId};
use std::collections::BTreeSet;

pub const MAX_TEAM_PICK: usize = 4;
pub const MAX_ENEMY_PICK: usize = 5;
pub const MAX_BAN: usize = 5;

/// Picks and bans on both sides at the moment a suggestion is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftContext {
    pub team_pick: Vec<HeroId>,
    pub team_ban: Vec<HeroId>,
    pub enemy_pick: Vec<HeroId>,
    pub enemy_ban: Vec<HeroId>,
}

impl DraftContext {
    pub fn new(
        team_pick: Vec<HeroId>,
        team_ban: Vec<HeroId>,
        enemy_pick: Vec<HeroId>,
        enemy_ban: Vec<HeroId>,
    ) -> Result<Self, AppError> {
        check_group("team pick", &team_pick, 1, MAX_TEAM_PICK)?;
        check_group("team ban", &team_ban, 0, MAX_BAN)?;
        check_group("enemy pick", &enemy_pick, 1, MAX_ENEMY_PICK)?;
        check_group("enemy ban", &enemy_ban, 0, MAX_BAN)?;

        Ok(DraftContext {
            team_pick,
            team_ban,
            enemy_pick,
            enemy_ban,
        })
    }

    /// Every hero already picked or banned by either side.
    pub fn excluded(&self) -> BTreeSet<HeroId> {
        self.team_pick
            .iter()
            .chain(&self.team_ban)
            .chain(&self.enemy_pick)
            .chain(&self.enemy_ban)
            .copied()
            .collect()
    }
}

fn check_group(label: &str, heroes: &[HeroId], min: usize, max: usize) -> Result<(), AppError> {
    if heroes.len() < min || heroes.len() > max {
        return Err(AppError::Validation(format!(
            "{} must list between {} and {} heroes, got {}",
            label,
            min,
            max,
            heroes.len()
        )));
    }

    if let Some(bad) = heroes.iter().find(|id| !roster::is_valid_id(**id)) {
        return Err(AppError::Validation(format!(
            "{} contains hero id {} outside {}..={}",
            label,
            bad,
            roster::MIN_HERO_ID,
            roster::MAX_HERO_ID
        )));
    }

    Ok(())
}
