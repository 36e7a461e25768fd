use crate::error::AppError;
use std::env;
use std::path::PathBuf;

const DEFAULT_DATA_CSV: &str = "data/csv/hero_data.csv";
const DEFAULT_MODEL_FILE: &str = "hero_suggester.bin";
pub const DEFAULT_TREES: usize = 100;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_csv: PathBuf,
    pub model_path: PathBuf,
    pub trees: usize,
    pub seed: u64,
    /// Counter targets are fed as positive labels alongside synergy partners.
    /// Turning this off is a deliberate deviation from the historical model.
    pub counters_as_synergy: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let data_csv = env::var("HERO_DATA_CSV")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_CSV));

        let model_path = env::var("HERO_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_model_path());

        let trees = parse_var("HERO_FOREST_TREES", DEFAULT_TREES)?;
        if trees == 0 {
            return Err(AppError::ConfigError(
                "HERO_FOREST_TREES must be at least 1".to_string(),
            ));
        }

        let seed = parse_var("HERO_FOREST_SEED", DEFAULT_SEED)?;
        let counters_as_synergy = parse_var("HERO_COUNTERS_AS_SYNERGY", true)?;

        Ok(Config {
            data_csv,
            model_path,
            trees,
            seed,
            counters_as_synergy,
        })
    }
}

fn default_model_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".hero_draft")
        .join(DEFAULT_MODEL_FILE)
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            AppError::ConfigError(format!("{} has an invalid value: '{}'", name, raw))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_falls_back_when_unset() {
        let trees: usize = parse_var("HERO_DRAFT_TEST_UNSET_VAR", 7).unwrap();
        assert_eq!(trees, 7);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("HERO_DRAFT_TEST_BAD_BOOL", "maybe");
        let result: Result<bool, _> = parse_var("HERO_DRAFT_TEST_BAD_BOOL", true);
        assert!(matches!(result, Err(AppError::ConfigError(_))));
        env::remove_var("HERO_DRAFT_TEST_BAD_BOOL");
    }

    #[test]
    fn test_default_model_path_file_name() {
        assert!(default_model_path().ends_with(".hero_draft/hero_suggester.bin"));
    }
}
