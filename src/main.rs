mod analysis;
mod config;
mod data;
mod display;
mod error;
mod model;
mod roster;
mod store;

use analysis::draft::DraftContext;
use analysis::recommender::{HeroRecommender, DEFAULT_SUGGESTIONS};
use clap::Parser;
use config::Config;
use data::models::load_rows;
use data::training_set::TrainingSetBuilder;
use display::output::{
    display_draft_board, display_error, display_info, display_roster, display_success,
    display_suggestions, display_training_summary, render_draft_table_markdown,
};
use error::AppError;
use indicatif::ProgressBar;
use model::forest::ForestSettings;
use model::{ProbabilityModel, TrainedModel};
use std::path::{Path, PathBuf};
use store::ModelStore;

#[derive(Parser, Debug)]
#[command(name = "hero_draft")]
#[command(about = "Suggest MLBB heroes for the current draft from historical synergy and counter data", long_about = None)]
struct Args {
    /// Train the model from the historical dataset and save it
    #[arg(long)]
    train: bool,

    /// Comma-separated hero names or IDs picked by your team (min 1, max 4)
    #[arg(long)]
    team_pick: Option<String>,

    /// Comma-separated hero names or IDs banned by your team (max 5)
    #[arg(long, default_value = "")]
    team_ban: String,

    /// Comma-separated hero names or IDs picked by the enemy team (min 1, max 5)
    #[arg(long)]
    enemy_pick: Option<String>,

    /// Comma-separated hero names or IDs banned by the enemy team (max 5)
    #[arg(long, default_value = "")]
    enemy_ban: String,

    /// Number of hero suggestions to output
    #[arg(short, long, default_value_t = DEFAULT_SUGGESTIONS as i64, allow_negative_numbers = true)]
    suggest: i64,

    /// Historical dataset CSV (overrides HERO_DATA_CSV)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Model artifact path (overrides HERO_MODEL_PATH)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Write a markdown reference of the dataset with hero names to PATH
    #[arg(long, value_name = "PATH")]
    draft_table: Option<PathBuf>,

    /// Print every hero name with its ID
    #[arg(long)]
    list_heroes: bool,

    /// Print suggestions as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(args) {
        display_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let mut config = Config::from_env()?;
    if let Some(data) = args.data.clone() {
        config.data_csv = data;
    }
    if let Some(model) = args.model.clone() {
        config.model_path = model;
    }

    if args.list_heroes {
        display_roster();
        return Ok(());
    }

    if let Some(path) = &args.draft_table {
        return write_draft_table(&config, path);
    }

    if args.train {
        return train(&config);
    }

    suggest(&config, &args)
}

fn train(config: &Config) -> Result<(), AppError> {
    display_info(&format!("Loading hero data from {}", config.data_csv.display()));
    let rows = load_rows(&config.data_csv)?;

    let builder = TrainingSetBuilder::new(config.counters_as_synergy);
    if !config.counters_as_synergy {
        display_info("Counter relations excluded from training labels (HERO_COUNTERS_AS_SYNERGY=false)");
    }
    let examples = builder.build(&rows);
    display_success(&format!(
        "Built {} training examples from {} heroes",
        examples.len(),
        rows.len()
    ));

    let settings = ForestSettings {
        trees: config.trees,
        seed: config.seed,
    };
    let pb = ProgressBar::new(settings.trees as u64);
    pb.set_message("Growing trees");
    let model = TrainedModel::train(&examples, settings, |_| pb.inc(1))?;
    pb.finish_with_message("✓ Model trained");

    let store = ModelStore::new(&config.model_path);
    if store.exists() {
        display_info(&format!("Replacing existing model at {}", store.path().display()));
    }
    store.save(&model)?;

    display_training_summary(
        model.metadata().examples,
        model.class_universe().len(),
        model.tree_count(),
        model.settings().seed,
        &store.path().display().to_string(),
    );
    Ok(())
}

fn suggest(config: &Config, args: &Args) -> Result<(), AppError> {
    let (Some(team_pick), Some(enemy_pick)) = (&args.team_pick, &args.enemy_pick) else {
        return Err(AppError::Validation(
            "--team-pick and --enemy-pick are required unless using --train".to_string(),
        ));
    };

    // resolve every token before touching the model
    let draft = DraftContext::new(
        roster::parse_hero_list(team_pick)?,
        roster::parse_hero_list(&args.team_ban)?,
        roster::parse_hero_list(enemy_pick)?,
        roster::parse_hero_list(&args.enemy_ban)?,
    )?;
    let top_n = HeroRecommender::validate_count(args.suggest)?;

    let model = ModelStore::new(&config.model_path).load()?;
    let report = HeroRecommender::suggest(&model, &draft, top_n)?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| {
            AppError::SerializationError(format!("Failed to serialize suggestions: {}", e))
        })?;
        println!("{}", json);
        return Ok(());
    }

    display_draft_board(&draft);
    display_suggestions(&report);
    Ok(())
}

fn write_draft_table(config: &Config, path: &Path) -> Result<(), AppError> {
    let rows = load_rows(&config.data_csv)?;
    let markdown = render_draft_table_markdown(&rows);

    std::fs::write(path, markdown)
        .map_err(|e| AppError::IoError(format!("Failed to write {}: {}", path.display(), e)))?;

    display_success(&format!("Draft table documentation generated at {}", path.display()));
    Ok(())
}
