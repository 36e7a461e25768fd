pub mod models;
pub mod training_set;
