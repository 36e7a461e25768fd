pub mod draft;
pub mod recommender;
