pub mod correlation;
pub mod critic;
pub mod predictor;
pub mod recommender;
pub mod similarity;

pub use recommender::RecommendationService;
