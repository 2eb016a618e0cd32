mod movie;
mod rating;
mod user;
mod verdict;

pub use movie::{Movie, MovieDetails, ViewerInsight};
pub use rating::{
    MovieId, RatingSample, UserHistory, UserId, ValidationError, MAX_SCORE, MIN_SCORE,
};
pub use user::{User, UserProfile};
pub use verdict::{CriticScoreSource, CriticVerdict};
