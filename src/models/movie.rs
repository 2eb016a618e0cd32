use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CriticVerdict, MovieId};

/// A movie that can be rated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub movie_id: MovieId,
    pub title: String,
    pub released_at: Option<NaiveDate>,
    pub imdb_url: Option<String>,
}

impl Movie {
    pub fn new(movie_id: MovieId, title: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
            released_at: None,
            imdb_url: None,
        }
    }
}

/// Movie page data, optionally personalized for a viewing user
#[derive(Debug, Clone, Serialize)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    /// Mean of all current scores, absent while nobody has rated the movie
    pub average_score: Option<f64>,
    pub rating_count: usize,
    /// Present only when a viewer was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer: Option<ViewerInsight>,
}

/// What the viewing user thinks, or is expected to think, of a movie
#[derive(Debug, Clone, Serialize)]
pub struct ViewerInsight {
    pub user_score: Option<i32>,
    /// Only computed when the viewer has not rated the movie yet
    pub prediction: Option<f64>,
    pub critic: Option<CriticVerdict>,
}
