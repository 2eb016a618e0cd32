use serde::Serialize;

/// Where the critic's score for a movie came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CriticScoreSource {
    /// The critic actually rated the movie
    Rated,
    /// Estimated from raters with similar taste to the critic
    Predicted,
    /// No signal at all, derived from the movie's average score
    Fallback,
}

/// The critic's reaction to a user's rating
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticVerdict {
    pub message: &'static str,
    pub critic_score: f64,
    pub source: CriticScoreSource,
}
