use crate::models::{
    CriticScoreSource, CriticVerdict, MovieId, UserHistory, MAX_SCORE, MIN_SCORE,
};
use crate::services::predictor::predict;

/// Rebukes indexed by how far apart the critic and the user are, in whole
/// points on the rating scale
pub const REBUKES: [&str; 5] = [
    "Fine. We agree. Do not get used to it.",
    "Close, but your taste still wobbles like a cheap tripod.",
    "I have seen more discernment from a popcorn machine.",
    "Did you watch this movie or just the poster?",
    "Your opinion has been noted, and immediately discarded.",
];

/// Midpoint of the rating scale, 3.0 on a 1-5 scale
pub fn scale_midpoint() -> f64 {
    f64::from(MIN_SCORE + MAX_SCORE) / 2.0
}

/// Contrarian guess used when nothing better is known about the critic
pub fn fallback_score(average_score: f64) -> f64 {
    (average_score - scale_midpoint()).abs()
}

/// Picks the rebuke for the disagreement between two scores
///
/// The rounded distance is clamped to the last message so arbitrarily large
/// (or non-finite) gaps never index past the table.
pub fn rebuke_for(critic_score: f64, user_score: f64) -> &'static str {
    let difference = (critic_score - user_score).abs().round();
    let last = REBUKES.len() - 1;
    let index = if difference.is_finite() {
        (difference as usize).min(last)
    } else {
        last
    };
    REBUKES[index]
}

/// Resolves the critic's score for a movie and how it was obtained
pub fn critic_score(
    critic: &UserHistory,
    movie_id: MovieId,
    critic_raters: &[UserHistory],
    average_score: f64,
) -> (f64, CriticScoreSource) {
    if let Some(score) = critic.score(movie_id) {
        return (f64::from(score), CriticScoreSource::Rated);
    }

    match predict(critic, movie_id, critic_raters) {
        Some(predicted) => (predicted, CriticScoreSource::Predicted),
        None => (fallback_score(average_score), CriticScoreSource::Fallback),
    }
}

/// Compares a user's rating of a movie with the critic persona's
///
/// `None` when the user has not rated the movie, since there is nothing to
/// disagree with. Any user history can act as the critic.
pub fn advise(
    user_score: Option<i32>,
    critic: &UserHistory,
    movie_id: MovieId,
    critic_raters: &[UserHistory],
    average_score: f64,
) -> Option<CriticVerdict> {
    let user_score = user_score?;
    let (critic_score, source) = critic_score(critic, movie_id, critic_raters, average_score);

    tracing::debug!(
        critic_id = critic.user_id(),
        movie_id,
        user_score,
        critic_score,
        source = ?source,
        "Resolved critic score"
    );

    Some(CriticVerdict {
        message: rebuke_for(critic_score, f64::from(user_score)),
        critic_score,
        source,
    })
}
