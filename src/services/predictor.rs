use std::cmp::Ordering;

use crate::models::{MovieId, UserHistory, UserId};
use crate::services::similarity::similarity;

/// A rater whose taste positively matches the target user
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub user_id: UserId,
    pub similarity: f64,
    pub score: i32,
}

/// Raters of `movie_id` with strictly positive similarity to `target`
///
/// The target user is never their own neighbor. Non-positive similarity is
/// dropped rather than clamped so it cannot cancel out positive signal.
/// Sorted by descending similarity, ties broken by user id.
pub fn neighbors(target: &UserHistory, movie_id: MovieId, raters: &[UserHistory]) -> Vec<Neighbor> {
    let mut neighbors: Vec<Neighbor> = raters
        .iter()
        .filter(|rater| rater.user_id() != target.user_id())
        .filter_map(|rater| {
            let score = rater.score(movie_id)?;
            let similarity = similarity(target, rater);
            (similarity > 0.0).then_some(Neighbor {
                user_id: rater.user_id(),
                similarity,
                score,
            })
        })
        .collect();

    neighbors.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
            .then(a.user_id.cmp(&b.user_id))
    });

    neighbors
}

/// Predicts how `target` would score `movie_id`
///
/// Similarity-weighted mean of the neighbors' scores. `None` when no rater of
/// the movie has positive similarity to the target, meaning there is not
/// enough signal to estimate anything.
pub fn predict(target: &UserHistory, movie_id: MovieId, raters: &[UserHistory]) -> Option<f64> {
    let neighbors = neighbors(target, movie_id, raters);
    if neighbors.is_empty() {
        tracing::debug!(
            user_id = target.user_id(),
            movie_id,
            raters = raters.len(),
            "No positively correlated raters"
        );
        return None;
    }

    let (numerator, denominator) = neighbors.iter().fold((0.0, 0.0), |(num, den), n| {
        (num + n.similarity * f64::from(n.score), den + n.similarity)
    });

    let prediction = numerator / denominator;

    tracing::debug!(
        user_id = target.user_id(),
        movie_id,
        neighbors = neighbors.len(),
        closest_user = neighbors[0].user_id,
        closest_similarity = neighbors[0].similarity,
        prediction,
        "Predicted rating"
    );

    Some(prediction)
}
