use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type UserId = i32;
pub type MovieId = i32;

/// Lowest score a user can give a movie
pub const MIN_SCORE: i32 = 1;
/// Highest score a user can give a movie
pub const MAX_SCORE: i32 = 5;

/// Rejected rating data
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("score {score} for movie {movie_id} is outside {}..={}", MIN_SCORE, MAX_SCORE)]
    ScoreOutOfRange { movie_id: MovieId, score: i32 },

    #[error("user {user_id} has more than one rating for movie {movie_id}")]
    DuplicateRating { user_id: UserId, movie_id: MovieId },

    #[error("rating by user {found} cannot be part of the history of user {expected}")]
    ForeignRating { expected: UserId, found: UserId },
}

/// A single user's current score for a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RatingSample {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub score: i32,
}

impl RatingSample {
    /// Creates a rating, rejecting scores outside the rating scale
    pub fn new(user_id: UserId, movie_id: MovieId, score: i32) -> Result<Self, ValidationError> {
        let sample = Self {
            user_id,
            movie_id,
            score,
        };
        sample.validate()?;
        Ok(sample)
    }

    /// Checks the score against the rating scale
    pub fn validate(&self) -> Result<(), ValidationError> {
        if (MIN_SCORE..=MAX_SCORE).contains(&self.score) {
            Ok(())
        } else {
            Err(ValidationError::ScoreOutOfRange {
                movie_id: self.movie_id,
                score: self.score,
            })
        }
    }
}

/// Snapshot of every current rating made by one user, keyed by movie
///
/// Entries are kept ordered by movie id so anything derived from a history
/// (co-rated pairs, float sums) is built in the same order on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserHistory {
    user_id: UserId,
    scores: BTreeMap<MovieId, i32>,
}

impl UserHistory {
    /// An empty history for a user who has rated nothing yet
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            scores: BTreeMap::new(),
        }
    }

    /// Builds a history from store rows
    ///
    /// Fails fast on scores outside the scale, on two rows for the same movie,
    /// and on rows that belong to a different user.
    pub fn from_samples<I>(user_id: UserId, samples: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = RatingSample>,
    {
        let mut scores = BTreeMap::new();

        for sample in samples {
            if sample.user_id != user_id {
                return Err(ValidationError::ForeignRating {
                    expected: user_id,
                    found: sample.user_id,
                });
            }
            sample.validate()?;

            if scores.insert(sample.movie_id, sample.score).is_some() {
                return Err(ValidationError::DuplicateRating {
                    user_id,
                    movie_id: sample.movie_id,
                });
            }
        }

        Ok(Self { user_id, scores })
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// The user's score for a movie, if they rated it
    pub fn score(&self, movie_id: MovieId) -> Option<i32> {
        self.scores.get(&movie_id).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// `(movie_id, score)` pairs in ascending movie id order
    pub fn iter(&self) -> impl Iterator<Item = (MovieId, i32)> + '_ {
        self.scores.iter().map(|(movie_id, score)| (*movie_id, *score))
    }

    /// The history as rating rows, in ascending movie id order
    pub fn samples(&self) -> Vec<RatingSample> {
        self.iter()
            .map(|(movie_id, score)| RatingSample {
                user_id: self.user_id,
                movie_id,
                score,
            })
            .collect()
    }
}
