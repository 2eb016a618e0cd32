use std::sync::Arc;

use crate::{
    db::RatingStore,
    error::{AppError, AppResult},
    models::{
        CriticVerdict, Movie, MovieDetails, MovieId, RatingSample, User, UserHistory, UserId,
        UserProfile, ViewerInsight,
    },
    services::{critic, predictor, similarity},
};

/// Runs the recommender over snapshots pulled from a rating store
///
/// Store reads are async; the similarity and prediction math is CPU-only and
/// runs on the blocking pool.
#[derive(Clone)]
pub struct RecommendationService {
    store: Arc<dyn RatingStore>,
    critic_email: String,
}

impl RecommendationService {
    pub fn new(store: Arc<dyn RatingStore>, critic_email: impl Into<String>) -> Self {
        Self {
            store,
            critic_email: critic_email.into(),
        }
    }

    /// Taste similarity between two users
    pub async fn similarity(&self, user_a: UserId, user_b: UserId) -> AppResult<f64> {
        self.require_user(user_a).await?;
        self.require_user(user_b).await?;

        let a = self.store.get_history(user_a).await?;
        let b = self.store.get_history(user_b).await?;

        let score = similarity::similarity(&a, &b);
        tracing::debug!(user_a, user_b, similarity = score, "Computed similarity");
        Ok(score)
    }

    /// How the user is expected to score a movie
    ///
    /// `Ok(None)` means nobody with similar taste rated it.
    pub async fn predict_rating(&self, user_id: UserId, movie_id: MovieId) -> AppResult<Option<f64>> {
        self.require_user(user_id).await?;
        self.require_movie(movie_id).await?;

        let target = self.store.get_history(user_id).await?;
        self.predict_for(target, movie_id).await
    }

    /// The critic persona's reaction to the user's rating of a movie
    ///
    /// `Ok(None)` when the user has not rated the movie.
    pub async fn critic_advise(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> AppResult<Option<CriticVerdict>> {
        self.require_user(user_id).await?;
        self.require_movie(movie_id).await?;

        let history = self.store.get_history(user_id).await?;
        self.advise_for(history.score(movie_id), movie_id).await
    }

    /// Records a user's score for a movie, replacing any earlier score
    pub async fn rate_movie(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        score: i32,
    ) -> AppResult<RatingSample> {
        let sample = RatingSample::new(user_id, movie_id, score)?;
        self.require_user(user_id).await?;
        self.require_movie(movie_id).await?;

        self.store.upsert_rating(sample).await?;
        tracing::info!(user_id, movie_id, score, "Rating stored");
        Ok(sample)
    }

    /// Movie page data, personalized when a viewer is given
    pub async fn movie_details(
        &self,
        movie_id: MovieId,
        viewer: Option<UserId>,
    ) -> AppResult<MovieDetails> {
        let movie = self.require_movie(movie_id).await?;
        let raters = self.store.get_raters_of(movie_id).await?;
        let average_score = self.store.get_average_score(movie_id).await?;

        let viewer = match viewer {
            Some(user_id) => {
                self.require_user(user_id).await?;
                let history = self.store.get_history(user_id).await?;
                let user_score = history.score(movie_id);

                let prediction = match user_score {
                    Some(_) => None,
                    None => self.predict_for(history, movie_id).await?,
                };
                // A missing critic account should not take the movie page down
                let critic = match self.advise_for(user_score, movie_id).await {
                    Ok(verdict) => verdict,
                    Err(AppError::NotFound(what)) => {
                        tracing::warn!(missing = %what, "Critic verdict unavailable");
                        None
                    }
                    Err(e) => return Err(e),
                };

                Some(ViewerInsight {
                    user_score,
                    prediction,
                    critic,
                })
            }
            None => None,
        };

        Ok(MovieDetails {
            movie,
            average_score,
            rating_count: raters.len(),
            viewer,
        })
    }

    /// A user and everything they rated
    pub async fn user_profile(&self, user_id: UserId) -> AppResult<UserProfile> {
        let user = self.require_user(user_id).await?;
        let history = self.store.get_history(user_id).await?;
        Ok(UserProfile {
            user,
            ratings: history.samples(),
        })
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.store.list_users().await
    }

    /// Histories of everyone who rated the movie
    async fn rater_histories(&self, movie_id: MovieId) -> AppResult<Vec<UserHistory>> {
        let user_ids: Vec<UserId> = self
            .store
            .get_raters_of(movie_id)
            .await?
            .into_iter()
            .map(|sample| sample.user_id)
            .collect();

        self.store.get_histories(&user_ids).await
    }

    async fn predict_for(&self, target: UserHistory, movie_id: MovieId) -> AppResult<Option<f64>> {
        let raters = self.rater_histories(movie_id).await?;
        let user_id = target.user_id();

        let prediction = tokio::task::spawn_blocking(move || {
            predictor::predict(&target, movie_id, &raters)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

        tracing::info!(user_id, movie_id, prediction = ?prediction, "Prediction computed");
        Ok(prediction)
    }

    async fn advise_for(
        &self,
        user_score: Option<i32>,
        movie_id: MovieId,
    ) -> AppResult<Option<CriticVerdict>> {
        // Nothing to disagree with, skip loading the critic
        if user_score.is_none() {
            return Ok(None);
        }

        let critic_user = self
            .store
            .find_user_by_email(&self.critic_email)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("critic account {}", self.critic_email))
            })?;

        let critic_history = self.store.get_history(critic_user.user_id).await?;
        // Predictions for the critic only matter when it has not rated the movie
        let raters = match critic_history.score(movie_id) {
            Some(_) => Vec::new(),
            None => self.rater_histories(movie_id).await?,
        };
        let average_score = self
            .store
            .get_average_score(movie_id)
            .await?
            .unwrap_or_else(critic::scale_midpoint);

        let verdict = tokio::task::spawn_blocking(move || {
            critic::advise(user_score, &critic_history, movie_id, &raters, average_score)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(verdict)
    }

    async fn require_user(&self, user_id: UserId) -> AppResult<User> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))
    }

    async fn require_movie(&self, movie_id: MovieId) -> AppResult<Movie> {
        self.store
            .get_movie(movie_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("movie {}", movie_id)))
    }
}
