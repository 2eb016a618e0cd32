use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieId, RatingSample, User, UserHistory, UserId},
};

/// Source of rating snapshots for the recommender
///
/// Implementations own the authoritative, mutable copy of the ratings. Every
/// read hands back an owned snapshot, so the recommender never holds on to
/// live store state while it computes.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RatingStore: Send + Sync {
    /// All current ratings of one user
    async fn get_history(&self, user_id: UserId) -> AppResult<UserHistory>;

    /// Histories for several users
    ///
    /// Default implementation loads them one at a time. Stores that can batch
    /// the lookup should override it.
    async fn get_histories(&self, user_ids: &[UserId]) -> AppResult<Vec<UserHistory>> {
        let mut histories = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            histories.push(self.get_history(*user_id).await?);
        }
        Ok(histories)
    }

    /// All current ratings of one movie, from every user
    async fn get_raters_of(&self, movie_id: MovieId) -> AppResult<Vec<RatingSample>>;

    /// Mean score of a movie, `None` if nobody rated it
    async fn get_average_score(&self, movie_id: MovieId) -> AppResult<Option<f64>>;

    /// Inserts a rating or replaces the user's previous score for the movie
    async fn upsert_rating(&self, sample: RatingSample) -> AppResult<()>;

    async fn get_user(&self, user_id: UserId) -> AppResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn list_users(&self) -> AppResult<Vec<User>>;

    async fn get_movie(&self, movie_id: MovieId) -> AppResult<Option<Movie>>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}

/// Builds a history out of rows already persisted by a store
///
/// Rows that fail validation here got past the write path, so they are
/// reported as an internal fault rather than as bad client input.
pub fn stored_history<I>(user_id: UserId, rows: I) -> AppResult<UserHistory>
where
    I: IntoIterator<Item = RatingSample>,
{
    UserHistory::from_samples(user_id, rows).map_err(|e| {
        tracing::error!(user_id, error = %e, "Stored ratings are inconsistent");
        AppError::Internal(format!("stored ratings for user {user_id} are inconsistent"))
    })
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::*;

    #[test]
    fn test_stored_history_accepts_clean_rows() {
        let history = stored_history(1, vec![RatingSample::new(1, 10, 4).unwrap()]).unwrap();
        assert_eq!(history.score(10), Some(4));
    }

    #[test]
    fn test_corrupt_stored_rows_are_internal_errors() {
        let duplicate = vec![
            RatingSample::new(1, 10, 4).unwrap(),
            RatingSample::new(1, 10, 2).unwrap(),
        ];
        let error = stored_history(1, duplicate).unwrap_err();
        assert!(matches!(error, AppError::Internal(_)));
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let out_of_range = RatingSample {
            user_id: 1,
            movie_id: 10,
            score: 7,
        };
        assert!(matches!(
            stored_history(1, vec![out_of_range]),
            Err(AppError::Internal(_))
        ));
    }
}
