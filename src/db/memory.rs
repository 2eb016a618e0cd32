use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    db::{stored_history, RatingStore},
    error::{AppError, AppResult},
    models::{Movie, MovieId, RatingSample, User, UserHistory, UserId},
};

#[derive(Default)]
struct Inner {
    users: BTreeMap<UserId, User>,
    movies: HashMap<MovieId, Movie>,
    /// Keyed by (user, movie) so a second write for the pair replaces the first
    ratings: BTreeMap<(UserId, MovieId), i32>,
}

/// Rating store kept entirely in process memory
///
/// Backing store for tests; the server itself always runs on PostgreSQL.
#[derive(Clone, Default)]
pub struct InMemoryRatingStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, user: User) {
        self.inner.write().await.users.insert(user.user_id, user);
    }

    pub async fn add_movie(&self, movie: Movie) {
        self.inner.write().await.movies.insert(movie.movie_id, movie);
    }
}

#[async_trait::async_trait]
impl RatingStore for InMemoryRatingStore {
    async fn get_history(&self, user_id: UserId) -> AppResult<UserHistory> {
        let inner = self.inner.read().await;
        let samples = inner
            .ratings
            .range((user_id, MovieId::MIN)..=(user_id, MovieId::MAX))
            .map(|(&(user_id, movie_id), &score)| RatingSample {
                user_id,
                movie_id,
                score,
            });

        stored_history(user_id, samples)
    }

    async fn get_raters_of(&self, movie_id: MovieId) -> AppResult<Vec<RatingSample>> {
        let inner = self.inner.read().await;
        Ok(inner
            .ratings
            .iter()
            .filter(|((_, rated), _)| *rated == movie_id)
            .map(|(&(user_id, movie_id), &score)| RatingSample {
                user_id,
                movie_id,
                score,
            })
            .collect())
    }

    async fn get_average_score(&self, movie_id: MovieId) -> AppResult<Option<f64>> {
        let raters = self.get_raters_of(movie_id).await?;
        if raters.is_empty() {
            return Ok(None);
        }
        let total: i64 = raters.iter().map(|r| i64::from(r.score)).sum();
        Ok(Some(total as f64 / raters.len() as f64))
    }

    async fn upsert_rating(&self, sample: RatingSample) -> AppResult<()> {
        sample.validate()?;

        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&sample.user_id) {
            return Err(AppError::NotFound(format!("user {}", sample.user_id)));
        }
        if !inner.movies.contains_key(&sample.movie_id) {
            return Err(AppError::NotFound(format!("movie {}", sample.movie_id)));
        }

        inner
            .ratings
            .insert((sample.user_id, sample.movie_id), sample.score);
        Ok(())
    }

    async fn get_user(&self, user_id: UserId) -> AppResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|user| user.email.as_deref() == Some(email))
            .cloned())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self.inner.read().await.users.values().cloned().collect())
    }

    async fn get_movie(&self, movie_id: MovieId) -> AppResult<Option<Movie>> {
        Ok(self.inner.read().await.movies.get(&movie_id).cloned())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_store() -> InMemoryRatingStore {
        let store = InMemoryRatingStore::new();
        store.add_user(User::new(1).with_email("a@example.com")).await;
        store.add_user(User::new(2)).await;
        store.add_movie(Movie::new(10, "Toy Story")).await;
        store.add_movie(Movie::new(11, "GoldenEye")).await;
        store
    }

    #[tokio::test]
    async fn test_upsert_supersedes_previous_score() {
        let store = seeded_store().await;

        store.upsert_rating(RatingSample::new(1, 10, 2).unwrap()).await.unwrap();
        store.upsert_rating(RatingSample::new(1, 10, 5).unwrap()).await.unwrap();

        let history = store.get_history(1).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.score(10), Some(5));
        assert_eq!(store.get_raters_of(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_rejects_unknown_ids_and_bad_scores() {
        let store = seeded_store().await;

        let unknown_user = store.upsert_rating(RatingSample::new(3, 10, 2).unwrap()).await;
        assert!(matches!(unknown_user, Err(AppError::NotFound(_))));

        let unknown_movie = store.upsert_rating(RatingSample::new(1, 99, 2).unwrap()).await;
        assert!(matches!(unknown_movie, Err(AppError::NotFound(_))));

        let bad_score = RatingSample {
            user_id: 1,
            movie_id: 10,
            score: 0,
        };
        assert!(matches!(
            store.upsert_rating(bad_score).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_history_only_contains_own_ratings() {
        let store = seeded_store().await;
        store.upsert_rating(RatingSample::new(1, 10, 4).unwrap()).await.unwrap();
        store.upsert_rating(RatingSample::new(2, 10, 1).unwrap()).await.unwrap();
        store.upsert_rating(RatingSample::new(2, 11, 3).unwrap()).await.unwrap();

        let history = store.get_history(2).await.unwrap();
        assert_eq!(history.iter().collect::<Vec<_>>(), vec![(10, 1), (11, 3)]);

        let histories = store.get_histories(&[1, 2]).await.unwrap();
        assert_eq!(histories.len(), 2);
        assert_eq!(histories[0].user_id(), 1);
    }

    #[tokio::test]
    async fn test_average_score() {
        let store = seeded_store().await;
        assert_eq!(store.get_average_score(10).await.unwrap(), None);

        store.upsert_rating(RatingSample::new(1, 10, 4).unwrap()).await.unwrap();
        store.upsert_rating(RatingSample::new(2, 10, 1).unwrap()).await.unwrap();
        assert_eq!(store.get_average_score(10).await.unwrap(), Some(2.5));
    }

    #[tokio::test]
    async fn test_user_lookups() {
        let store = seeded_store().await;

        let found = store.find_user_by_email("a@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.user_id), Some(1));
        assert!(store.find_user_by_email("nobody@example.com").await.unwrap().is_none());
        assert_eq!(store.list_users().await.unwrap().len(), 2);
        assert!(store.get_user(3).await.unwrap().is_none());
        assert_eq!(store.get_movie(11).await.unwrap().unwrap().title, "GoldenEye");
    }
}
