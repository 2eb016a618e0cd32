use std::collections::BTreeMap;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{stored_history, RatingStore},
    error::{AppError, AppResult},
    models::{Movie, MovieId, RatingSample, User, UserHistory, UserId},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Rating store backed by the `users`, `movies` and `ratings` tables
#[derive(Clone)]
pub struct PgRatingStore {
    pool: PgPool,
}

impl PgRatingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RatingStore for PgRatingStore {
    async fn get_history(&self, user_id: UserId) -> AppResult<UserHistory> {
        let rows = sqlx::query_as::<_, RatingSample>(
            r#"
            SELECT user_id, movie_id, score
            FROM ratings
            WHERE user_id = $1
            ORDER BY movie_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        stored_history(user_id, rows)
    }

    async fn get_histories(&self, user_ids: &[UserId]) -> AppResult<Vec<UserHistory>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, RatingSample>(
            r#"
            SELECT user_id, movie_id, score
            FROM ratings
            WHERE user_id = ANY($1)
            ORDER BY user_id, movie_id
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: BTreeMap<UserId, Vec<RatingSample>> =
            user_ids.iter().map(|id| (*id, Vec::new())).collect();
        for row in rows {
            grouped.entry(row.user_id).or_default().push(row);
        }

        let histories = grouped
            .into_iter()
            .map(|(user_id, samples)| stored_history(user_id, samples))
            .collect::<AppResult<Vec<_>>>()?;

        tracing::debug!(
            requested = user_ids.len(),
            loaded = histories.len(),
            "Loaded rater histories"
        );

        Ok(histories)
    }

    async fn get_raters_of(&self, movie_id: MovieId) -> AppResult<Vec<RatingSample>> {
        let rows = sqlx::query_as::<_, RatingSample>(
            r#"
            SELECT user_id, movie_id, score
            FROM ratings
            WHERE movie_id = $1
            ORDER BY user_id
            "#,
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get_average_score(&self, movie_id: MovieId) -> AppResult<Option<f64>> {
        let average: Option<f64> = sqlx::query_scalar(
            r#"
            SELECT AVG(score)::float8
            FROM ratings
            WHERE movie_id = $1
            "#,
        )
        .bind(movie_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(average)
    }

    async fn upsert_rating(&self, sample: RatingSample) -> AppResult<()> {
        sample.validate()?;

        let result = sqlx::query(
            r#"
            INSERT INTO ratings (user_id, movie_id, score)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, movie_id) DO UPDATE SET score = EXCLUDED.score
            "#,
        )
        .bind(sample.user_id)
        .bind(sample.movie_id)
        .bind(sample.score)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            // Foreign key violation: unknown user or movie
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some("23503") => {
                Err(AppError::NotFound(format!(
                    "user {} or movie {}",
                    sample.user_id, sample.movie_id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_user(&self, user_id: UserId) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, email, age, zipcode FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, email, age, zipcode FROM users WHERE email = $1 LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT user_id, email, age, zipcode FROM users ORDER BY user_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn get_movie(&self, movie_id: MovieId) -> AppResult<Option<Movie>> {
        let movie = sqlx::query_as::<_, Movie>(
            "SELECT movie_id, title, released_at, imdb_url FROM movies WHERE movie_id = $1",
        )
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(movie)
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
