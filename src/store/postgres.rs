use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::Store;
use crate::{
    auth::repo_types::User,
    error::StoreError,
    movies::repo_types::{Movie, MovieId, NewMovie},
    reviews::repo_types::{NewReview, Review, ReviewView},
};

/// Name of the unique constraint on `users.email` in the init migration.
pub(crate) const USERS_EMAIL_KEY: &str = "users_email_key";

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(
        &self,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
    ) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, email)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, email, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(email)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert_movie(&self, movie: NewMovie) -> Result<Movie, StoreError> {
        let movie = sqlx::query_as::<_, Movie>(
            r#"
            INSERT INTO movies (title, year, metascore, userscore)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, year, metascore, userscore
            "#,
        )
        .bind(&movie.title)
        .bind(movie.year)
        .bind(movie.metascore)
        .bind(movie.userscore)
        .fetch_one(&self.db)
        .await?;
        Ok(movie)
    }

    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError> {
        let rows = sqlx::query_as::<_, Movie>(
            r#"
            SELECT id, title, year, metascore, userscore
            FROM movies
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_movie(&self, id: MovieId) -> Result<Option<Movie>, StoreError> {
        let movie = sqlx::query_as::<_, Movie>(
            r#"
            SELECT id, title, year, metascore, userscore
            FROM movies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(movie)
    }

    async fn insert_review(&self, review: NewReview) -> Result<Review, StoreError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (user_id, movie_id, comment, score, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, movie_id, comment, score, created_at
            "#,
        )
        .bind(review.user_id)
        .bind(review.movie_id)
        .bind(&review.comment)
        .bind(review.score)
        .bind(review.created_at)
        .fetch_one(&self.db)
        .await?;
        Ok(review)
    }

    async fn list_reviews_by_movie(
        &self,
        movie_id: MovieId,
    ) -> Result<Vec<ReviewView>, StoreError> {
        let rows = sqlx::query_as::<_, ReviewView>(
            r#"
            SELECT r.id, u.username AS author, r.comment, r.score, r.created_at
              FROM reviews r
              JOIN users u ON u.id = r.user_id
             WHERE r.movie_id = $1
             ORDER BY r.id
            "#,
        )
        .bind(movie_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
