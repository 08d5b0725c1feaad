use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::Store;
use crate::{
    auth::repo_types::User,
    error::StoreError,
    movies::repo_types::{Movie, MovieId, NewMovie},
    reviews::repo_types::{NewReview, Review, ReviewView},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    movies: Vec<Movie>,
    reviews: Vec<Review>,
}

/// In-process store with the same constraints as the PostgreSQL schema.
///
/// Rows are never deleted, so a row's id is its 1-based position.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(
        &self,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
    ) -> Result<User, StoreError> {
        let mut t = self.tables.write().await;
        if t.users.iter().any(|u| u.username == username) {
            return Err(StoreError::DuplicateHandle);
        }
        if let Some(email) = email {
            if t.users.iter().any(|u| u.email.as_deref() == Some(email)) {
                return Err(StoreError::DuplicateContact);
            }
        }
        let user = User {
            id: t.users.len() as i64 + 1,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            email: email.map(str::to_string),
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_movie(&self, movie: NewMovie) -> Result<Movie, StoreError> {
        let mut t = self.tables.write().await;
        let movie = Movie {
            id: t.movies.len() as i64 + 1,
            title: movie.title,
            year: movie.year,
            metascore: movie.metascore,
            userscore: movie.userscore,
        };
        t.movies.push(movie.clone());
        Ok(movie)
    }

    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError> {
        Ok(self.tables.read().await.movies.clone())
    }

    async fn find_movie(&self, id: MovieId) -> Result<Option<Movie>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.movies.iter().find(|m| m.id == id).cloned())
    }

    async fn insert_review(&self, review: NewReview) -> Result<Review, StoreError> {
        let mut t = self.tables.write().await;
        let user_exists = t.users.iter().any(|u| u.id == review.user_id);
        let movie_exists = t.movies.iter().any(|m| m.id == review.movie_id);
        if !user_exists || !movie_exists {
            return Err(StoreError::MissingReference);
        }
        let review = Review {
            id: t.reviews.len() as i64 + 1,
            user_id: review.user_id,
            movie_id: review.movie_id,
            comment: review.comment,
            score: review.score,
            created_at: review.created_at,
        };
        t.reviews.push(review.clone());
        Ok(review)
    }

    async fn list_reviews_by_movie(
        &self,
        movie_id: MovieId,
    ) -> Result<Vec<ReviewView>, StoreError> {
        let t = self.tables.read().await;
        t.reviews
            .iter()
            .filter(|r| r.movie_id == movie_id)
            .map(|r| -> Result<ReviewView, StoreError> {
                let author = t
                    .users
                    .iter()
                    .find(|u| u.id == r.user_id)
                    .map(|u| u.username.clone())
                    .ok_or(StoreError::MissingReference)?;
                Ok(ReviewView {
                    id: r.id,
                    author,
                    comment: r.comment.clone(),
                    score: r.score,
                    created_at: r.created_at,
                })
            })
            .collect()
    }
}
