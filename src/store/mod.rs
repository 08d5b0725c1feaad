use async_trait::async_trait;

use crate::{
    auth::repo_types::User,
    error::StoreError,
    movies::repo_types::{Movie, MovieId, NewMovie},
    reviews::repo_types::{NewReview, Review, ReviewView},
};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub(crate) use postgres::USERS_EMAIL_KEY;

/// Relational persistence for users, movies and reviews.
///
/// Implementations enforce handle/email uniqueness and review references
/// themselves; callers never rely on a prior lookup for correctness.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(
        &self,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
    ) -> Result<User, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn insert_movie(&self, movie: NewMovie) -> Result<Movie, StoreError>;

    /// All movies in primary-key order.
    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError>;

    async fn find_movie(&self, id: MovieId) -> Result<Option<Movie>, StoreError>;

    /// Fails with `MissingReference` when the owner or subject does not exist.
    async fn insert_review(&self, review: NewReview) -> Result<Review, StoreError>;

    /// Reviews of one movie joined with their author, in primary-key order.
    async fn list_reviews_by_movie(&self, movie_id: MovieId)
        -> Result<Vec<ReviewView>, StoreError>;
}
