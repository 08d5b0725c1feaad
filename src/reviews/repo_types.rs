use sqlx::FromRow;
use time::OffsetDateTime;

use crate::{auth::repo_types::UserId, movies::repo_types::MovieId};

pub type ReviewId = i64;

#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub comment: String,
    pub score: i32,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub comment: String,
    pub score: i32,
    pub created_at: OffsetDateTime,
}

/// A review joined with its owner's handle.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewView {
    pub id: ReviewId,
    pub author: String,
    pub comment: String,
    pub score: i32,
    pub created_at: OffsetDateTime,
}
