use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::{ReviewId, ReviewView};
use crate::movies::repo_types::MovieId;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateReviewRequest {
    pub movie_id: Option<MovieId>,
    pub comment: Option<String>,
    #[serde(alias = "puntuacion")]
    pub score: Option<i32>,
}

/// One review as shown under a movie. `puntuacion` mirrors `score` for
/// clients of the older field name.
#[derive(Debug, Serialize)]
pub struct ReviewItem {
    pub id: ReviewId,
    pub user: String,
    pub comment: String,
    pub score: i32,
    pub puntuacion: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<ReviewView> for ReviewItem {
    fn from(v: ReviewView) -> Self {
        Self {
            id: v.id,
            user: v.author,
            comment: v.comment,
            score: v.score,
            puntuacion: v.score,
            created_at: v.created_at,
        }
    }
}
