use time::OffsetDateTime;

use crate::{
    auth::repo_types::User,
    error::AppError,
    movies::repo_types::MovieId,
    reviews::repo_types::{NewReview, ReviewId, ReviewView},
    store::Store,
};

/// Records a review by `owner` about an existing movie.
///
/// Presence is checked before the movie lookup, so a request with missing
/// fields is a 400 even when the movie is also unknown. A score of `0` is a
/// valid score.
pub async fn create(
    store: &dyn Store,
    owner: &User,
    movie_id: Option<MovieId>,
    comment: Option<&str>,
    score: Option<i32>,
) -> Result<ReviewId, AppError> {
    let (Some(movie_id), Some(comment), Some(score)) =
        (movie_id, comment.filter(|c| !c.is_empty()), score)
    else {
        return Err(AppError::missing("Missing movie_id, comment or score"));
    };

    if store.find_movie(movie_id).await?.is_none() {
        return Err(AppError::NotFound("Movie not found".into()));
    }

    // the insert still fails with MissingReference if the row vanished meanwhile
    let review = store
        .insert_review(NewReview {
            user_id: owner.id,
            movie_id,
            comment: comment.to_string(),
            score,
            created_at: OffsetDateTime::now_utc(),
        })
        .await?;
    Ok(review.id)
}

/// Every review of `movie_id` with its author's handle, oldest first.
pub async fn list_by_movie(
    store: &dyn Store,
    movie_id: MovieId,
) -> Result<Vec<ReviewView>, AppError> {
    Ok(store.list_reviews_by_movie(movie_id).await?)
}
