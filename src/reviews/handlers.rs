use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{CreateReviewRequest, ReviewItem},
    services,
};
use crate::{
    auth::jwt::AuthUser,
    error::{AppError, MsgResponse},
    json::ApiJson,
    movies::repo_types::MovieId,
    state::AppState,
};

pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", post(create_review))
        .route("/reviews/movie/:id", get(list_reviews_by_movie))
}

#[instrument(skip(state, user, body))]
pub async fn create_review(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<MsgResponse>), AppError> {
    let review_id = services::create(
        state.store.as_ref(),
        &user,
        body.movie_id,
        body.comment.as_deref(),
        body.score,
    )
    .await
    .map_err(|e| {
        warn!(user_id = user.id, movie_id = ?body.movie_id, error = %e, "review rejected");
        e
    })?;

    info!(review_id, user_id = user.id, movie_id = ?body.movie_id, "review created");
    Ok((StatusCode::CREATED, Json(MsgResponse::new("Review created"))))
}

#[instrument(skip(state, path))]
pub async fn list_reviews_by_movie(
    State(state): State<AppState>,
    path: Result<Path<MovieId>, PathRejection>,
) -> Result<Json<Vec<ReviewItem>>, AppError> {
    let Path(id) = path.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let views = services::list_by_movie(state.store.as_ref(), id).await?;
    Ok(Json(views.into_iter().map(ReviewItem::from).collect()))
}
