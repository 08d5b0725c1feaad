use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{info, instrument, warn};

use super::{dto::CreateMovieRequest, repo_types::Movie, services};
use crate::{
    auth::jwt::AuthUser,
    error::{AppError, MsgResponse},
    json::ApiJson,
    state::AppState,
};

pub fn movie_routes() -> Router<AppState> {
    Router::new().route("/movies", get(list_movies).post(create_movie))
}

#[instrument(skip(state))]
pub async fn list_movies(State(state): State<AppState>) -> Result<Json<Vec<Movie>>, AppError> {
    let movies = services::list(state.store.as_ref()).await?;
    Ok(Json(movies))
}

/// Any authenticated user may add a movie.
#[instrument(skip(state, user, body))]
pub async fn create_movie(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<CreateMovieRequest>,
) -> Result<(StatusCode, Json<MsgResponse>), AppError> {
    let Some(title) = body.title else {
        warn!(user_id = user.id, "movie without title");
        return Err(AppError::missing("Missing title"));
    };

    let movie_id = services::create(
        state.store.as_ref(),
        &title,
        body.year,
        body.metascore.unwrap_or(0),
        body.userscore.unwrap_or(0),
    )
    .await?;

    info!(movie_id, user_id = user.id, %title, "movie created");
    Ok((StatusCode::CREATED, Json(MsgResponse::new("Movie created"))))
}
