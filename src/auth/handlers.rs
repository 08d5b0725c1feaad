use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, PublicUser, RegisterRequest},
        jwt::{AuthUser, JwtKeys},
        services,
    },
    error::{AppError, MsgResponse},
    json::ApiJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MsgResponse>), AppError> {
    let (Some(username), Some(password)) = (payload.username, payload.password) else {
        warn!("register missing fields");
        return Err(AppError::missing("Missing username or password"));
    };

    match services::register(
        state.store.as_ref(),
        &username,
        &password,
        payload.email.as_deref(),
    )
    .await
    {
        Ok(user_id) => {
            info!(user_id, username = %username, "user registered");
            Ok((StatusCode::CREATED, Json(MsgResponse::new("User created"))))
        }
        Err(e) => {
            warn!(username = %username, error = %e, "register rejected");
            Err(e)
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (Some(username), Some(password)) = (payload.username, payload.password) else {
        warn!("login missing fields");
        return Err(AppError::missing("Missing username or password"));
    };
    let user = services::verify(state.store.as_ref(), &username, &password).await?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.issue(&user.username)?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(LoginResponse { access_token }))
}

pub async fn get_me(AuthUser(user): AuthUser) -> Json<PublicUser> {
    Json(PublicUser {
        id: user.id,
        username: user.username,
        email: user.email,
    })
}
