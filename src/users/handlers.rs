use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{ProfileResponse, RegisterRequest, UpdateOutcome, UpdateProfileRequest, UserIdResponse},
    services,
};
use crate::{auth::extractors::AuthUser, error::Result, extract::AppJson, state::AppState};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route(
        "/users/profile",
        post(register)
            .get(get_profile)
            .patch(update_profile)
            .put(update_profile),
    )
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<Json<UserIdResponse>> {
    services::register(&state, payload).await.map(Json)
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileResponse>> {
    services::get_profile(&state, user).await.map(Json)
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> Result<Response> {
    let outcome = services::update_profile(&state, user, payload).await?;
    Ok(match outcome {
        UpdateOutcome::Unchanged => StatusCode::NO_CONTENT.into_response(),
        UpdateOutcome::Updated(body) => Json(body).into_response(),
    })
}
