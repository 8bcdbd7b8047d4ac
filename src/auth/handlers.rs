use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use super::{
    dto::{LoginRequest, LoginResponse},
    services,
};
use crate::{error::Result, extract::AppJson, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/users/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    services::login(&state, payload).await.map(Json)
}
