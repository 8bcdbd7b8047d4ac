use tracing::{info, warn};

use super::{
    dto::{LoginRequest, LoginResponse},
    password::verify_password,
};
use crate::{
    error::{AppError, Result},
    state::AppState,
    users::validation::validate_phone_number,
};

const INVALID_CREDENTIALS: &str = "invalid phone number or password";

/// Checks the credentials and issues an access token for the matching user.
pub async fn login(st: &AppState, req: LoginRequest) -> Result<LoginResponse> {
    validate_phone_number(&req.phone_number)?;

    let Some(user) = st.repo.find_user_by_phone_number(&req.phone_number).await? else {
        warn!(phone_number = %req.phone_number, "login unknown phone number");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    if !verify_password(&req.password, &user.salt, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let access_token = st.jwt.sign_access(user.id)?;

    info!(user_id = user.id, "user logged in");
    Ok(LoginResponse {
        id: user.id,
        access_token,
    })
}
