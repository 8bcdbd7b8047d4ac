use serde::{Deserialize, Serialize};

/// Request body for registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub phone_number: String,
    pub password: String,
}

/// Returned by registration and profile update.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct UserIdResponse {
    pub id: i64,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub full_name: String,
    pub phone_number: String,
}

/// Request body for profile update; absent fields stay as they are.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

/// Result of a profile update.
#[derive(Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Nothing to change; no write performed.
    Unchanged,
    Updated(UserIdResponse),
}
