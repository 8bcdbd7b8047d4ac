use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,                      // generated by the store
    pub full_name: String,
    pub phone_number: String,         // unique
    pub password_hash: String,        // Argon2 PHC string
    pub salt: String,
}

#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub full_name: String,
    pub phone_number: String,
    pub password_hash: String,
    pub salt: String,
}

/// Partial profile change; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

impl UpdateUserInput {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.phone_number.is_none()
    }
}
