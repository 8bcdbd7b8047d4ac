use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;

use super::repo_types::{CreateUserInput, UpdateUserInput, User};

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum RepoError {
    /// A row with the same phone number already exists.
    #[error("phone number already exists")]
    Conflict,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

fn is_unique_violation(code: Option<&str>) -> bool {
    code == Some(UNIQUE_VIOLATION)
}

/// Translates a unique-constraint violation into [`RepoError::Conflict`].
fn translate(e: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db) = &e {
        if is_unique_violation(db.code().as_deref()) {
            return RepoError::Conflict;
        }
    }
    RepoError::Database(e)
}

/// Storage port for user accounts.
///
/// Both lookups report absence as `Ok(None)`; deciding what a missing user
/// means is left to the caller.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, input: CreateUserInput) -> Result<i64, RepoError>;
    async fn update_user(&self, id: i64, changes: &UpdateUserInput) -> Result<(), RepoError>;
    async fn find_user_by_phone_number(&self, phone_number: &str)
        -> Result<Option<User>, RepoError>;
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, RepoError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Builds `UPDATE users SET ... WHERE id = $n` for the fields present in `changes`.
/// Returns `None` when there is nothing to write.
fn update_query(id: i64, changes: &UpdateUserInput) -> Option<QueryBuilder<'_, Postgres>> {
    if changes.is_empty() {
        return None;
    }
    let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET ");
    let mut set = qb.separated(", ");
    if let Some(name) = &changes.full_name {
        set.push("full_name = ").push_bind_unseparated(name);
    }
    if let Some(phone) = &changes.phone_number {
        set.push("phone_number = ").push_bind_unseparated(phone);
    }
    set.push("updated_at = now()");
    qb.push(" WHERE id = ").push_bind(id);
    Some(qb)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, input: CreateUserInput) -> Result<i64, RepoError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (full_name, phone_number, password_hash, salt)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&input.full_name)
        .bind(&input.phone_number)
        .bind(&input.password_hash)
        .bind(&input.salt)
        .fetch_one(&self.db)
        .await
        .map_err(translate)?;
        Ok(id)
    }

    async fn update_user(&self, id: i64, changes: &UpdateUserInput) -> Result<(), RepoError> {
        let Some(mut qb) = update_query(id, changes) else {
            return Ok(());
        };
        qb.build().execute(&self.db).await.map_err(translate)?;
        Ok(())
    }

    async fn find_user_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, full_name, phone_number, password_hash, salt
            FROM users
            WHERE phone_number = $1
            "#,
        )
        .bind(phone_number)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, full_name, phone_number, password_hash, salt
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}
