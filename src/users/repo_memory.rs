//! In-memory [`UserRepository`] for tests. Enforces the same phone-number
//! uniqueness contract as the `users` table.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    repo::{RepoError, UserRepository},
    repo_types::{CreateUserInput, UpdateUserInput, User},
};

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self, id: i64) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create_user(&self, input: CreateUserInput) -> Result<i64, RepoError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.phone_number == input.phone_number) {
            return Err(RepoError::Conflict);
        }
        let id = users.last().map_or(1, |u| u.id + 1);
        users.push(User {
            id,
            full_name: input.full_name,
            phone_number: input.phone_number,
            password_hash: input.password_hash,
            salt: input.salt,
        });
        Ok(id)
    }

    async fn update_user(&self, id: i64, changes: &UpdateUserInput) -> Result<(), RepoError> {
        if changes.is_empty() {
            return Ok(());
        }
        let mut users = self.users.lock().unwrap();
        if let Some(phone) = &changes.phone_number {
            if users.iter().any(|u| u.id != id && &u.phone_number == phone) {
                return Err(RepoError::Conflict);
            }
        }
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            if let Some(name) = &changes.full_name {
                user.full_name = name.clone();
            }
            if let Some(phone) = &changes.phone_number {
                user.phone_number = phone.clone();
            }
        }
        Ok(())
    }

    async fn find_user_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<User>, RepoError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.phone_number == phone_number).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.snapshot(id))
    }
}
