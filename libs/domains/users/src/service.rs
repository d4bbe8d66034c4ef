use std::sync::Arc;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, NewUser, UpdateUser, User};
use crate::repository::UserRepository;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a user. New users are always active.
    pub async fn create(&self, input: CreateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        self.repository.insert(NewUser::from(input)).await
    }

    pub async fn list_all(&self) -> UserResult<Vec<User>> {
        self.repository.find_all().await
    }

    pub async fn get_by_id(&self, id: i32) -> UserResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// Apply a partial update
    pub async fn update(&self, id: i32, changes: UpdateUser) -> UserResult<User> {
        changes
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        self.repository
            .merge_partial(id, changes)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    pub async fn remove(&self, id: i32) -> UserResult<()> {
        let user = self.get_by_id(id).await?;
        self.repository.delete(&user).await
    }
}
