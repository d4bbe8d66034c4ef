use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{self, NewUser, UpdateUser, User};

/// Repository trait for User persistence
///
/// Implementations own the stored records and enforce email uniqueness.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user, assigning its id and timestamps
    async fn insert(&self, input: NewUser) -> UserResult<User>;

    /// All users in ascending id order
    async fn find_all(&self) -> UserResult<Vec<User>>;

    async fn find_by_id(&self, id: i32) -> UserResult<Option<User>>;

    /// Apply the present fields of `changes`. `None` if no user has `id`.
    async fn merge_partial(&self, id: i32, changes: UpdateUser) -> UserResult<Option<User>>;

    async fn delete(&self, user: &User) -> UserResult<()>;
}

#[derive(Debug, Default)]
struct Store {
    users: BTreeMap<i32, User>,
    last_id: i32,
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, input: NewUser) -> UserResult<User> {
        let mut store = self.store.write().await;

        if store.users.values().any(|u| u.email == input.email) {
            return Err(UserError::duplicate_email(&input.email));
        }

        store.last_id = store
            .last_id
            .checked_add(1)
            .ok_or_else(|| UserError::Internal("user id sequence exhausted".to_string()))?;

        let now = models::now();
        let user = User {
            id: store.last_id,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            password: input.password,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        };
        store.users.insert(user.id, user.clone());

        tracing::info!(user_id = user.id, "Created user");
        Ok(user)
    }

    async fn find_all(&self) -> UserResult<Vec<User>> {
        let store = self.store.read().await;
        Ok(store.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> UserResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.get(&id).cloned())
    }

    async fn merge_partial(&self, id: i32, changes: UpdateUser) -> UserResult<Option<User>> {
        let mut store = self.store.write().await;

        if !store.users.contains_key(&id) {
            return Ok(None);
        }

        if let Some(ref email) = changes.email {
            let taken = store
                .users
                .values()
                .any(|u| u.id != id && &u.email == email);
            if taken {
                return Err(UserError::duplicate_email(email));
            }
        }

        let Some(user) = store.users.get_mut(&id) else {
            return Ok(None);
        };
        user.apply_update(changes);

        tracing::info!(user_id = id, "Updated user");
        Ok(Some(user.clone()))
    }

    async fn delete(&self, user: &User) -> UserResult<()> {
        let mut store = self.store.write().await;

        if store.users.remove(&user.id).is_some() {
            tracing::info!(user_id = user.id, "Deleted user");
        } else {
            tracing::warn!(user_id = user.id, "User already removed");
        }
        Ok(())
    }
}
