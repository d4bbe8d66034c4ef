use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, QueryOrder, SqlErr,
};

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{NewUser, UpdateUser, User},
    repository::UserRepository,
};

pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Map a failed write. A unique violation on a write that set `email` is
/// reported as a duplicate email.
fn map_write_err(err: DbErr, email: Option<&str>) -> UserError {
    match (err.sql_err(), email) {
        (Some(SqlErr::UniqueConstraintViolation(detail)), Some(email)) => {
            tracing::debug!(%detail, "Unique constraint violated");
            UserError::duplicate_email(email)
        }
        (Some(SqlErr::UniqueConstraintViolation(detail)), None) => {
            UserError::ConstraintViolation(detail)
        }
        _ => db_err(err),
    }
}

fn db_err(err: DbErr) -> UserError {
    UserError::Internal(format!("Database error: {}", err))
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, input: NewUser) -> UserResult<User> {
        let email = input.email.clone();
        let active_model: entity::ActiveModel = input.into();

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err(e, Some(&email)))?;

        tracing::info!(user_id = model.id, "Created user");
        Ok(model.into())
    }

    async fn find_all(&self) -> UserResult<Vec<User>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i32) -> UserResult<Option<User>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(Into::into))
    }

    async fn merge_partial(&self, id: i32, changes: UpdateUser) -> UserResult<Option<User>> {
        let Some(model) = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let new_email = changes.email.clone();
        let mut user: User = model.clone().into();
        user.apply_update(changes);

        let mut active_model = model.into_active_model();
        active_model.email = Set(user.email);
        active_model.first_name = Set(user.first_name);
        active_model.last_name = Set(user.last_name);
        active_model.password = Set(user.password);
        active_model.is_active = Set(user.is_active);
        active_model.updated_at = Set(user.updated_at.into());

        let updated = active_model
            .update(&self.db)
            .await
            .map_err(|e| map_write_err(e, new_email.as_deref()))?;

        tracing::info!(user_id = id, "Updated user");
        Ok(Some(updated.into()))
    }

    async fn delete(&self, user: &User) -> UserResult<()> {
        let result = entity::Entity::delete_by_id(user.id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected > 0 {
            tracing::info!(user_id = user.id, "Deleted user");
        } else {
            tracing::warn!(user_id = user.id, "User already removed");
        }
        Ok(())
    }
}
