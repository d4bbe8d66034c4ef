use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::models::{self, NewUser, User};

/// Sea-ORM Entity for the users table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            password: model.password,
            is_active: model.is_active,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<NewUser> for ActiveModel {
    fn from(input: NewUser) -> Self {
        let now = models::now();

        ActiveModel {
            id: NotSet,
            email: Set(input.email),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            password: Set(input.password),
            is_active: Set(input.is_active),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_model_converts_to_user() {
        let ts = Utc.with_ymd_and_hms(2024, 11, 29, 12, 0, 0).unwrap();
        let model = Model {
            id: 3,
            email: "x@example.com".to_string(),
            first_name: "X".to_string(),
            last_name: "Y".to_string(),
            password: Some("pw".to_string()),
            is_active: false,
            created_at: ts.into(),
            updated_at: ts.into(),
        };

        let user = User::from(model);
        assert_eq!(user.id, 3);
        assert_eq!(user.created_at, ts);
        assert_eq!(user.password.as_deref(), Some("pw"));
        assert!(!user.is_active);
    }

    #[test]
    fn test_new_user_leaves_id_to_the_database() {
        let active = ActiveModel::from(NewUser {
            email: "x@example.com".to_string(),
            first_name: "X".to_string(),
            last_name: "Y".to_string(),
            password: None,
            is_active: true,
        });

        assert!(active.id.is_not_set());
        assert_eq!(active.is_active, Set(true));
        assert_eq!(active.created_at, active.updated_at);
    }
}
