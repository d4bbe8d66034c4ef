use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// User record as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier
    pub id: i32,
    /// Unique across all users
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Stored as supplied
    pub password: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Merge the fields present in `changes` and advance `updated_at`.
    pub fn apply_update(&mut self, changes: UpdateUser) {
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(first_name) = changes.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            self.last_name = last_name;
        }
        if let Some(password) = changes.password {
            self.password = password;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        self.updated_at = next_timestamp(self.updated_at);
    }
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(email)]
    #[schema(example = "jane.doe@example.com")]
    pub email: String,

    #[validate(length(min = 1))]
    #[schema(example = "Jane")]
    pub first_name: String,

    #[validate(length(min = 1))]
    #[schema(example = "Doe")]
    pub last_name: String,

    #[serde(default)]
    pub password: Option<String>,
}

/// Body of `PATCH /users/{id}`. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 1))]
    pub first_name: Option<String>,

    #[validate(length(min = 1))]
    pub last_name: Option<String>,

    /// Absent keeps the stored value, `null` clears it.
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub password: Option<Option<String>>,

    pub is_active: Option<bool>,
}

/// Keeps an explicit `null` distinct from a missing key: a present key,
/// `null` included, becomes `Some`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Store input for a new record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: Option<String>,
    pub is_active: bool,
}

impl From<CreateUser> for NewUser {
    fn from(input: CreateUser) -> Self {
        Self {
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            password: input.password,
            is_active: true,
        }
    }
}

/// Current time at the precision PostgreSQL keeps (microseconds).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A timestamp strictly after `previous`, normally the current time.
pub fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    now().max(previous + TimeDelta::microseconds(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let created = now();
        User {
            id: 1,
            email: "jane@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            password: None,
            is_active: true,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(user()).unwrap();
        assert_eq!(json["firstName"], "Jane");
        assert_eq!(json["lastName"], "Doe");
        assert_eq!(json["isActive"], true);
        assert!(json["password"].is_null());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("first_name").is_none());
    }

    #[test]
    fn test_apply_empty_update_only_touches_updated_at() {
        let original = user();
        let mut updated = original.clone();

        updated.apply_update(UpdateUser::default());

        assert!(updated.updated_at > original.updated_at);
        assert_eq!(
            User {
                updated_at: original.updated_at,
                ..updated
            },
            original
        );
    }

    #[test]
    fn test_apply_update_merges_present_fields() {
        let mut u = user();
        u.apply_update(UpdateUser {
            last_name: Some("Z".to_string()),
            is_active: Some(false),
            ..Default::default()
        });

        assert_eq!(u.first_name, "Jane");
        assert_eq!(u.last_name, "Z");
        assert!(!u.is_active);
    }

    #[test]
    fn test_update_password_null_differs_from_absent() {
        let absent: UpdateUser = serde_json::from_str(r#"{"firstName":"J"}"#).unwrap();
        assert_eq!(absent.password, None);

        let cleared: UpdateUser = serde_json::from_str(r#"{"password":null}"#).unwrap();
        assert_eq!(cleared.password, Some(None));

        let set: UpdateUser = serde_json::from_str(r#"{"password":"pw"}"#).unwrap();
        assert_eq!(set.password, Some(Some("pw".to_string())));
    }

    #[test]
    fn test_apply_update_clears_password_on_null() {
        let mut u = User {
            password: Some("hunter2".to_string()),
            ..user()
        };

        u.apply_update(UpdateUser::default());
        assert_eq!(u.password.as_deref(), Some("hunter2"));

        u.apply_update(UpdateUser {
            password: Some(None),
            ..Default::default()
        });
        assert!(u.password.is_none());
    }

    #[test]
    fn test_next_timestamp_is_strictly_later_even_for_future_previous() {
        let future = now() + TimeDelta::seconds(60);
        assert!(next_timestamp(future) > future);
    }

    #[test]
    fn test_new_user_is_always_active() {
        let input = CreateUser {
            email: "a@example.com".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            password: Some("secret".to_string()),
        };
        let new_user = NewUser::from(input);
        assert!(new_user.is_active);
        assert_eq!(new_user.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_create_user_validation() {
        let valid = CreateUser {
            email: "a@example.com".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            password: None,
        };
        assert!(valid.validate().is_ok());

        let bad_email = CreateUser {
            email: "not-an-email".to_string(),
            ..valid.clone()
        };
        assert!(bad_email.validate().is_err());

        let empty_name = CreateUser {
            first_name: String::new(),
            ..valid
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_update_user_validates_only_present_fields() {
        assert!(UpdateUser::default().validate().is_ok());

        let bad = UpdateUser {
            email: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
