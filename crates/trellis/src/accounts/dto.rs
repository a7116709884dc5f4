//! Request and response shapes of the account endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trellis_domain::value_objects::{BindTarget, FieldCoercion, validation_messages};
use validator::Validate;

use super::store::UserRecord;

/// Body of `POST /users/register`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDto {
    #[validate(length(min = 3, max = 32, message = "\"username\" must be 3 to 32 characters"))]
    pub username: String,
    #[validate(length(min = 6, max = 64, message = "\"password\" must be 6 to 64 characters"))]
    pub password: String,
    pub confirmed_password: String,
    #[validate(length(max = 32, message = "\"nickname\" must be at most 32 characters"))]
    pub nickname: Option<String>,
    #[validate(range(min = 0, max = 150, message = "\"age\" must be between 0 and 150"))]
    pub age: Option<i64>,
}

impl BindTarget for RegisterDto {
    const COERCIONS: &'static [FieldCoercion] = &[FieldCoercion::number("age")];

    fn check(&self) -> Result<(), Vec<String>> {
        self.validate().map_err(|e| validation_messages(&e))
    }
}

/// Body of `PUT /users/login`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginDto {
    #[validate(length(min = 1, message = "\"username\" is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "\"password\" is required"))]
    pub password: String,
}

impl BindTarget for LoginDto {
    fn check(&self) -> Result<(), Vec<String>> {
        self.validate().map_err(|e| validation_messages(&e))
    }
}

/// Query of `GET /users`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserQueryDto {
    /// Substring of the username
    pub username: Option<String>,
    #[validate(range(min = 0, max = 150, message = "\"age\" must be between 0 and 150"))]
    pub age: Option<i64>,
    pub active: Option<bool>,
    #[validate(range(min = 1, message = "\"page\" must be at least 1"))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "\"pageSize\" must be between 1 and 100"))]
    pub page_size: Option<i64>,
}

impl BindTarget for UserQueryDto {
    const COERCIONS: &'static [FieldCoercion] = &[
        FieldCoercion::number("age"),
        FieldCoercion::boolean("active"),
        FieldCoercion::number("page"),
        FieldCoercion::number("pageSize"),
    ];

    fn check(&self) -> Result<(), Vec<String>> {
        self.validate().map_err(|e| validation_messages(&e))
    }
}

/// Body of `PUT /users/:id`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserDto {
    #[validate(length(max = 32, message = "\"nickname\" must be at most 32 characters"))]
    pub nickname: Option<String>,
    #[validate(range(min = 0, max = 150, message = "\"age\" must be between 0 and 150"))]
    pub age: Option<i64>,
    pub active: Option<bool>,
}

impl BindTarget for UpdateUserDto {
    const COERCIONS: &'static [FieldCoercion] =
        &[FieldCoercion::number("age"), FieldCoercion::boolean("active")];

    fn check(&self) -> Result<(), Vec<String>> {
        self.validate().map_err(|e| validation_messages(&e))
    }
}

/// Body of `PUT /roles/assign` and `PUT /roles/revoke`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignmentDto {
    #[validate(range(min = 1, message = "\"userId\" must be a positive id"))]
    pub user_id: u64,
    #[validate(length(min = 1, max = 32, message = "\"role\" must be 1 to 32 characters"))]
    pub role: String,
}

impl BindTarget for RoleAssignmentDto {
    const COERCIONS: &'static [FieldCoercion] = &[FieldCoercion::number("userId")];

    fn check(&self) -> Result<(), Vec<String>> {
        self.validate().map_err(|e| validation_messages(&e))
    }
}

/// Public profile of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: u64,
    pub username: String,
    pub nickname: Option<String>,
    pub age: Option<i64>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&UserRecord> for UserView {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username.clone(),
            nickname: record.nickname.clone(),
            age: record.age,
            active: record.active,
            created_at: record.created_at,
        }
    }
}

/// Answer of a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
    pub user_id: u64,
    pub token: String,
}
