use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Staff roles. Only `admin` unlocks admin routes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    Staff,
    Supplier,
    Driver,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Shift {
    #[default]
    Morning,
    Evening,
    Night,
}

/// Stored user document. Never returned directly; see [`UserResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    /// Lower-cased. Absent rather than null so the sparse unique index ignores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Argon2 PHC string
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub shift: Shift,
    #[serde(default)]
    pub wage_per_hour: f64,
    #[serde(default)]
    pub hours_this_month: f64,
    /// Flags overworked staff
    #[serde(default)]
    pub extra_shift: bool,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// User as returned by the API (no password hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub shift: Shift,
    pub wage_per_hour: f64,
    pub hours_this_month: f64,
    pub extra_shift: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            shift: user.shift,
            wage_per_hour: user.wage_per_hour,
            hours_this_month: user.hours_this_month,
            extra_shift: user.extra_shift,
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

fn contact_required() -> ValidationError {
    ValidationError::new("contact_required")
        .with_message("At least one of phone or email is required".into())
}

fn nothing_to_update() -> ValidationError {
    ValidationError::new("empty_update").with_message("At least one field must be updated".into())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_register_contact"))]
pub struct RegisterUser {
    #[validate(length(min = 3, max = 20))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(equal = 10))]
    pub phone: Option<String>,
    #[validate(length(min = 4, max = 10))]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

fn validate_register_contact(input: &RegisterUser) -> Result<(), ValidationError> {
    if input.email.is_none() && input.phone.is_none() {
        return Err(contact_required());
    }
    Ok(())
}

/// Credentials; email is tried before phone
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_login_contact"))]
pub struct LoginRequest {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(equal = 10))]
    pub phone: Option<String>,
    pub password: String,
}

fn validate_login_contact(input: &LoginRequest) -> Result<(), ValidationError> {
    if input.email.is_none() && input.phone.is_none() {
        return Err(contact_required());
    }
    Ok(())
}

/// Self-service profile changes
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_profile_change"))]
pub struct UpdateProfile {
    #[validate(length(min = 3, max = 20))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(equal = 10))]
    pub phone: Option<String>,
    pub active: Option<bool>,
}

fn validate_profile_change(input: &UpdateProfile) -> Result<(), ValidationError> {
    if input.name.is_none() && input.email.is_none() && input.phone.is_none() && input.active.is_none()
    {
        return Err(nothing_to_update());
    }
    Ok(())
}

/// Admin changes, including payroll fields
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_admin_change"))]
pub struct AdminUpdateUser {
    #[validate(length(min = 3, max = 20))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(equal = 10))]
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub shift: Option<Shift>,
    #[validate(range(min = 0.0))]
    pub wage_per_hour: Option<f64>,
    #[validate(range(min = 0.0))]
    pub hours_this_month: Option<f64>,
    pub extra_shift: Option<bool>,
    pub active: Option<bool>,
}

fn validate_admin_change(input: &AdminUpdateUser) -> Result<(), ValidationError> {
    let untouched = input.name.is_none()
        && input.email.is_none()
        && input.phone.is_none()
        && input.role.is_none()
        && input.shift.is_none()
        && input.wage_per_hour.is_none()
        && input.hours_this_month.is_none()
        && input.extra_shift.is_none()
        && input.active.is_none();
    if untouched {
        return Err(nothing_to_update());
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct PasswordUpdate {
    #[validate(length(min = 4, max = 15))]
    pub password: String,
}

/// `data` of the register and login responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthPayload {
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserList {
    pub length: usize,
    pub users: Vec<UserResponse>,
}

impl From<Vec<User>> for UserList {
    fn from(users: Vec<User>) -> Self {
        Self {
            length: users.len(),
            users: users.into_iter().map(UserResponse::from).collect(),
        }
    }
}

fn normalize_email(email: String) -> String {
    email.trim().to_lowercase()
}

impl User {
    /// New active user; the password must already be hashed
    pub fn new(input: RegisterUser, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            email: input.email.map(normalize_email),
            phone: input.phone,
            password_hash,
            role: input.role,
            shift: Shift::default(),
            wage_per_hour: 0.0,
            hours_this_month: 0.0,
            extra_shift: false,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_profile(&mut self, update: UpdateProfile) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = Some(normalize_email(email));
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(active) = update.active {
            self.active = active;
        }
        self.updated_at = Utc::now();
    }

    pub fn apply_admin_update(&mut self, update: AdminUpdateUser) {
        self.apply_profile(UpdateProfile {
            name: update.name,
            email: update.email,
            phone: update.phone,
            active: update.active,
        });
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(shift) = update.shift {
            self.shift = shift;
        }
        if let Some(wage_per_hour) = update.wage_per_hour {
            self.wage_per_hour = wage_per_hour;
        }
        if let Some(hours) = update.hours_this_month {
            self.hours_this_month = hours;
        }
        if let Some(extra_shift) = update.extra_shift {
            self.extra_shift = extra_shift;
        }
    }

    /// Normalized email lookup key
    pub fn email_key(email: &str) -> String {
        normalize_email(email.to_string())
    }
}
