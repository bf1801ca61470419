use async_trait::async_trait;
use uuid::Uuid;

use crate::error::UserResult;
use crate::models::User;

/// Persistence for users. Email and phone are each unique when present.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with a duplicate error when the email or phone is taken
    async fn create(&self, user: User) -> UserResult<User>;

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// `email` must already be lower-cased
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn get_by_phone(&self, phone: &str) -> UserResult<Option<User>>;

    async fn list(&self) -> UserResult<Vec<User>>;

    /// Users flagged with `extra_shift`
    async fn list_extra_shift(&self) -> UserResult<Vec<User>>;

    /// Replaces the stored document; `None` when the user is gone
    async fn update(&self, user: User) -> UserResult<Option<User>>;

    async fn delete(&self, id: Uuid) -> UserResult<bool>;
}
