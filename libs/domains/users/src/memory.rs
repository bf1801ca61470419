//! In-process [`UserRepository`] for tests and for other crates' tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::repository::UserRepository;

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_unique(users: &HashMap<Uuid, User>, candidate: &User) -> UserResult<()> {
        for other in users.values().filter(|u| u.id != candidate.id) {
            if candidate.email.is_some() && other.email == candidate.email {
                return Err(UserError::DuplicateEmail);
            }
            if candidate.phone.is_some() && other.phone == candidate.phone {
                return Err(UserError::DuplicatePhone);
            }
        }
        Ok(())
    }

    async fn select(&self, predicate: impl Fn(&User) -> bool) -> Vec<User> {
        let mut users: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| predicate(u))
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        users
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;
        Self::ensure_unique(&users, &user)?;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn get_by_phone(&self, phone: &str) -> UserResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.phone.as_deref() == Some(phone))
            .cloned())
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        Ok(self.select(|_| true).await)
    }

    async fn list_extra_shift(&self) -> UserResult<Vec<User>> {
        Ok(self.select(|u| u.extra_shift).await)
    }

    async fn update(&self, user: User) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Ok(None);
        }
        Self::ensure_unique(&users, &user)?;
        users.insert(user.id, user.clone());
        Ok(Some(user))
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        Ok(self.users.write().await.remove(&id).is_some())
    }
}
