use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{
    AdminUpdateUser, LoginRequest, PasswordUpdate, RegisterUser, UpdateProfile, User,
};
use crate::repository::UserRepository;

/// Service layer for accounts and credentials
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    fn validate(input: &impl Validate) -> UserResult<()> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))
    }

    #[instrument(skip(self, input), fields(role = %input.role))]
    pub async fn register(&self, input: RegisterUser) -> UserResult<User> {
        Self::validate(&input)?;

        let password_hash = hash_password(&input.password)?;
        let user = self.repository.create(User::new(input, password_hash)).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Looks the user up by email, then by phone. Unknown users and wrong passwords fail alike.
    #[instrument(skip(self, input))]
    pub async fn login(&self, input: LoginRequest) -> UserResult<User> {
        Self::validate(&input)?;

        let user = match (&input.email, &input.phone) {
            (Some(email), _) => self.repository.get_by_email(&User::email_key(email)).await?,
            (None, Some(phone)) => self.repository.get_by_phone(phone).await?,
            (None, None) => None,
        }
        .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(UserError::InvalidCredentials);
        }
        if !user.active {
            return Err(UserError::Inactive);
        }

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.list().await
    }

    #[instrument(skip(self))]
    pub async fn list_extra_shift(&self) -> UserResult<Vec<User>> {
        self.repository.list_extra_shift().await
    }

    async fn save(&self, user: User) -> UserResult<User> {
        let id = user.id;
        self.repository
            .update(user)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    #[instrument(skip(self, input))]
    pub async fn update_profile(&self, id: Uuid, input: UpdateProfile) -> UserResult<User> {
        Self::validate(&input)?;

        let mut user = self.get_user(id).await?;
        user.apply_profile(input);
        self.save(user).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_password(&self, id: Uuid, input: PasswordUpdate) -> UserResult<User> {
        Self::validate(&input)?;

        let mut user = self.get_user(id).await?;
        user.password_hash = hash_password(&input.password)?;
        user.updated_at = chrono::Utc::now();

        let user = self.save(user).await?;
        tracing::info!(user_id = %id, "Password updated");
        Ok(user)
    }

    #[instrument(skip(self, input))]
    pub async fn admin_update(&self, id: Uuid, input: AdminUpdateUser) -> UserResult<User> {
        Self::validate(&input)?;

        let mut user = self.get_user(id).await?;
        user.apply_admin_update(input);
        let user = self.save(user).await?;

        tracing::info!(user_id = %id, role = %user.role, shift = %user.shift, "User updated by admin");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound(id));
        }
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}

fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::repository::MockUserRepository;
    use mockall::predicate::*;

    fn register_input() -> RegisterUser {
        RegisterUser {
            name: "Morgan".to_string(),
            email: Some("Morgan@Depot.io".to_string()),
            phone: None,
            password: "hunter2".to_string(),
            role: Role::Driver,
        }
    }

    fn stored_user(password: &str) -> User {
        let mut input = register_input();
        input.password = password.to_string();
        User::new(input, hash_password(password).unwrap())
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("pa55").unwrap();
        assert_ne!(hash, "pa55");
        assert!(verify_password("pa55", &hash).unwrap());
        assert!(!verify_password("other", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut mock = MockUserRepository::new();
        mock.expect_create()
            .withf(|user| {
                user.password_hash.starts_with("$argon2")
                    && user.email.as_deref() == Some("morgan@depot.io")
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(mock);
        let user = service.register(register_input()).await.unwrap();
        assert_eq!(user.role, Role::Driver);
    }

    #[tokio::test]
    async fn test_login_looks_up_lowercased_email() {
        let user = stored_user("hunter2");
        let mut mock = MockUserRepository::new();
        mock.expect_get_by_email()
            .withf(|email: &str| email == "morgan@depot.io")
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(mock);
        let logged_in = service
            .login(LoginRequest {
                email: Some("MORGAN@depot.io".to_string()),
                phone: None,
                password: "hunter2".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.name, "Morgan");
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_invalid_credentials() {
        let user = stored_user("hunter2");
        let mut mock = MockUserRepository::new();
        mock.expect_get_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(mock);
        let result = service
            .login(LoginRequest {
                email: Some("morgan@depot.io".to_string()),
                phone: None,
                password: "wrong".to_string(),
            })
            .await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_phone_is_invalid_credentials() {
        let mut mock = MockUserRepository::new();
        mock.expect_get_by_phone().returning(|_| Ok(None));

        let service = UserService::new(mock);
        let result = service
            .login(LoginRequest {
                email: None,
                phone: Some("0123456789".to_string()),
                password: "hunter2".to_string(),
            })
            .await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_update_password_rehashes() {
        let user = stored_user("hunter2");
        let id = user.id;
        let mut mock = MockUserRepository::new();
        mock.expect_get_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(user.clone())));
        mock.expect_update()
            .withf(|user| verify_password("new-pass", &user.password_hash).unwrap())
            .returning(|user| Ok(Some(user)));

        let service = UserService::new(mock);
        service
            .update_password(
                id,
                PasswordUpdate {
                    password: "new-pass".to_string(),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_password_too_long_is_rejected() {
        let service = UserService::new(MockUserRepository::new());
        let result = service
            .update_password(
                Uuid::now_v7(),
                PasswordUpdate {
                    password: "sixteen-chars-xx".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let mut mock = MockUserRepository::new();
        mock.expect_delete().returning(|_| Ok(false));

        let service = UserService::new(mock);
        let result = service.delete_user(Uuid::now_v7()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }
}
