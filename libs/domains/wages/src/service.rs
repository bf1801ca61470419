//! Payroll calculation over user rate and hours

use chrono::Utc;
use domain_users::{AdminUpdateUser, User, UserRepository, UserService};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{WageError, WageResult};
use crate::models::{CalculateQuery, Wage, WageRateUpdate};
use crate::repository::WageRepository;

pub struct WageService<W: WageRepository, U: UserRepository> {
    repository: Arc<W>,
    users: UserService<U>,
}

impl<W: WageRepository, U: UserRepository> Clone for WageService<W, U> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            users: self.users.clone(),
        }
    }
}

impl<W: WageRepository, U: UserRepository> WageService<W, U> {
    pub fn new(repository: W, users: UserService<U>) -> Self {
        Self {
            repository: Arc::new(repository),
            users,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_wages(&self) -> WageResult<Vec<Wage>> {
        self.repository.list().await
    }

    /// Pure calculation, nothing is stored
    pub fn calculate(&self, query: &CalculateQuery) -> WageResult<f64> {
        query
            .validate()
            .map_err(|e| WageError::Validation(e.to_string()))?;
        Ok(Wage::salary(query.wage_per_hour, query.hours_this_month))
    }

    async fn record(&self, user: &User) -> WageResult<Wage> {
        let wage = self
            .repository
            .upsert_for_user(Wage::for_user(user, Utc::now()))
            .await?;
        tracing::info!(user_id = %user.id, total_salary = wage.total_salary, "Wage calculated");
        Ok(wage)
    }

    /// Recomputes the user's wage from their current rate and hours and stores it
    #[instrument(skip(self))]
    pub async fn user_wage(&self, user_id: Uuid) -> WageResult<Wage> {
        let user = self.users.get_user(user_id).await?;
        self.record(&user).await
    }

    /// Wages of every user flagged `extra_shift`, recalculated
    #[instrument(skip(self))]
    pub async fn overworked(&self) -> WageResult<Vec<Wage>> {
        let users = self.users.list_extra_shift().await?;
        let mut wages = Vec::with_capacity(users.len());
        for user in &users {
            wages.push(self.record(user).await?);
        }
        Ok(wages)
    }

    /// Writes rate and hours onto the user, then recalculates
    #[instrument(skip(self, input))]
    pub async fn update_rate(&self, user_id: Uuid, input: WageRateUpdate) -> WageResult<Wage> {
        input
            .validate()
            .map_err(|e| WageError::Validation(e.to_string()))?;

        let user = self
            .users
            .admin_update(
                user_id,
                AdminUpdateUser {
                    wage_per_hour: input.wage_per_hour,
                    hours_this_month: input.hours_this_month,
                    ..Default::default()
                },
            )
            .await?;
        self.record(&user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockWageRepository;
    use domain_users::{InMemoryUserRepository, RegisterUser, Role};

    async fn seeded_users(rate: f64, hours: f64, extra_shift: bool) -> (UserService<InMemoryUserRepository>, Uuid) {
        let users = UserService::new(InMemoryUserRepository::new());
        let user = users
            .register(RegisterUser {
                name: "Quinn".to_string(),
                email: Some("quinn@depot.io".to_string()),
                phone: None,
                password: "pass".to_string(),
                role: Role::Staff,
            })
            .await
            .unwrap();
        users
            .admin_update(
                user.id,
                AdminUpdateUser {
                    wage_per_hour: Some(rate),
                    hours_this_month: Some(hours),
                    extra_shift: Some(extra_shift),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        (users, user.id)
    }

    #[tokio::test]
    async fn test_user_wage_persists_product_of_rate_and_hours() {
        let (users, id) = seeded_users(20.0, 40.0, false).await;
        let mut mock = MockWageRepository::new();
        mock.expect_upsert_for_user()
            .withf(move |wage| wage.user_id == id && wage.total_salary == 800.0)
            .times(1)
            .returning(|wage| Ok(wage));

        let service = WageService::new(mock, users);
        let wage = service.user_wage(id).await.unwrap();
        assert_eq!(wage.total_salary, 800.0);
    }

    #[tokio::test]
    async fn test_user_wage_for_unknown_user() {
        let users = UserService::new(InMemoryUserRepository::new());
        let service = WageService::new(MockWageRepository::new(), users);

        let result = service.user_wage(Uuid::now_v7()).await;
        assert!(matches!(result, Err(WageError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_calculate_rejects_negative_hours() {
        let users = UserService::new(InMemoryUserRepository::new());
        let service = WageService::new(MockWageRepository::new(), users);

        let query = CalculateQuery {
            wage_per_hour: 10.0,
            hours_this_month: -2.0,
        };
        assert!(matches!(service.calculate(&query), Err(WageError::Validation(_))));

        let query = CalculateQuery {
            wage_per_hour: 12.5,
            hours_this_month: 8.0,
        };
        assert_eq!(service.calculate(&query).unwrap(), 100.0);
    }

    #[tokio::test]
    async fn test_overworked_only_covers_flagged_users() {
        let (users, id) = seeded_users(10.0, 200.0, true).await;
        users
            .register(RegisterUser {
                name: "Rested".to_string(),
                email: Some("rested@depot.io".to_string()),
                phone: None,
                password: "pass".to_string(),
                role: Role::Staff,
            })
            .await
            .unwrap();

        let mut mock = MockWageRepository::new();
        mock.expect_upsert_for_user()
            .times(1)
            .returning(|wage| Ok(wage));

        let service = WageService::new(mock, users);
        let wages = service.overworked().await.unwrap();
        assert_eq!(wages.len(), 1);
        assert_eq!(wages[0].user_id, id);
        assert!(wages[0].overworked);
    }
}
