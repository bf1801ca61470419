use chrono::{DateTime, Datelike, NaiveDate, Utc};
use domain_users::User;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Payroll record, one per user, refreshed on every calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Wage {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub user_id: Uuid,
    /// First day of the payroll month
    pub month: NaiveDate,
    pub hours_worked: f64,
    /// `wage_per_hour × hours_this_month`
    pub total_salary: f64,
    /// Mirrors the user's `extra_shift` flag
    #[serde(default)]
    pub overworked: bool,
    pub calculated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wage {
    pub fn salary(wage_per_hour: f64, hours_this_month: f64) -> f64 {
        wage_per_hour * hours_this_month
    }

    /// Fresh record for the user's current rate and hours
    pub fn for_user(user: &User, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id: user.id,
            month: month_start(now),
            hours_worked: user.hours_this_month,
            total_salary: Self::salary(user.wage_per_hour, user.hours_this_month),
            overworked: user.extra_shift,
            calculated_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Keeps the identity of an earlier record for the same user
    pub fn replacing(mut self, previous: &Wage) -> Self {
        self.id = previous.id;
        self.created_at = previous.created_at;
        self
    }
}

fn month_start(now: DateTime<Utc>) -> NaiveDate {
    let today = now.date_naive();
    NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today)
}

/// Query of `POST /wages/calculate`
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
pub struct CalculateQuery {
    #[validate(range(min = 0.0))]
    pub wage_per_hour: f64,
    #[validate(range(min = 0.0))]
    pub hours_this_month: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WageAmount {
    pub wage: f64,
}

/// Rate and hours written onto the user before recalculating
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_rate_update"))]
pub struct WageRateUpdate {
    #[validate(range(min = 0.0))]
    pub wage_per_hour: Option<f64>,
    #[validate(range(min = 0.0))]
    pub hours_this_month: Option<f64>,
}

fn validate_rate_update(input: &WageRateUpdate) -> Result<(), ValidationError> {
    if input.wage_per_hour.is_none() && input.hours_this_month.is_none() {
        return Err(ValidationError::new("empty_update")
            .with_message("At least one field must be updated".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use domain_users::{RegisterUser, Role};

    fn user(rate: f64, hours: f64) -> User {
        let mut user = User::new(
            RegisterUser {
                name: "Avery".to_string(),
                email: None,
                phone: Some("5551112222".to_string()),
                password: "pass".to_string(),
                role: Role::Staff,
            },
            "hash".to_string(),
        );
        user.wage_per_hour = rate;
        user.hours_this_month = hours;
        user
    }

    #[test]
    fn test_for_user_multiplies_rate_by_hours() {
        let now = Utc.with_ymd_and_hms(2024, 3, 17, 9, 30, 0).unwrap();
        let wage = Wage::for_user(&user(15.0, 120.0), now);

        assert_eq!(wage.total_salary, 1800.0);
        assert_eq!(wage.hours_worked, 120.0);
        assert_eq!(wage.month, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(!wage.overworked);
    }

    #[test]
    fn test_replacing_keeps_identity() {
        let first = Wage::for_user(&user(10.0, 1.0), Utc::now());
        let second = Wage::for_user(&user(10.0, 2.0), Utc::now()).replacing(&first);

        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(second.total_salary, 20.0);
    }

    #[test]
    fn test_rate_update_needs_a_field() {
        assert!(WageRateUpdate::default().validate().is_err());
        let update = WageRateUpdate {
            hours_this_month: Some(-1.0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
