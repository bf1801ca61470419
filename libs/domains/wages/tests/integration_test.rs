//! MongoDB wage repository tests. Need Docker: `cargo test -p domain_wages -- --ignored`

use chrono::Utc;
use domain_users::{RegisterUser, Role, User};
use domain_wages::*;
use test_utils::TestMongo;

fn user(hours: f64, extra_shift: bool) -> User {
    let mut user = User::new(
        RegisterUser {
            name: "Payroll".to_string(),
            email: None,
            phone: Some("5553334444".to_string()),
            password: "pass".to_string(),
            role: Role::Staff,
        },
        "hash".to_string(),
    );
    user.wage_per_hour = 10.0;
    user.hours_this_month = hours;
    user.extra_shift = extra_shift;
    user
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_upsert_keeps_one_record_per_user() {
    let mongo = TestMongo::new().await;
    let repo = MongoWageRepository::new(&mongo.database("wages_upsert"));
    repo.init_indexes().await.unwrap();

    let staff = user(10.0, false);
    let first = repo
        .upsert_for_user(Wage::for_user(&staff, Utc::now()))
        .await
        .unwrap();

    let mut busier = staff.clone();
    busier.hours_this_month = 30.0;
    busier.extra_shift = true;
    let second = repo
        .upsert_for_user(Wage::for_user(&busier, Utc::now()))
        .await
        .unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(repo.list().await.unwrap().len(), 1);
    assert_eq!(
        repo.get_by_user(staff.id).await.unwrap().unwrap().total_salary,
        300.0
    );
    assert_eq!(repo.list_overworked().await.unwrap().len(), 1);
}
