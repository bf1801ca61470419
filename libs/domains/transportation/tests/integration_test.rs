//! Integration tests for the MongoDB transport repository (needs Docker):
//! `cargo test -p domain_transportation -- --ignored`

use chrono::{Duration, Utc};
use domain_transportation::*;
use test_utils::{TestDataBuilder, TestMongo};

fn order(package_id: String) -> CreateOrder {
    CreateOrder {
        package_id,
        transportation_cost: None,
        status: None,
        products: vec![],
        start_location: None,
        current_location: None,
        destination: None,
        assigned_to: None,
        eta: Some(Utc::now() - Duration::hours(1)),
        transport_mode: TransportMode::Land,
    }
}

async fn repository(mongo: &TestMongo, name: &str) -> MongoTransportRepository {
    let repo = MongoTransportRepository::new(&mongo.database(name));
    repo.init_indexes().await.unwrap();
    repo
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_package_id_is_unique() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo, "package_unique").await;
    let builder = TestDataBuilder::from_test_name("package_unique");

    repo.create(Transport::new(order(builder.package_id()), OrderTotals::default()))
        .await
        .unwrap();
    let err = repo
        .create(Transport::new(order(builder.package_id()), OrderTotals::default()))
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::DuplicatePackage));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_overdue_and_status_queries() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo, "overdue").await;

    let late = repo
        .create(Transport::new(order("PKG-LATE".to_string()), OrderTotals::default()))
        .await
        .unwrap();
    let done = repo
        .create(Transport::new(order("PKG-DONE".to_string()), OrderTotals::default()))
        .await
        .unwrap();
    repo.update(
        done.id,
        TransportChanges {
            order: UpdateOrder {
                status: Some(TransportStatus::Delivered),
                ..Default::default()
            },
            totals: None,
        },
    )
    .await
    .unwrap();

    let overdue = repo.list_overdue(Utc::now()).await.unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].id, late.id);

    let delivered = repo.list_by_status(TransportStatus::Delivered).await.unwrap();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].id, done.id);
}
