//! Integration tests: the mock services used through the trait object the
//! stores hold.

use std::sync::Arc;
use std::time::Duration;

use backoffice_core::{Product, User};
use backoffice_data::{
    DataError, Latency, MockProductService, MockUserService, RecordService,
};
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn services_work_behind_dyn_trait() {
    let users: Arc<dyn RecordService<User>> = Arc::new(MockUserService::new(Latency::default()));
    let products: Arc<dyn RecordService<Product>> =
        Arc::new(MockProductService::new(Latency::default()));

    let start = Instant::now();
    let (u, p) = tokio::join!(users.get_all(), products.get_all());
    // Both requests run concurrently, so the wait is one latency, not two.
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(1000));
    assert!(elapsed < Duration::from_millis(2000));

    assert_eq!(u.unwrap().len(), 5);
    assert_eq!(p.unwrap().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn get_by_id_and_delete_latency() {
    let products = MockProductService::new(Latency::default());

    let start = Instant::now();
    let err = products.get_by_id("p404").await.unwrap_err();
    assert!(matches!(err, DataError::NotFound { .. }));
    assert!(start.elapsed() >= Duration::from_millis(300));

    let start = Instant::now();
    products.delete("p1").await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn uniform_latency_from_config() {
    let latency = Latency::uniform(Duration::from_millis(5));
    let users = MockUserService::new(latency);
    assert_eq!(users.latency().create, Duration::from_millis(5));
    assert_eq!(users.get_by_id("u5").await.unwrap().name, "T-800 Unit");
}
