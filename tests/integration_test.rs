//! Live tests against the AutoML API
//!
//! Run with `PROJECT_ID`, `REGION_NAME` and `GOOGLE_OAUTH_ACCESS_TOKEN` set
//! and `cargo test -- --ignored`.

use automl_video_datasets::{AutoMlClient, Config, Dataset, DatasetApi, Error, OperationWaiter};

/// Helper to create a client and config from environment variables
fn create_test_client() -> (AutoMlClient, Config) {
    let config = Config::from_env().expect("Failed to load config from environment");
    let client = AutoMlClient::from_config(&config).expect("Failed to create client");
    (client, config)
}

#[tokio::test]
#[ignore = "requires AutoML API credentials"]
async fn test_dataset_lifecycle() {
    let (client, config) = create_test_client();
    let location = config.location();
    let display_name = format!("it_{}", chrono::Utc::now().format("%Y%m%d%H%M%S"));

    let created = client
        .create_dataset(&location, &Dataset::video_classification(&display_name))
        .await
        .expect("Failed to create dataset");
    assert_eq!(created.display_name, display_name);
    assert!(!created.id().is_empty(), "Dataset ID should not be empty");

    let fetched = client
        .get_dataset(&location.dataset(created.id()))
        .await
        .expect("Failed to get dataset");
    assert_eq!(fetched.name, created.name);

    let listed = client
        .list_datasets()
        .location(location.clone())
        .filter("videoClassificationDatasetMetadata:*")
        .call()
        .collect_all()
        .await
        .expect("Failed to list datasets");
    assert!(listed.iter().any(|d| d.name == created.name));

    let operation = client
        .delete_dataset(&location.dataset(created.id()))
        .await
        .expect("Failed to delete dataset");
    OperationWaiter::new(client.poll_interval())
        .wait(&client, operation)
        .await
        .expect("Delete operation failed");
}

#[tokio::test]
#[ignore = "requires AutoML API credentials"]
async fn test_get_missing_dataset() {
    let (client, config) = create_test_client();

    let result = client
        .get_dataset(&config.location().dataset("VCN0000000000000000000"))
        .await;

    assert!(
        matches!(result, Err(Error::NotFound { .. }) | Err(Error::Client { .. })),
        "unexpected result: {:?}",
        result
    );
}
