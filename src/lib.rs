//! Client for Cloud AutoML video classification datasets
//!
//! This crate wraps the dataset calls of the AutoML v1beta1 REST API (create,
//! list, get, import data, delete) behind a typed async client built with
//! `bon` builders, and ships a small CLI on top of it.
//!
//! ```no_run
//! use automl_video_datasets::{AutoMlClient, LocationName};
//!
//! # async fn example() -> automl_video_datasets::Result<()> {
//! let client = AutoMlClient::from_env()?;
//! let location = LocationName::new("my-project", "us-central1");
//!
//! let mut datasets = client.list_datasets().location(location).call();
//! while let Some(dataset) = datasets.next().await? {
//!     println!("{} ({})", dataset.display_name, dataset.id());
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod datasets;
pub mod error;
pub mod operations;
pub mod output;
pub mod resource;
pub mod security;
pub mod types;

pub use auth::{ServiceAccountProvider, StaticToken, TokenProvider};
pub use client::AutoMlClient;
pub use config::Config;
pub use datasets::{DatasetApi, DatasetPager};
pub use error::{Error, Result};
pub use operations::{OperationReport, OperationWaiter};
pub use resource::{DatasetName, LocationName};
pub use security::SecretString;
pub use types::{Dataset, DatasetPage, InputConfig, ListDatasetsRequest, Operation, Status};
