//! Dataset management: create, list, get, import data, delete
//!
//! [`DatasetApi`] is the set of remote calls the command layer needs.
//! [`AutoMlClient`] implements it over HTTP; tests substitute their own.

use async_trait::async_trait;
use bon::bon;
use reqwest::Method;
use std::collections::VecDeque;
use std::time::Duration;

use crate::client::{AutoMlClient, DEFAULT_POLL_INTERVAL};
use crate::error::Result;
use crate::resource::{DatasetName, LocationName};
use crate::types::{Dataset, DatasetPage, ImportDataRequest, InputConfig, ListDatasetsRequest, Operation};

/// Remote dataset calls. Each method is exactly one request.
#[async_trait]
pub trait DatasetApi: Send + Sync {
    /// Create a dataset in `location`
    async fn create_dataset(&self, location: &LocationName, dataset: &Dataset) -> Result<Dataset>;

    /// Fetch one page of datasets in `location`
    async fn list_datasets_page(
        &self,
        location: &LocationName,
        request: &ListDatasetsRequest,
    ) -> Result<DatasetPage>;

    /// Fetch a dataset; fails with `NotFound` when it does not exist
    async fn get_dataset(&self, name: &DatasetName) -> Result<Dataset>;

    /// Start importing data into a dataset
    async fn import_data(&self, name: &DatasetName, input_config: &InputConfig) -> Result<Operation>;

    /// Start deleting a dataset
    async fn delete_dataset(&self, name: &DatasetName) -> Result<Operation>;

    /// Fetch the current state of a long-running operation
    async fn get_operation(&self, name: &str) -> Result<Operation>;

    /// Delay before the first poll of a long-running operation
    fn poll_interval(&self) -> Duration {
        DEFAULT_POLL_INTERVAL
    }
}

#[async_trait]
impl DatasetApi for AutoMlClient {
    async fn create_dataset(&self, location: &LocationName, dataset: &Dataset) -> Result<Dataset> {
        let request = self
            .request(Method::POST, &format!("{}/datasets", location))
            .json(dataset);
        let created: Dataset = self.send(request).await?;
        tracing::info!(name = %created.name, "Created dataset");
        Ok(created)
    }

    async fn list_datasets_page(
        &self,
        location: &LocationName,
        request: &ListDatasetsRequest,
    ) -> Result<DatasetPage> {
        let builder = self
            .request(Method::GET, &format!("{}/datasets", location))
            .query(request);
        self.send(builder).await
    }

    async fn get_dataset(&self, name: &DatasetName) -> Result<Dataset> {
        self.send(self.request(Method::GET, &name.to_string())).await
    }

    async fn import_data(&self, name: &DatasetName, input_config: &InputConfig) -> Result<Operation> {
        let request = self
            .request(Method::POST, &format!("{}:importData", name))
            .json(&ImportDataRequest { input_config });
        let operation: Operation = self.send(request).await?;
        tracing::info!(operation = %operation.name, dataset = %name, "Import started");
        Ok(operation)
    }

    async fn delete_dataset(&self, name: &DatasetName) -> Result<Operation> {
        let operation: Operation = self
            .send(self.request(Method::DELETE, &name.to_string()))
            .await?;
        tracing::info!(operation = %operation.name, dataset = %name, "Delete started");
        Ok(operation)
    }

    async fn get_operation(&self, name: &str) -> Result<Operation> {
        self.send(self.request(Method::GET, name)).await
    }

    fn poll_interval(&self) -> Duration {
        AutoMlClient::poll_interval(self)
    }
}

#[bon]
impl AutoMlClient {
    /// List datasets in a location, fetching pages lazily
    #[builder]
    pub fn list_datasets<'a>(
        &'a self,
        location: LocationName,
        #[builder(into)] filter: Option<String>,
        page_size: Option<i32>,
    ) -> DatasetPager<'a, Self> {
        let pager = DatasetPager::new(self, location, filter.unwrap_or_default());
        match page_size {
            Some(size) => pager.page_size(size),
            None => pager,
        }
    }
}

/// Lazy, one-shot sequence of the datasets matching a listing.
///
/// Pages are requested only when the buffered datasets run out; the sequence
/// ends after the page with an empty `nextPageToken`.
pub struct DatasetPager<'a, A: DatasetApi + ?Sized> {
    api: &'a A,
    location: LocationName,
    request: ListDatasetsRequest,
    buffer: VecDeque<Dataset>,
    exhausted: bool,
    pages_fetched: usize,
}

impl<'a, A: DatasetApi + ?Sized> DatasetPager<'a, A> {
    /// Create a pager; nothing is fetched until the first [`DatasetPager::next`]
    pub fn new(api: &'a A, location: LocationName, filter: impl Into<String>) -> Self {
        Self {
            api,
            location,
            request: ListDatasetsRequest {
                filter: filter.into(),
                ..Default::default()
            },
            buffer: VecDeque::new(),
            exhausted: false,
            pages_fetched: 0,
        }
    }

    /// Ask the service for at most `size` datasets per page
    pub fn page_size(mut self, size: i32) -> Self {
        self.request.page_size = Some(size);
        self
    }

    /// Number of list calls made so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Next dataset, or `None` once the listing is exhausted
    pub async fn next(&mut self) -> Result<Option<Dataset>> {
        loop {
            if let Some(dataset) = self.buffer.pop_front() {
                return Ok(Some(dataset));
            }
            if self.exhausted {
                return Ok(None);
            }

            let page = self
                .api
                .list_datasets_page(&self.location, &self.request)
                .await?;
            self.pages_fetched += 1;
            tracing::debug!(
                page = self.pages_fetched,
                datasets = page.datasets.len(),
                "Fetched dataset page"
            );

            if page.next_page_token.is_empty() {
                self.exhausted = true;
            } else {
                self.request.page_token = Some(page.next_page_token);
            }
            self.buffer.extend(page.datasets);
        }
    }

    /// Drain the remaining datasets into a vector
    pub async fn collect_all(mut self) -> Result<Vec<Dataset>> {
        let mut datasets = Vec::new();
        while let Some(dataset) = self.next().await? {
            datasets.push(dataset);
        }
        Ok(datasets)
    }
}
