//! Wire types of the AutoML v1beta1 REST API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resource::last_segment;

/// Video classification dataset metadata. The service defines no fields for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoClassificationDatasetMetadata {}

/// A dataset as returned by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Full resource name; empty in create requests
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub example_count: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_classification_dataset_metadata: Option<VideoClassificationDatasetMetadata>,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl Dataset {
    /// Descriptor for a new video classification dataset
    pub fn video_classification(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            video_classification_dataset_metadata: Some(VideoClassificationDatasetMetadata {}),
            ..Default::default()
        }
    }

    /// Dataset id, the last segment of [`Dataset::name`]
    pub fn id(&self) -> &str {
        last_segment(&self.name)
    }

    /// Creation time as `(seconds, nanos)` since the Unix epoch.
    /// An absent timestamp reads as `(0, 0)`.
    pub fn create_time_parts(&self) -> (i64, u32) {
        self.create_time
            .map(|t| (t.timestamp(), t.timestamp_subsec_nanos()))
            .unwrap_or((0, 0))
    }
}

/// Cloud Storage source of an import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcsSource {
    pub input_uris: Vec<String>,
}

/// Where an import reads its data from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputConfig {
    pub gcs_source: GcsSource,
}

impl InputConfig {
    /// Import from the given Cloud Storage URIs
    pub fn gcs(input_uris: Vec<String>) -> Self {
        Self {
            gcs_source: GcsSource { input_uris },
        }
    }

    /// Build from a comma-separated list of URIs, keeping order and every piece
    pub fn from_comma_separated(uris: &str) -> Self {
        Self::gcs(split_input_uris(uris))
    }
}

/// Split a comma-separated URI list. Pieces are not trimmed or filtered.
pub fn split_input_uris(uris: &str) -> Vec<String> {
    uris.split(',').map(str::to_string).collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImportDataRequest<'a> {
    pub input_config: &'a InputConfig,
}

/// Query of one `datasets.list` call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDatasetsRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

/// One page of a dataset listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetPage {
    #[serde(default)]
    pub datasets: Vec<Dataset>,
    /// Empty on the last page
    #[serde(default)]
    pub next_page_token: String,
}

/// `google.rpc.Status`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<Value>,
}

/// Handle of a long-running operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}
