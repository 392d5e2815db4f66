//! Resource names for AutoML locations and datasets

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A project/region pair: `projects/{project_id}/locations/{region}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationName {
    pub project_id: String,
    pub region: String,
}

impl LocationName {
    /// Create a location name from its project and region
    pub fn new(project_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            region: region.into(),
        }
    }

    /// Name of a dataset living in this location
    pub fn dataset(&self, dataset_id: impl Into<String>) -> DatasetName {
        DatasetName {
            project_id: self.project_id.clone(),
            region: self.region.clone(),
            dataset_id: dataset_id.into(),
        }
    }
}

impl fmt::Display for LocationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projects/{}/locations/{}", self.project_id, self.region)
    }
}

/// Fully-qualified dataset name:
/// `projects/{project_id}/locations/{region}/datasets/{dataset_id}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetName {
    pub project_id: String,
    pub region: String,
    pub dataset_id: String,
}

impl DatasetName {
    /// Create a dataset name from its three components
    pub fn new(
        project_id: impl Into<String>,
        region: impl Into<String>,
        dataset_id: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            region: region.into(),
            dataset_id: dataset_id.into(),
        }
    }

    /// Dataset id, the last path segment
    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    /// Location the dataset belongs to
    pub fn location(&self) -> LocationName {
        LocationName::new(self.project_id.clone(), self.region.clone())
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/datasets/{}", self.location(), self.dataset_id)
    }
}

impl FromStr for DatasetName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            ["projects", project, "locations", region, "datasets", dataset]
                if !project.is_empty() && !region.is_empty() && !dataset.is_empty() =>
            {
                Ok(DatasetName::new(*project, *region, *dataset))
            }
            _ => Err(Error::Validation(format!(
                "'{}' is not a dataset name of the form projects/*/locations/*/datasets/*",
                s
            ))),
        }
    }
}

/// Last `/`-separated segment of a resource name
pub fn last_segment(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_location_name_format() {
        let location = LocationName::new("my-project", "us-central1");
        assert_eq!(
            location.to_string(),
            "projects/my-project/locations/us-central1"
        );
    }

    #[test]
    fn test_dataset_name_format() {
        let name = DatasetName::new("my-project", "us-central1", "VCN123");
        assert_eq!(
            name.to_string(),
            "projects/my-project/locations/us-central1/datasets/VCN123"
        );
        assert_eq!(
            LocationName::new("my-project", "us-central1").dataset("VCN123"),
            name
        );
    }

    #[test]
    fn test_dataset_name_parse() {
        let name: DatasetName = "projects/p/locations/eu/datasets/VCN9".parse().unwrap();
        assert_eq!(name.project_id, "p");
        assert_eq!(name.region, "eu");
        assert_eq!(name.dataset_id(), "VCN9");
        assert_eq!(name.location(), LocationName::new("p", "eu"));
    }

    #[test]
    fn test_dataset_name_parse_rejects_other_shapes() {
        for bad in [
            "",
            "VCN9",
            "projects/p/locations/eu",
            "projects/p/locations/eu/models/TVN1",
            "projects//locations/eu/datasets/VCN9",
            "projects/p/locations/eu/datasets/VCN9/extra",
        ] {
            assert!(bad.parse::<DatasetName>().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("projects/p/locations/r/datasets/VCN1"), "VCN1");
        assert_eq!(last_segment("VCN1"), "VCN1");
        assert_eq!(last_segment(""), "");
    }
}
