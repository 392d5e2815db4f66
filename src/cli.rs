//! Command-line surface: argument parsing and command dispatch
//!
//! Every subcommand issues exactly one [`DatasetApi`] call. Import and delete
//! then wait on the returned operation before reporting.

use clap::{ArgAction, Parser, Subcommand};
use std::io::Write;

use crate::client::AutoMlClient;
use crate::config::Config;
use crate::datasets::{DatasetApi, DatasetPager};
use crate::error::Result;
use crate::operations::{OperationReport, OperationWaiter};
use crate::output::write_dataset;
use crate::resource::LocationName;
use crate::types::{Dataset, InputConfig};

/// Basic operations on Cloud AutoML video classification datasets.
///
/// Requires the PROJECT_ID and REGION_NAME environment variables.
#[derive(Debug, Parser)]
#[command(version, about, long_about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Override the API endpoint (default: $AUTOML_ENDPOINT or https://automl.googleapis.com)
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create a dataset.
    #[command(name = "create_dataset")]
    CreateDataset { dataset_name: String },

    /// List all datasets.
    #[command(name = "list_datasets")]
    ListDatasets {
        #[arg(value_name = "FILTER_")]
        filter: String,
    },

    /// Get the dataset.
    #[command(name = "get_dataset")]
    GetDataset { dataset_id: String },

    /// Import labeled videos.
    #[command(name = "import_data")]
    ImportData {
        dataset_id: String,
        /// Comma-separated Cloud Storage URIs of the CSV files to import
        path: String,
    },

    /// Delete a dataset.
    #[command(name = "delete_dataset")]
    DeleteDataset { dataset_id: String },
}

impl Command {
    /// Subcommand name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateDataset { .. } => "create_dataset",
            Command::ListDatasets { .. } => "list_datasets",
            Command::GetDataset { .. } => "get_dataset",
            Command::ImportData { .. } => "import_data",
            Command::DeleteDataset { .. } => "delete_dataset",
        }
    }
}

/// Log level used when `RUST_LOG` is not set
pub fn default_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Load the configuration through `lookup`, build the HTTP client and run the
/// parsed command.
///
/// Configuration errors are returned before any request is made.
pub async fn execute<F, W>(args: Cli, lookup: F, out: &mut W) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    W: Write + ?Sized,
{
    let mut config = Config::from_lookup(lookup)?;
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }

    let client = AutoMlClient::from_config(&config)?;
    tracing::debug!(endpoint = %client.base_url(), location = %config.location(), "Running command");

    run(&client, &config.location(), args.command, out).await
}

/// Run one command against `api`, writing its report to `out`
pub async fn run<A, W>(api: &A, location: &LocationName, command: Command, out: &mut W) -> Result<()>
where
    A: DatasetApi + ?Sized,
    W: Write + ?Sized,
{
    let waiter = OperationWaiter::new(api.poll_interval());

    match command {
        Command::CreateDataset { dataset_name } => {
            create_dataset(api, location, &dataset_name, out).await?;
        }
        Command::ListDatasets { filter } => {
            list_datasets(api, location, &filter, out).await?;
        }
        Command::GetDataset { dataset_id } => {
            get_dataset(api, location, &dataset_id, out).await?;
        }
        Command::ImportData { dataset_id, path } => {
            import_data(api, &waiter, location, &dataset_id, &path, out).await?;
        }
        Command::DeleteDataset { dataset_id } => {
            delete_dataset(api, &waiter, location, &dataset_id, out).await?;
        }
    }

    Ok(())
}

/// Create a video classification dataset and print it
pub async fn create_dataset<A, W>(
    api: &A,
    location: &LocationName,
    dataset_name: &str,
    out: &mut W,
) -> Result<Dataset>
where
    A: DatasetApi + ?Sized,
    W: Write + ?Sized,
{
    let dataset = api
        .create_dataset(location, &Dataset::video_classification(dataset_name))
        .await?;
    write_dataset(out, &dataset)?;
    Ok(dataset)
}

/// Print every dataset matching `filter` as it arrives. Returns how many were printed.
pub async fn list_datasets<A, W>(
    api: &A,
    location: &LocationName,
    filter: &str,
    out: &mut W,
) -> Result<usize>
where
    A: DatasetApi + ?Sized,
    W: Write + ?Sized,
{
    let mut pager = DatasetPager::new(api, location.clone(), filter);
    let mut count = 0;

    writeln!(out, "List of datasets:")?;
    while let Some(dataset) = pager.next().await? {
        write_dataset(out, &dataset)?;
        count += 1;
    }
    Ok(count)
}

/// Fetch one dataset and print it
pub async fn get_dataset<A, W>(
    api: &A,
    location: &LocationName,
    dataset_id: &str,
    out: &mut W,
) -> Result<Dataset>
where
    A: DatasetApi + ?Sized,
    W: Write + ?Sized,
{
    let dataset = api.get_dataset(&location.dataset(dataset_id)).await?;
    write_dataset(out, &dataset)?;
    Ok(dataset)
}

/// Import the comma-separated `path` URIs and wait for the import to finish
pub async fn import_data<A, W>(
    api: &A,
    waiter: &OperationWaiter,
    location: &LocationName,
    dataset_id: &str,
    path: &str,
    out: &mut W,
) -> Result<OperationReport>
where
    A: DatasetApi + ?Sized,
    W: Write + ?Sized,
{
    let name = location.dataset(dataset_id);
    let input_config = InputConfig::from_comma_separated(path);

    let operation = api.import_data(&name, &input_config).await?;

    writeln!(out, "Processing import...")?;
    out.flush()?;

    let report = waiter.wait(api, operation).await?;
    writeln!(out, "Data imported. {}", report)?;
    Ok(report)
}

/// Delete a dataset and wait for the deletion to finish
pub async fn delete_dataset<A, W>(
    api: &A,
    waiter: &OperationWaiter,
    location: &LocationName,
    dataset_id: &str,
    out: &mut W,
) -> Result<OperationReport>
where
    A: DatasetApi + ?Sized,
    W: Write + ?Sized,
{
    let operation = api.delete_dataset(&location.dataset(dataset_id)).await?;
    let report = waiter.wait(api, operation).await?;
    writeln!(out, "Dataset deleted. {}", report)?;
    Ok(report)
}
