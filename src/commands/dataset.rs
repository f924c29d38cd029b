use clap::Subcommand;
use clowder::api::types::NewDataset;
use clowder::api::ClowderClient;
use clowder::resolve::Target;
use tracing::warn;

use super::lines;
use super::metadata::{self, MetadataAction};

#[derive(Subcommand)]
pub enum DatasetCommand {
    /// List all datasets
    List {
        /// Space to list (accepted, not applied)
        #[arg(long)]
        space: Option<String>,

        /// Collection to list (accepted, not applied)
        #[arg(long)]
        collection: Option<String>,
    },

    /// Create an empty dataset and print its id
    Add {
        dataset_name: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Parent collection id
        #[arg(long)]
        collection: Option<String>,

        /// Space id
        #[arg(long)]
        space: Option<String>,
    },

    /// Delete the dataset with this name
    Delete { dataset_name: String },

    /// Manage dataset metadata
    Metadata {
        #[command(subcommand)]
        command: DatasetMetadataCommand,
    },
}

#[derive(Subcommand)]
pub enum DatasetMetadataCommand {
    /// List metadata documents on a dataset
    List {
        dataset_name: String,

        /// Only documents contributed by this extractor
        #[arg(long)]
        extractor: Option<String>,
    },

    /// Attach key=value pairs as one metadata document
    Add {
        dataset_name: String,

        #[arg(required = true, value_name = "KEY=VALUE")]
        pairs: Vec<String>,
    },

    /// Delete metadata; without --extractor ALL metadata on the dataset is removed
    Delete {
        dataset_name: String,

        #[arg(long)]
        extractor: Option<String>,
    },
}

impl DatasetMetadataCommand {
    fn split(self) -> (String, MetadataAction) {
        match self {
            Self::List {
                dataset_name,
                extractor,
            } => (dataset_name, MetadataAction::List { extractor }),
            Self::Add {
                dataset_name,
                pairs,
            } => (dataset_name, MetadataAction::Add { pairs }),
            Self::Delete {
                dataset_name,
                extractor,
            } => (dataset_name, MetadataAction::Delete { extractor }),
        }
    }
}

pub async fn run(client: &ClowderClient, command: DatasetCommand) -> anyhow::Result<()> {
    match command {
        DatasetCommand::List { space, collection } => {
            if space.is_some() || collection.is_some() {
                warn!(?space, ?collection, "dataset filters are not applied, listing all datasets");
            }
            let datasets = client.list_datasets().await?;
            print!("{}", lines(datasets.iter().map(|d| d.name.as_str())));
        }
        DatasetCommand::Add {
            dataset_name,
            description,
            collection,
            space,
        } => {
            let id = client
                .create_dataset(&NewDataset {
                    name: dataset_name,
                    description,
                    collection,
                    space,
                })
                .await?;
            println!("{}", id);
        }
        DatasetCommand::Delete { dataset_name } => {
            client.delete_by_name(Target::Dataset(&dataset_name)).await?;
        }
        DatasetCommand::Metadata { command } => {
            let (dataset_name, action) = command.split();
            metadata::run(client, Target::Dataset(&dataset_name), action).await?;
        }
    }
    Ok(())
}
