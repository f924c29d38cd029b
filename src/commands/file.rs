use std::path::PathBuf;

use clap::Subcommand;
use clowder::api::files::AddFileOutcome;
use clowder::api::ClowderClient;
use clowder::resolve::Target;

use super::lines;
use super::metadata::{self, MetadataAction};

#[derive(Subcommand)]
pub enum FileCommand {
    /// List all files in a dataset
    List { dataset_name: String },

    /// Upload a local file into a dataset and print the new file id
    Add {
        dataset_name: String,

        /// Local file to upload
        file_path: PathBuf,

        /// Skip the upload if the dataset already has a file with this name
        #[arg(long)]
        check_duplicate: bool,
    },

    /// Delete a file from a dataset
    Delete {
        dataset_name: String,
        file_name: String,
    },

    /// Manage file metadata
    Metadata {
        #[command(subcommand)]
        command: FileMetadataCommand,
    },
}

#[derive(Subcommand)]
pub enum FileMetadataCommand {
    /// List metadata documents on a file
    List {
        dataset_name: String,
        file_name: String,

        /// Only documents contributed by this extractor
        #[arg(long)]
        extractor: Option<String>,
    },

    /// Attach key=value pairs as one metadata document
    Add {
        dataset_name: String,
        file_name: String,

        #[arg(required = true, value_name = "KEY=VALUE")]
        pairs: Vec<String>,
    },

    /// Delete metadata; without --extractor ALL metadata on the file is removed
    Delete {
        dataset_name: String,
        file_name: String,

        #[arg(long)]
        extractor: Option<String>,
    },
}

impl FileMetadataCommand {
    fn split(self) -> (String, String, MetadataAction) {
        match self {
            Self::List {
                dataset_name,
                file_name,
                extractor,
            } => (dataset_name, file_name, MetadataAction::List { extractor }),
            Self::Add {
                dataset_name,
                file_name,
                pairs,
            } => (dataset_name, file_name, MetadataAction::Add { pairs }),
            Self::Delete {
                dataset_name,
                file_name,
                extractor,
            } => (dataset_name, file_name, MetadataAction::Delete { extractor }),
        }
    }
}

pub async fn run(client: &ClowderClient, command: FileCommand) -> anyhow::Result<()> {
    match command {
        FileCommand::List { dataset_name } => {
            let files = client.list_files(&dataset_name).await?;
            print!("{}", lines(files.iter().map(|f| f.filename.as_str())));
        }
        FileCommand::Add {
            dataset_name,
            file_path,
            check_duplicate,
        } => match client
            .add_file(&dataset_name, &file_path, check_duplicate)
            .await?
        {
            AddFileOutcome::Uploaded { id } => println!("{}", id),
            AddFileOutcome::Skipped { existing_id } => {
                println!("skipped, already present as {}", existing_id)
            }
        },
        FileCommand::Delete {
            dataset_name,
            file_name,
        } => {
            client
                .delete_by_name(Target::File {
                    dataset: &dataset_name,
                    file: &file_name,
                })
                .await?;
        }
        FileCommand::Metadata { command } => {
            let (dataset_name, file_name, action) = command.split();
            let target = Target::File {
                dataset: &dataset_name,
                file: &file_name,
            };
            metadata::run(client, target, action).await?;
        }
    }
    Ok(())
}
