mod dataset;
mod file;
mod metadata;

use clap::Subcommand;
use clowder::api::ClowderClient;

pub use dataset::DatasetCommand;
pub use file::FileCommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Create, list and delete datasets, and manage their metadata
    Dataset {
        #[command(subcommand)]
        command: DatasetCommand,
    },

    /// Upload, list and delete files in a dataset, and manage their metadata
    File {
        #[command(subcommand)]
        command: FileCommand,
    },
}

pub async fn run(client: &ClowderClient, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Dataset { command } => dataset::run(client, command).await,
        Commands::File { command } => file::run(client, command).await,
    }
}

/// One entry per line, or nothing at all for an empty listing.
fn lines<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut output = String::new();
    for item in items {
        output.push_str(item.as_ref());
        output.push('\n');
    }
    output
}
