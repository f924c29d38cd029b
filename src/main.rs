mod commands;

use std::path::PathBuf;

use clap::{Args, Parser};
use tracing::{info, Level};

use clowder::config::ConfigOverrides;
use clowder::{ClientConfig, ClowderClient, ClowderError};
use commands::Commands;

#[derive(Parser)]
#[command(name = "clowder")]
#[command(about = "Command-line client for the Clowder data management service")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConnectionArgs {
    /// URL of Clowder host (Env: CLOWDER_HOST or CLOWDER_URL)
    #[arg(long = "clowder-url")]
    url: Option<String>,

    /// Clowder login (Env: CLOWDER_LOGIN)
    #[arg(long = "clowder-login")]
    login: Option<String>,

    /// Clowder password (Env: CLOWDER_PASSWORD)
    #[arg(long = "clowder-password")]
    password: Option<String>,

    /// API key, instead of login/password (Env: CLOWDER_KEY)
    #[arg(long = "clowder-key")]
    key: Option<String>,

    /// Directory the Clowder server can read directly; files under it are
    /// uploaded by path (Env: CLOWDER_LOCAL_PATHS, comma separated)
    #[arg(long = "local-path")]
    local_paths: Vec<PathBuf>,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure: bool,
}

impl From<ConnectionArgs> for ConfigOverrides {
    fn from(args: ConnectionArgs) -> Self {
        ConfigOverrides {
            url: args.url,
            login: args.login,
            password: args.password,
            key: args.key,
            local_paths: args.local_paths,
            insecure: args.insecure,
        }
    }
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env(cli.connection.into())?;
    info!(url = %config.url, auth = ?config.auth, "Clowder client configured");
    let client = ClowderClient::new(config)?;

    let result = commands::run(&client, cli.command).await;
    if let Err(e) = &result {
        if e.downcast_ref::<ClowderError>()
            .is_some_and(ClowderError::is_unauthorized)
        {
            eprintln!("operation not authorized, check login/password or key");
            std::process::exit(1);
        }
    }
    result
}
