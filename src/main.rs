use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, warn};

use davprofile::{
    config::Config,
    db::Database,
    models::{ConnectionProfile, ProfileUpdate},
    services::ProfileManager,
    AppState,
};

#[derive(Parser)]
#[command(name = "davprofile", version, about = "Manage and verify WebDAV connection profiles")]
struct Cli {
    /// Override DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the stored profile (password masked)
    Show,
    /// Edit fields of the stored profile
    Set {
        #[arg(long)]
        enabled: Option<bool>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        path: Option<String>,
        #[arg(long)]
        port: Option<String>,
    },
    /// Reset path and port to their defaults
    Defaults,
    /// Import a third-party connection profile document
    Import { file: PathBuf },
    /// Export the stored profile as JSON
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Restore a profile from a JSON export
    Restore { file: PathBuf },
    /// Verify the stored profile against the verification endpoint
    Test,
    /// Toggle debug event forwarding
    Debug {
        #[arg(long, value_enum)]
        page: Option<Switch>,
        #[arg(long, value_enum)]
        everything: Option<Switch>,
    },
    /// Run the verification endpoint and debug collector
    Serve,
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

impl From<Switch> for bool {
    fn from(switch: Switch) -> Self {
        matches!(switch, Switch::On)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(database_url) = cli.database_url {
        config.database_url = database_url;
    }

    if let Command::Serve = cli.command {
        return serve(config).await;
    }

    let db = Database::new(&config.database_url)
        .await
        .with_context(|| format!("Failed to open {}", config.database_url))?;
    db.migrate().await?;

    let (manager, telemetry_task) = davprofile::bootstrap(&config, Arc::new(db)).await?;
    let outcome = run(&manager, cli.command).await;

    // Closing the last sender lets the drain task flush what is queued
    drop(manager);
    if tokio::time::timeout(Duration::from_secs(2), telemetry_task).await.is_err() {
        warn!("Debug events still queued at exit were dropped");
    }

    outcome
}

async fn run(manager: &ProfileManager, command: Command) -> Result<()> {
    match command {
        Command::Show => print_profile(&manager.current_profile().await?)?,
        Command::Set {
            enabled,
            url,
            username,
            password,
            path,
            port,
        } => {
            let profile = manager
                .update_profile(ProfileUpdate {
                    enabled,
                    url,
                    username,
                    password,
                    path,
                    port,
                })
                .await?;
            print_profile(&profile)?;
        }
        Command::Defaults => print_profile(&manager.load_defaults().await?)?,
        Command::Import { file } => {
            let document = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let profile = manager
                .import_foreign_document(&document)
                .await
                .map_err(|e| {
                    debug!("Import failed: {}", e);
                    anyhow::anyhow!(e.user_message())
                })?;
            println!("Profile imported. Enter the password and run `davprofile test`.");
            print_profile(&profile)?;
        }
        Command::Export { output } => {
            let artifact = manager.export_profile().await?;
            let json = serde_json::to_string_pretty(&artifact)?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, json).await?;
                    info!("Exported profile to {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        Command::Restore { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let profile = manager.restore_export(&raw).await.map_err(|e| {
                debug!("Restore failed: {}", e);
                anyhow::anyhow!(e.user_message())
            })?;
            print_profile(&profile)?;
        }
        Command::Test => {
            let profile = manager.current_profile().await?;
            let result = manager.test_connection(&profile).await;
            println!("{}", result);
            if !result.is_success() {
                anyhow::bail!("connection test did not succeed");
            }
        }
        Command::Debug { page, everything } => {
            let state = manager
                .set_debug_toggles(page.map(bool::from), everything.map(bool::from))
                .await?;
            println!(
                "Debug logging: {}, log everything: {}",
                on_off(state.debug_log_enabled),
                on_off(state.log_everything_enabled)
            );
        }
        Command::Serve => anyhow::bail!("serve runs without the profile store"),
    }
    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    let address = config.server_address.clone();
    let app = davprofile::routes::app(Arc::new(AppState { config }));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Server starting on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}

fn print_profile(profile: &ConnectionProfile) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&profile.redacted())?);
    Ok(())
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
