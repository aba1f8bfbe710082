use clap::{Parser, Subcommand};
use complaint_desk::app::{self, App, AppContext};
use complaint_desk::backend::{Backend, FileBackend};
use complaint_desk::config::{BackendKind, Config, Overrides};
use complaint_desk::domain::{Registration, Role};
use complaint_desk::error::DeskError;
use complaint_desk::logging;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "complaint-desk", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Directory of the file backend
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Backend implementation
    #[arg(long, value_enum)]
    backend: Option<BackendKind>,

    /// Rows per table page
    #[arg(long)]
    page_size: Option<usize>,

    /// Log file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Draw inline instead of on the alternate screen
    #[arg(long)]
    no_alt_screen: bool,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the desk (default)
    Run,

    /// Create an administrator account in the data directory
    CreateAdmin {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

async fn open_backend(cfg: &Config) -> anyhow::Result<Backend> {
    Ok(match cfg.storage.backend {
        BackendKind::File => {
            let store = FileBackend::open(&cfg.storage.data_dir).await?;
            Backend::from_shared(Arc::new(store))
        }
        BackendKind::Memory => Backend::in_memory(),
    })
}

async fn run_desk(config: Config) -> anyhow::Result<()> {
    let backend = open_backend(&config).await?;
    tracing::info!(
        backend = ?config.storage.backend,
        data_dir = %config.storage.data_dir.display(),
        page_size = config.listing.page_size,
        "starting complaint desk"
    );
    let alt_screen = config.ui.alt_screen;
    if app::install(AppContext { backend, config }).is_err() {
        anyhow::bail!("application context installed twice");
    }

    let program = bubbletea_rs::Program::<App>::builder()
        .alt_screen(alt_screen)
        .build()
        .map_err(|e| DeskError::Terminal(e.to_string()))?;
    program
        .run()
        .await
        .map_err(|e| DeskError::Terminal(e.to_string()))?;
    tracing::info!("complaint desk closed");
    Ok(())
}

async fn create_admin(config: Config, name: String, email: String, password: String) -> anyhow::Result<()> {
    if config.storage.backend == BackendKind::Memory {
        anyhow::bail!("create-admin needs the file backend");
    }
    let backend = open_backend(&config).await?;
    let session = backend
        .identity
        .sign_up(Registration {
            name,
            email,
            password,
            role: Role::Admin,
        })
        .await?;
    backend.identity.sign_out().await?;
    tracing::info!(user = %session.user_id, "administrator created");
    println!(
        "Created administrator {} in {}",
        session.email,
        config.storage.data_dir.display()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let overrides = Overrides {
        backend: cli.backend,
        data_dir: cli.data_dir,
        page_size: cli.page_size,
        log_file: cli.log_file,
        no_alt_screen: cli.no_alt_screen,
    };
    let config = Config::resolve(cli.config.as_deref(), overrides)?;
    logging::init(&config.logging)?;

    match cli.cmd.unwrap_or(Command::Run) {
        Command::Run => run_desk(config).await,
        Command::CreateAdmin {
            name,
            email,
            password,
        } => create_admin(config, name, email, password).await,
    }
}
