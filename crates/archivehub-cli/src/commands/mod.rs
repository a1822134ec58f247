//! CLI command definitions and dispatch.

pub mod archive;
pub mod audit;
pub mod borrow;
pub mod folder;
pub mod migrate;
pub mod user;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use archivehub_core::config::AppConfig;
use archivehub_core::error::AppError;
use archivehub_core::result::AppResult;
use archivehub_database::StoreManager;
use archivehub_service::{OperationContext, Services};

use crate::output::OutputFormat;

/// ArchiveHub: permission-aware archive storage with audited borrowing
#[derive(Debug, Parser)]
#[command(name = "archivehub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay loaded from config/<env>.toml
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Email of the principal to act as
    #[arg(long = "as", value_name = "EMAIL", global = true)]
    pub as_user: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Principal management
    User(user::UserArgs),
    /// Folder management
    Folder(folder::FolderArgs),
    /// Archive record management
    Archive(archive::ArchiveArgs),
    /// Lend out a record
    Borrow(borrow::TransitionArgs),
    /// Return a record
    Return(borrow::TransitionArgs),
    /// Borrow/return many records from a CSV file
    BatchOperate(borrow::BatchArgs),
    /// Borrow/return audit trail
    Audit(audit::AuditArgs),
}

/// Everything a command needs while it runs.
pub struct Session {
    /// Services over the configured store.
    pub services: Services,
    /// Selected output format.
    pub format: OutputFormat,
    as_user: Option<String>,
    shutdown: CancellationToken,
}

impl Session {
    /// Resolve the `--as` principal into an operation context that is
    /// cancelled on Ctrl-C.
    pub async fn context(&self) -> AppResult<OperationContext> {
        let email = self.as_user.as_deref().ok_or_else(|| {
            AppError::authentication("This command needs a principal; pass --as <email>")
        })?;
        let ctx = self.services.users.resolve_context(email).await?;
        Ok(ctx.with_cancellation(self.shutdown.child_token()))
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        let stores = StoreManager::new(&config).await?;

        let shutdown = CancellationToken::new();
        let interrupt = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling in-flight operation");
                interrupt.cancel();
            }
        });

        let session = Session {
            services: Services::new(&stores, &config),
            format: self.format,
            as_user: self.as_user.clone(),
            shutdown,
        };

        let result = match &self.command {
            Commands::Migrate => migrate::execute(&stores).await,
            Commands::User(args) => user::execute(args, &session).await,
            Commands::Folder(args) => folder::execute(args, &session).await,
            Commands::Archive(args) => archive::execute(args, &session).await,
            Commands::Borrow(args) => borrow::execute_borrow(args, &session).await,
            Commands::Return(args) => borrow::execute_return(args, &session).await,
            Commands::BatchOperate(args) => borrow::execute_batch(args, &session).await,
            Commands::Audit(args) => audit::execute(args, &session).await,
        };

        stores.close().await;
        result
    }
}
