//! Audit trail CLI commands.

use clap::{Args, Subcommand};

use archivehub_core::result::AppResult;
use archivehub_core::types::UserId;

use super::Session;
use super::borrow::AuditRow;
use crate::output;

/// Arguments for audit commands
#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Audit subcommand
    #[command(subcommand)]
    pub command: AuditCommand,
}

/// Audit subcommands
#[derive(Debug, Subcommand)]
pub enum AuditCommand {
    /// List audit entries, newest first
    List {
        /// Only entries for this contract number
        #[arg(long)]
        contract_no: Option<String>,
        /// Only entries by this operator
        #[arg(long)]
        operator: Option<UserId>,
        /// Page number (1-based)
        #[arg(short, long)]
        page: Option<i64>,
        /// Page size
        #[arg(short = 's', long)]
        page_size: Option<i64>,
    },
}

/// Execute audit commands
pub async fn execute(args: &AuditArgs, session: &Session) -> AppResult<()> {
    let ctx = session.context().await?;

    match &args.command {
        AuditCommand::List {
            contract_no,
            operator,
            page,
            page_size,
        } => {
            let result = session
                .services
                .audit
                .history(&ctx, contract_no.as_deref(), *operator, *page, *page_size)
                .await?;

            let rows: Vec<AuditRow> = result.items.iter().map(AuditRow::from).collect();
            output::print_list(&rows, session.format);
            if session.format == output::OutputFormat::Table {
                output::print_kv(
                    "Page",
                    &format!("{} of {} ({} total)", result.page, result.total_pages, result.total_items),
                );
            }
        }
    }

    Ok(())
}
