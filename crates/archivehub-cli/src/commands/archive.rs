//! Archive record CLI commands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use archivehub_core::result::AppResult;
use archivehub_core::types::{ArchiveId, FolderId};
use archivehub_entity::archive::{Archive, ArchiveFilter, BorrowState, UpdateArchive};
use archivehub_service::archive::CreateArchiveRequest;

use super::Session;
use super::borrow::FailureRow;
use crate::{input, output};

/// Arguments for archive commands
#[derive(Debug, Args)]
pub struct ArchiveArgs {
    /// Archive subcommand
    #[command(subcommand)]
    pub command: ArchiveCommand,
}

/// Archive subcommands
#[derive(Debug, Subcommand)]
pub enum ArchiveCommand {
    /// Create a record in a folder
    Add {
        /// Owning folder ID
        #[arg(long)]
        folder: FolderId,
        /// Title
        #[arg(short, long)]
        title: String,
        /// Contract number
        #[arg(long)]
        contract_no: String,
        /// Document number (generated from the type count when empty)
        #[arg(long, default_value = "")]
        file_no: String,
        /// Institution number
        #[arg(long, default_value = "")]
        inst_no: String,
        /// Archive type
        #[arg(long, default_value = "")]
        arc_type: String,
        /// Storage date (YYYY-MM-DD)
        #[arg(long)]
        storage_date: Option<NaiveDate>,
    },
    /// Show a record
    Get {
        /// Record ID
        id: ArchiveId,
    },
    /// List visible records
    List {
        /// Contract number substring
        #[arg(long)]
        contract_no: Option<String>,
        /// Archive type
        #[arg(long)]
        arc_type: Option<String>,
        /// Institution number
        #[arg(long)]
        inst_no: Option<String>,
        /// Borrow state code (0 = in storage, 1 = borrowed)
        #[arg(long)]
        state: Option<BorrowState>,
        /// Page number (1-based)
        #[arg(short, long)]
        page: Option<i64>,
        /// Page size
        #[arg(short = 's', long)]
        page_size: Option<i64>,
    },
    /// Change descriptive fields of a record
    Update {
        /// Record ID
        id: ArchiveId,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New contract number
        #[arg(long)]
        contract_no: Option<String>,
        /// New document number
        #[arg(long)]
        file_no: Option<String>,
        /// New institution number
        #[arg(long)]
        inst_no: Option<String>,
        /// New archive type
        #[arg(long)]
        arc_type: Option<String>,
        /// New storage date (YYYY-MM-DD)
        #[arg(long)]
        storage_date: Option<NaiveDate>,
    },
    /// Import records from a CSV file with a header row
    Import {
        /// Target folder ID
        #[arg(long)]
        folder: FolderId,
        /// CSV file: file_no,title,contract_no,inst_no,arc_type[,storage_date]
        file: PathBuf,
    },
    /// Print the next document number for an archive type
    Seq {
        /// Archive type
        arc_type: String,
    },
}

/// Archive display row
#[derive(Debug, Serialize, Tabled)]
struct ArchiveRow {
    /// Record ID
    id: i64,
    /// Document number
    file_no: String,
    /// Title
    title: String,
    /// Contract number
    contract_no: String,
    /// Archive type
    arc_type: String,
    /// Borrow state
    state: String,
    /// Folder ID
    folder_id: i64,
    /// Permission labels
    labels: String,
    /// Storage date
    storage_date: String,
}

impl From<&Archive> for ArchiveRow {
    fn from(a: &Archive) -> Self {
        Self {
            id: a.id.get(),
            file_no: a.file_no.clone(),
            title: a.title.clone(),
            contract_no: a.contract_no.clone(),
            arc_type: a.arc_type.clone(),
            state: a.borrow_state.to_string(),
            folder_id: a.folder_id.get(),
            labels: a.group_permission.to_string(),
            storage_date: a
                .storage_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Execute archive commands
pub async fn execute(args: &ArchiveArgs, session: &Session) -> AppResult<()> {
    let ctx = session.context().await?;
    let services = &session.services;

    match &args.command {
        ArchiveCommand::Add {
            folder,
            title,
            contract_no,
            file_no,
            inst_no,
            arc_type,
            storage_date,
        } => {
            let archive = services
                .archives
                .create(
                    &ctx,
                    CreateArchiveRequest {
                        file_no: file_no.clone(),
                        title: title.clone(),
                        contract_no: contract_no.clone(),
                        inst_no: inst_no.clone(),
                        arc_type: arc_type.clone(),
                        folder_id: *folder,
                        storage_date: *storage_date,
                    },
                )
                .await?;
            output::print_item(&ArchiveRow::from(&archive), session.format);
        }
        ArchiveCommand::Get { id } => {
            let archive = services.archives.get(&ctx, *id).await?;
            output::print_item(&ArchiveRow::from(&archive), session.format);
        }
        ArchiveCommand::List {
            contract_no,
            arc_type,
            inst_no,
            state,
            page,
            page_size,
        } => {
            let filter = ArchiveFilter {
                contract_no: contract_no.clone(),
                arc_type: arc_type.clone(),
                inst_no: inst_no.clone(),
                borrow_state: *state,
            };
            let result = services
                .archives
                .list(&ctx, &filter, *page, *page_size)
                .await?;

            let rows: Vec<ArchiveRow> = result.items.iter().map(ArchiveRow::from).collect();
            output::print_list(&rows, session.format);
            if session.format == output::OutputFormat::Table {
                output::print_kv(
                    "Page",
                    &format!("{} of {} ({} total)", result.page, result.total_pages, result.total_items),
                );
            }
        }
        ArchiveCommand::Update {
            id,
            title,
            contract_no,
            file_no,
            inst_no,
            arc_type,
            storage_date,
        } => {
            let changes = UpdateArchive {
                file_no: file_no.clone(),
                title: title.clone(),
                contract_no: contract_no.clone(),
                inst_no: inst_no.clone(),
                arc_type: arc_type.clone(),
                storage_date: *storage_date,
            };
            let archive = services.archives.update_fields(&ctx, *id, changes).await?;
            output::print_item(&ArchiveRow::from(&archive), session.format);
        }
        ArchiveCommand::Import { folder, file } => {
            let rows = input::read_rows(file)?;
            let report = services.imports.import_rows(&ctx, *folder, &rows).await?;

            match session.format {
                output::OutputFormat::Json => output::print_json(&report),
                output::OutputFormat::Table => {
                    output::print_success(&format!(
                        "{} of {} row(s) inserted",
                        report.inserted, report.total_rows
                    ));
                    if !report.is_clean() {
                        output::print_warning(&format!(
                            "{} row(s) rejected",
                            report.failures.len()
                        ));
                        let rows: Vec<FailureRow> =
                            report.failures.iter().map(FailureRow::from).collect();
                        output::print_list(&rows, session.format);
                    }
                }
            }
        }
        ArchiveCommand::Seq { arc_type } => {
            let next = services
                .archives
                .generate_sequence_number(&ctx, arc_type)
                .await?;
            match session.format {
                output::OutputFormat::Json => {
                    output::print_json(&serde_json::json!({ "arc_type": arc_type, "file_no": next }))
                }
                output::OutputFormat::Table => output::print_kv("Next file_no", &next),
            }
        }
    }

    Ok(())
}
