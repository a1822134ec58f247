//! Folder management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use archivehub_core::result::AppResult;
use archivehub_core::types::FolderId;
use archivehub_entity::folder::Folder;
use archivehub_entity::permission::PermissionSet;
use archivehub_service::folder::CreateFolderRequest;

use super::Session;
use crate::output;

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Create a folder
    Create {
        /// Folder name
        #[arg(short, long)]
        name: String,
        /// Parent folder ID (0 for a top-level folder)
        #[arg(short, long, default_value = "0")]
        parent: FolderId,
        /// Explicit path (defaults to parent path + name)
        #[arg(long)]
        path: Option<String>,
        /// Labels for a top-level folder; children inherit their parent's
        #[arg(short, long, default_value = "")]
        labels: PermissionSet,
    },
    /// Show a folder
    Get {
        /// Folder ID
        id: FolderId,
    },
    /// List visible direct children
    Children {
        /// Parent folder ID (0 for top-level folders)
        #[arg(default_value = "0")]
        parent: FolderId,
    },
    /// Show the visible folder tree with its records
    Tree {
        /// Folder to start below (0 for everything)
        #[arg(default_value = "0")]
        parent: FolderId,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: i64,
    /// Name
    name: String,
    /// Path
    path: String,
    /// Parent ID
    parent_id: i64,
    /// Permission labels
    labels: String,
    /// Created at
    created_at: String,
}

impl From<&Folder> for FolderRow {
    fn from(f: &Folder) -> Self {
        Self {
            id: f.id.get(),
            name: f.name.clone(),
            path: f.path.clone(),
            parent_id: f.parent_id.get(),
            labels: f.group_permission.to_string(),
            created_at: f.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute folder commands
pub async fn execute(args: &FolderArgs, session: &Session) -> AppResult<()> {
    let ctx = session.context().await?;
    let services = &session.services;

    match &args.command {
        FolderCommand::Create {
            name,
            parent,
            path,
            labels,
        } => {
            let folder = services
                .folders
                .create_folder(
                    &ctx,
                    CreateFolderRequest {
                        name: name.clone(),
                        path: path.clone(),
                        parent_id: *parent,
                        root_permission: labels.clone(),
                    },
                )
                .await?;
            if !parent.is_root() && !labels.is_empty() {
                output::print_warning(&format!(
                    "Labels inherited from parent ({}); --labels ignored",
                    folder.group_permission
                ));
            }
            output::print_item(&FolderRow::from(&folder), session.format);
        }
        FolderCommand::Get { id } => {
            let folder = services.folders.get_folder(&ctx, *id).await?;
            output::print_item(&FolderRow::from(&folder), session.format);
        }
        FolderCommand::Children { parent } => {
            let children = services.folders.list_children(&ctx, *parent).await?;
            let rows: Vec<FolderRow> = children.iter().map(FolderRow::from).collect();
            output::print_list(&rows, session.format);
        }
        FolderCommand::Tree { parent } => {
            let tree = services.trees.build_tree(&ctx, *parent).await?;
            output::print_tree(&tree, session.format);
        }
    }

    Ok(())
}
