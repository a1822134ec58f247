//! Principal management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use archivehub_core::result::AppResult;
use archivehub_entity::user::User;
use archivehub_service::user::CreateUserRequest;

use super::Session;
use crate::output;

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Register a principal
    Add {
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Display name
        #[arg(short, long)]
        username: String,
        /// Comma-separated permission labels
        #[arg(short, long, default_value = "")]
        labels: String,
    },
    /// Show a principal by email
    Show {
        /// Email address
        email: String,
    },
}

/// User display row
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct UserRow {
    /// User ID
    id: i64,
    /// Email
    email: String,
    /// Username
    username: String,
    /// Permission labels
    labels: String,
    /// Created at
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.get(),
            email: u.email.clone(),
            username: u.username.clone(),
            labels: u.permission_group.to_string(),
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(args: &UserArgs, session: &Session) -> AppResult<()> {
    let users = &session.services.users;

    match &args.command {
        UserCommand::Add {
            email,
            username,
            labels,
        } => {
            let user = users
                .create_user(CreateUserRequest {
                    email: email.clone(),
                    username: username.clone(),
                    permission_group: labels.clone(),
                })
                .await?;
            output::print_item(&UserRow::from(&user), session.format);
        }
        UserCommand::Show { email } => {
            let user = users.get_by_email(email).await?;
            output::print_item(&UserRow::from(&user), session.format);
        }
    }

    Ok(())
}
