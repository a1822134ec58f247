//! Schema migration command.

use archivehub_core::result::AppResult;
use archivehub_database::StoreManager;

use crate::output;

/// Check the store is reachable, then apply pending migrations
pub async fn execute(stores: &StoreManager) -> AppResult<()> {
    stores.ping().await?;
    stores.migrate().await?;
    output::print_success("Schema is up to date.");
    Ok(())
}
