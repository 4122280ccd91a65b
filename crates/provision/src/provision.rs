//! Provisioning run: list, optionally delete, then create.
//!
//! Every failure is logged where it happens and turned into a
//! `ProvisionOutcome`; nothing is propagated to the caller.

use std::time::Duration;

use crate::admin::TableAdmin;
use crate::error::{ProvisionError, Result};
use crate::planning::{self, ProvisionPlan};
use crate::schema::TableSchema;

/// Polling policy used while waiting for a deleted table to disappear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionWait {
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for DeletionWait {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            max_attempts: 60,
        }
    }
}

/// Options for a provisioning run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionOptions {
    /// Compute the plan without deleting or creating anything.
    pub dry_run: bool,
    /// Wait for a deleted table to be gone before creating it again.
    /// When `None`, the delete acknowledgment alone gates creation.
    pub wait_for_deletion: Option<DeletionWait>,
}

/// How a provisioning run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// Listing tables failed; nothing was changed.
    ListFailed(ProvisionError),
    /// Dry run; the plan was computed but not applied.
    Planned(ProvisionPlan),
    /// Deleting the existing table failed; creation was skipped.
    DeleteFailed(ProvisionError),
    /// Creation was requested and accepted by the service.
    CreateRequested { replaced: bool },
    /// The creation request was rejected.
    CreateFailed {
        replaced: bool,
        error: ProvisionError,
    },
}

impl ProvisionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ProvisionOutcome::Planned(_) | ProvisionOutcome::CreateRequested { .. }
        )
    }
}

/// Runs the provisioning state machine against `admin`.
pub async fn provision<A>(
    admin: &A,
    schema: &TableSchema,
    options: &ProvisionOptions,
) -> ProvisionOutcome
where
    A: TableAdmin + ?Sized,
{
    let existing_tables = match admin.list_tables().await {
        Ok(tables) => tables,
        Err(err) => {
            tracing::error!(error = %err, "Could not list tables");
            return ProvisionOutcome::ListFailed(err);
        }
    };
    tracing::debug!(count = existing_tables.len(), "listed tables");

    let plan = planning::calculate_plan(&existing_tables, schema);
    for line in planning::format_plan(&plan, schema) {
        tracing::debug!("{}", line);
    }

    if options.dry_run {
        tracing::info!(table_name = plan.table_name(), "Dry run, no changes applied");
        return ProvisionOutcome::Planned(plan);
    }

    match plan {
        ProvisionPlan::Recreate { table_name } => {
            tracing::info!(%table_name, "Table exists, deleting and recreating...");

            if let Err(err) = delete_table(admin, &table_name, options.wait_for_deletion).await {
                tracing::error!(error = %err, "Could not delete table");
                return ProvisionOutcome::DeleteFailed(err);
            }

            create_table(admin, schema, true).await
        }
        ProvisionPlan::Create { table_name } => {
            tracing::info!(%table_name, "Creating new table...");
            create_table(admin, schema, false).await
        }
    }
}

async fn delete_table<A>(admin: &A, table_name: &str, wait: Option<DeletionWait>) -> Result<()>
where
    A: TableAdmin + ?Sized,
{
    admin.delete_table(table_name).await?;
    tracing::info!(table_name, "Table deleted");

    if let Some(wait) = wait {
        wait_for_table_deleted(admin, table_name, wait).await?;
    }
    Ok(())
}

async fn create_table<A>(admin: &A, schema: &TableSchema, replaced: bool) -> ProvisionOutcome
where
    A: TableAdmin + ?Sized,
{
    match admin.create_table(schema).await {
        Ok(()) => {
            tracing::info!(table_name = %schema.table_name, "Table creation requested");
            ProvisionOutcome::CreateRequested { replaced }
        }
        Err(error) => {
            tracing::error!(error = %error, "Could not create table");
            ProvisionOutcome::CreateFailed { replaced, error }
        }
    }
}

/// Polls until the table no longer exists.
pub async fn wait_for_table_deleted<A>(
    admin: &A,
    table_name: &str,
    wait: DeletionWait,
) -> Result<()>
where
    A: TableAdmin + ?Sized,
{
    for attempt in 1..=wait.max_attempts {
        match admin.table_status(table_name).await? {
            None => return Ok(()),
            Some(status) => {
                tracing::debug!(table_name, ?status, attempt, "waiting for table deletion");
            }
        }
        tokio::time::sleep(wait.poll_interval).await;
    }

    Err(ProvisionError::DeletionTimeout {
        table_name: table_name.to_string(),
    })
}
