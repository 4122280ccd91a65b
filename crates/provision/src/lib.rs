//! Provisioning of the rtcstats metadata table in DynamoDB.
//!
//! The run lists existing tables, deletes the target table if it is
//! present and creates it again with the fixed schema from
//! [`schema::rtcstats_table_schema`].

pub mod admin;
pub mod config;
pub mod error;
pub mod output;
pub mod planning;
pub mod provision;
pub mod schema;

#[cfg(test)]
mod inmemory;

pub use admin::{DynamoTableAdmin, TableAdmin, TableStatus};
pub use config::ProvisionConfig;
pub use error::{ProvisionError, Result};
pub use planning::ProvisionPlan;
pub use provision::{provision, DeletionWait, ProvisionOptions, ProvisionOutcome};
pub use schema::{rtcstats_table_schema, TableSchema};
