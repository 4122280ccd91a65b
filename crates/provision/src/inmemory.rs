//! In-memory `TableAdmin` for testing.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::admin::{TableAdmin, TableStatus};
use crate::error::{ProvisionError, Result};
use crate::schema::TableSchema;

/// A control-plane call as seen by the in-memory admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCall {
    ListTables,
    DeleteTable(String),
    CreateTable(TableSchema),
    DescribeTable(String),
}

#[derive(Debug, Default)]
struct State {
    tables: BTreeMap<String, TableSchema>,
    /// Tables still reported as DELETING, with the remaining number of probes.
    deleting: BTreeMap<String, u32>,
    calls: Vec<AdminCall>,
    list_error: Option<ProvisionError>,
    delete_error: Option<ProvisionError>,
    create_error: Option<ProvisionError>,
    deletion_lag: u32,
}

/// Table store kept in a map, recording every call it receives.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTableAdmin {
    state: Arc<RwLock<State>>,
}

impl InMemoryTableAdmin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an existing table without recording a call.
    pub async fn insert_table(&self, schema: TableSchema) {
        let mut state = self.state.write().await;
        state.tables.insert(schema.table_name.clone(), schema);
    }

    pub async fn fail_list(&self, err: ProvisionError) {
        self.state.write().await.list_error = Some(err);
    }

    pub async fn fail_delete(&self, err: ProvisionError) {
        self.state.write().await.delete_error = Some(err);
    }

    pub async fn fail_create(&self, err: ProvisionError) {
        self.state.write().await.create_error = Some(err);
    }

    /// Number of status probes that still see a deleted table as DELETING.
    pub async fn set_deletion_lag(&self, probes: u32) {
        self.state.write().await.deletion_lag = probes;
    }

    pub async fn calls(&self) -> Vec<AdminCall> {
        self.state.read().await.calls.clone()
    }

    pub async fn tables(&self) -> BTreeMap<String, TableSchema> {
        self.state.read().await.tables.clone()
    }
}

#[async_trait]
impl TableAdmin for InMemoryTableAdmin {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let mut state = self.state.write().await;
        state.calls.push(AdminCall::ListTables);
        if let Some(err) = &state.list_error {
            return Err(err.clone());
        }
        Ok(state
            .tables
            .keys()
            .chain(state.deleting.keys())
            .cloned()
            .collect())
    }

    async fn delete_table(&self, table_name: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state
            .calls
            .push(AdminCall::DeleteTable(table_name.to_string()));
        if let Some(err) = &state.delete_error {
            return Err(err.clone());
        }
        if state.tables.remove(table_name).is_none() {
            return Err(ProvisionError::DeleteTable {
                table_name: table_name.to_string(),
                message: "Table not found".to_string(),
            });
        }
        if state.deletion_lag > 0 {
            let lag = state.deletion_lag;
            state.deleting.insert(table_name.to_string(), lag);
        }
        Ok(())
    }

    async fn create_table(&self, schema: &TableSchema) -> Result<()> {
        let mut state = self.state.write().await;
        state.calls.push(AdminCall::CreateTable(schema.clone()));
        if let Some(err) = &state.create_error {
            return Err(err.clone());
        }
        if state.tables.contains_key(&schema.table_name)
            || state.deleting.contains_key(&schema.table_name)
        {
            return Err(ProvisionError::CreateTable {
                table_name: schema.table_name.clone(),
                message: "Table already exists".to_string(),
            });
        }
        state
            .tables
            .insert(schema.table_name.clone(), schema.clone());
        Ok(())
    }

    async fn table_status(&self, table_name: &str) -> Result<Option<TableStatus>> {
        let mut state = self.state.write().await;
        state
            .calls
            .push(AdminCall::DescribeTable(table_name.to_string()));

        if let Some(remaining) = state.deleting.get_mut(table_name) {
            *remaining -= 1;
            if *remaining == 0 {
                state.deleting.remove(table_name);
            }
            return Ok(Some(TableStatus::Deleting));
        }

        Ok(state
            .tables
            .contains_key(table_name)
            .then_some(TableStatus::Active))
    }
}
