//! Control-plane access (Imperative Shell).
//!
//! `TableAdmin` is the seam between the provisioner and DynamoDB. The AWS
//! implementation lives here; tests use the in-memory one.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection,
    ProjectionType, ProvisionedThroughput, ScalarAttributeType, StreamSpecification,
};
use aws_sdk_dynamodb::Client;

use crate::config::ProvisionConfig;
use crate::error::{
    map_create_table_error, map_delete_table_error, map_describe_table_error,
    map_list_tables_error, ProvisionError, Result,
};
use crate::schema::{self, IndexSchema, KeySchema, TableSchema, Throughput};

/// Table status as reported by DescribeTable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Active,
    Creating,
    Updating,
    Deleting,
    Other,
}

/// Control-plane operations used by the provisioner.
#[async_trait]
pub trait TableAdmin: Send + Sync {
    /// Lists the names of every table visible to the client.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Deletes a table. Resolves on the service acknowledgment.
    async fn delete_table(&self, table_name: &str) -> Result<()>;

    /// Requests creation of a table. Does not wait for it to become active.
    async fn create_table(&self, schema: &TableSchema) -> Result<()>;

    /// Current status of a table, `None` if it doesn't exist.
    async fn table_status(&self, table_name: &str) -> Result<Option<TableStatus>>;
}

/// Creates a DynamoDB client with the given configuration.
pub async fn create_client(config: &ProvisionConfig) -> Client {
    let mut sdk_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        tracing::debug!(
            endpoint = %endpoint,
            force_path_style = config.force_path_style(),
            "using custom endpoint"
        );
        sdk_config_loader = sdk_config_loader.endpoint_url(endpoint);
    }

    let sdk_config = sdk_config_loader.load().await;
    Client::new(&sdk_config)
}

/// `TableAdmin` backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct DynamoTableAdmin {
    client: Client,
}

impl DynamoTableAdmin {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connects using the given configuration.
    pub async fn connect(config: &ProvisionConfig) -> Self {
        Self::new(create_client(config).await)
    }
}

#[async_trait]
impl TableAdmin for DynamoTableAdmin {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut start_table_name: Option<String> = None;

        loop {
            let output = self
                .client
                .list_tables()
                .set_exclusive_start_table_name(start_table_name.take())
                .send()
                .await
                .map_err(map_list_tables_error)?;

            names.extend(output.table_names().iter().cloned());

            match output.last_evaluated_table_name() {
                Some(last) => start_table_name = Some(last.to_string()),
                None => break,
            }
        }

        Ok(names)
    }

    async fn delete_table(&self, table_name: &str) -> Result<()> {
        let output = self
            .client
            .delete_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| map_delete_table_error(e, table_name))?;

        let status = output
            .table_description()
            .and_then(|t| t.table_status())
            .map(|s| s.as_str().to_string());
        tracing::debug!(table_name, status = ?status, "delete acknowledged");
        Ok(())
    }

    async fn create_table(&self, schema: &TableSchema) -> Result<()> {
        let parts = CreateTableParts::from_schema(schema)?;

        self.client
            .create_table()
            .table_name(&schema.table_name)
            .set_attribute_definitions(Some(parts.attribute_definitions))
            .set_key_schema(Some(parts.key_schema))
            .set_global_secondary_indexes(Some(parts.global_secondary_indexes))
            .billing_mode(BillingMode::Provisioned)
            .provisioned_throughput(parts.provisioned_throughput)
            .stream_specification(parts.stream_specification)
            .send()
            .await
            .map_err(|e| map_create_table_error(e, &schema.table_name))?;
        Ok(())
    }

    async fn table_status(&self, table_name: &str) -> Result<Option<TableStatus>> {
        match self
            .client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
        {
            Ok(response) => Ok(response
                .table()
                .map(|table| to_table_status(table.table_status()))),
            Err(err) => match map_describe_table_error(err, table_name) {
                None => Ok(None),
                Some(err) => Err(err),
            },
        }
    }
}

fn to_table_status(status: Option<&aws_sdk_dynamodb::types::TableStatus>) -> TableStatus {
    use aws_sdk_dynamodb::types::TableStatus as Sdk;

    match status {
        Some(Sdk::Active) => TableStatus::Active,
        Some(Sdk::Creating) => TableStatus::Creating,
        Some(Sdk::Updating) => TableStatus::Updating,
        Some(Sdk::Deleting) => TableStatus::Deleting,
        _ => TableStatus::Other,
    }
}

/// SDK request pieces derived from a `TableSchema`.
#[derive(Debug, Clone)]
pub struct CreateTableParts {
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub key_schema: Vec<KeySchemaElement>,
    pub global_secondary_indexes: Vec<GlobalSecondaryIndex>,
    pub provisioned_throughput: ProvisionedThroughput,
    pub stream_specification: StreamSpecification,
}

impl CreateTableParts {
    /// Converts the descriptor into SDK types. The schema is validated first.
    pub fn from_schema(schema: &TableSchema) -> Result<Self> {
        schema.validate()?;

        let attribute_definitions = schema
            .attribute_definitions
            .iter()
            .map(|def| {
                AttributeDefinition::builder()
                    .attribute_name(&def.name)
                    .attribute_type(to_scalar_type(def.attribute_type))
                    .build()
                    .map_err(|e| ProvisionError::Request(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        let global_secondary_indexes = schema
            .global_secondary_indexes
            .iter()
            .map(to_global_secondary_index)
            .collect::<Result<Vec<_>>>()?;

        let stream_specification = StreamSpecification::builder()
            .stream_enabled(schema.stream_enabled)
            .build()
            .map_err(|e| ProvisionError::Request(e.to_string()))?;

        Ok(Self {
            attribute_definitions,
            key_schema: to_key_schema(&schema.key_schema)?,
            global_secondary_indexes,
            provisioned_throughput: to_provisioned_throughput(&schema.throughput)?,
            stream_specification,
        })
    }
}

fn to_key_schema(keys: &KeySchema) -> Result<Vec<KeySchemaElement>> {
    [
        (&keys.partition_key, KeyType::Hash),
        (&keys.sort_key, KeyType::Range),
    ]
    .into_iter()
    .map(|(name, key_type)| {
        KeySchemaElement::builder()
            .attribute_name(name)
            .key_type(key_type)
            .build()
            .map_err(|e| ProvisionError::Request(e.to_string()))
    })
    .collect()
}

fn to_global_secondary_index(index: &IndexSchema) -> Result<GlobalSecondaryIndex> {
    GlobalSecondaryIndex::builder()
        .index_name(&index.name)
        .set_key_schema(Some(to_key_schema(&index.key_schema)?))
        .projection(
            Projection::builder()
                .projection_type(to_projection_type(index.projection))
                .build(),
        )
        .provisioned_throughput(to_provisioned_throughput(&index.throughput)?)
        .build()
        .map_err(|e| ProvisionError::Request(e.to_string()))
}

fn to_provisioned_throughput(throughput: &Throughput) -> Result<ProvisionedThroughput> {
    ProvisionedThroughput::builder()
        .read_capacity_units(throughput.read_capacity_units)
        .write_capacity_units(throughput.write_capacity_units)
        .build()
        .map_err(|e| ProvisionError::Request(e.to_string()))
}

fn to_scalar_type(attr_type: schema::AttributeType) -> ScalarAttributeType {
    match attr_type {
        schema::AttributeType::String => ScalarAttributeType::S,
        schema::AttributeType::Number => ScalarAttributeType::N,
    }
}

fn to_projection_type(projection: schema::ProjectionType) -> ProjectionType {
    match projection {
        schema::ProjectionType::All => ProjectionType::All,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::rtcstats_table_schema;

    #[test]
    fn test_parts_key_schema() {
        let parts = CreateTableParts::from_schema(&rtcstats_table_schema("sessions")).unwrap();

        let keys: Vec<(&str, &KeyType)> = parts
            .key_schema
            .iter()
            .map(|k| (k.attribute_name(), k.key_type()))
            .collect();
        assert_eq!(
            keys,
            vec![("conferenceId", &KeyType::Hash), ("dumpId", &KeyType::Range)]
        );
    }

    #[test]
    fn test_parts_attribute_definitions() {
        let parts = CreateTableParts::from_schema(&rtcstats_table_schema("sessions")).unwrap();

        let definitions: Vec<(&str, &ScalarAttributeType)> = parts
            .attribute_definitions
            .iter()
            .map(|a| (a.attribute_name(), a.attribute_type()))
            .collect();
        assert_eq!(
            definitions,
            vec![
                ("conferenceId", &ScalarAttributeType::S),
                ("conferenceUrl", &ScalarAttributeType::S),
                ("dumpId", &ScalarAttributeType::S),
                ("startDate", &ScalarAttributeType::N),
                ("sessionId", &ScalarAttributeType::S),
            ]
        );
    }

    #[test]
    fn test_parts_indexes() {
        let parts = CreateTableParts::from_schema(&rtcstats_table_schema("sessions")).unwrap();

        let names: Vec<&str> = parts
            .global_secondary_indexes
            .iter()
            .map(|i| i.index_name())
            .collect();
        assert_eq!(
            names,
            vec![
                "conferenceUrl-startDate-index",
                "conferenceId-startDate-index",
                "sessionId-startDate-index",
            ]
        );

        for index in &parts.global_secondary_indexes {
            let keys: Vec<&str> = index.key_schema().iter().map(|k| k.attribute_name()).collect();
            assert_eq!(keys[1], "startDate");
            assert_eq!(
                index.projection().and_then(|p| p.projection_type()),
                Some(&ProjectionType::All)
            );
            assert!(index.provisioned_throughput().is_some());
        }
    }

    #[test]
    fn test_parts_stream_disabled() {
        let parts = CreateTableParts::from_schema(&rtcstats_table_schema("sessions")).unwrap();
        assert!(!parts.stream_specification.stream_enabled());
    }

    #[test]
    fn test_parts_reject_invalid_schema() {
        let mut schema = rtcstats_table_schema("sessions");
        schema.attribute_definitions.clear();

        let err = CreateTableParts::from_schema(&schema).unwrap_err();
        assert!(matches!(err, ProvisionError::InvalidSchema(_)));
    }

    #[test]
    fn test_table_status_mapping() {
        use aws_sdk_dynamodb::types::TableStatus as Sdk;

        assert_eq!(to_table_status(Some(&Sdk::Active)), TableStatus::Active);
        assert_eq!(to_table_status(Some(&Sdk::Deleting)), TableStatus::Deleting);
        assert_eq!(to_table_status(Some(&Sdk::Archived)), TableStatus::Other);
        assert_eq!(to_table_status(None), TableStatus::Other);
    }
}
