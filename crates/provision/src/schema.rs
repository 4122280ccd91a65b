//! Table schema descriptor (Functional Core - pure data).
//!
//! The rtcstats metadata table has one fixed shape. It is defined once here
//! and sent verbatim to `CreateTable`.

use crate::error::{ProvisionError, Result};

/// Read/write capacity units used by the table and by every index.
pub const DEFAULT_CAPACITY_UNITS: i64 = 5;

/// Complete description of the table handed to `CreateTable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table_name: String,
    pub key_schema: KeySchema,
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub global_secondary_indexes: Vec<IndexSchema>,
    pub throughput: Throughput,
    pub stream_enabled: bool,
}

/// Partition (HASH) and sort (RANGE) attribute names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    pub partition_key: String,
    pub sort_key: String,
}

/// A declared attribute and its scalar type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDefinition {
    pub name: String,
    pub attribute_type: AttributeType,
}

/// DynamoDB scalar attribute types used by key attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Number,
}

impl AttributeType {
    /// The wire tag DynamoDB uses for this type.
    pub fn tag(self) -> &'static str {
        match self {
            AttributeType::String => "S",
            AttributeType::Number => "N",
        }
    }
}

/// Global Secondary Index configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSchema {
    pub name: String,
    pub key_schema: KeySchema,
    pub projection: ProjectionType,
    pub throughput: Throughput,
}

/// GSI projection type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    All,
}

/// Provisioned throughput in capacity units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throughput {
    pub read_capacity_units: i64,
    pub write_capacity_units: i64,
}

impl Default for Throughput {
    fn default() -> Self {
        Self {
            read_capacity_units: DEFAULT_CAPACITY_UNITS,
            write_capacity_units: DEFAULT_CAPACITY_UNITS,
        }
    }
}

impl KeySchema {
    fn new(partition_key: &str, sort_key: &str) -> Self {
        Self {
            partition_key: partition_key.to_string(),
            sort_key: sort_key.to_string(),
        }
    }

    fn attribute_names(&self) -> [&str; 2] {
        [self.partition_key.as_str(), self.sort_key.as_str()]
    }
}

impl TableSchema {
    /// Sets the table name.
    pub fn with_table_name(mut self, name: &str) -> Self {
        self.table_name = name.to_string();
        self
    }

    /// Looks up the declared type of an attribute.
    pub fn attribute_type(&self, name: &str) -> Option<AttributeType> {
        self.attribute_definitions
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.attribute_type)
    }

    /// Checks that the descriptor is internally consistent.
    ///
    /// Every key attribute of the table and of each index must be declared
    /// exactly once in `attribute_definitions`.
    pub fn validate(&self) -> Result<()> {
        if self.table_name.trim().is_empty() {
            return Err(ProvisionError::InvalidSchema(
                "table name must not be empty".to_string(),
            ));
        }

        for (i, def) in self.attribute_definitions.iter().enumerate() {
            if self.attribute_definitions[..i]
                .iter()
                .any(|other| other.name == def.name)
            {
                return Err(ProvisionError::InvalidSchema(format!(
                    "attribute '{}' is defined more than once",
                    def.name
                )));
            }
        }

        for name in self.key_schema.attribute_names() {
            if self.attribute_type(name).is_none() {
                return Err(ProvisionError::InvalidSchema(format!(
                    "key attribute '{}' has no attribute definition",
                    name
                )));
            }
        }

        for (i, index) in self.global_secondary_indexes.iter().enumerate() {
            if self.global_secondary_indexes[..i]
                .iter()
                .any(|other| other.name == index.name)
            {
                return Err(ProvisionError::InvalidSchema(format!(
                    "index '{}' is declared more than once",
                    index.name
                )));
            }
            for name in index.key_schema.attribute_names() {
                if self.attribute_type(name).is_none() {
                    return Err(ProvisionError::InvalidSchema(format!(
                        "index '{}' uses attribute '{}' which has no attribute definition",
                        index.name, name
                    )));
                }
            }
        }

        Ok(())
    }
}

fn attribute(name: &str, attribute_type: AttributeType) -> AttributeDefinition {
    AttributeDefinition {
        name: name.to_string(),
        attribute_type,
    }
}

fn start_date_index(partition_key: &str) -> IndexSchema {
    IndexSchema {
        name: format!("{}-startDate-index", partition_key),
        key_schema: KeySchema::new(partition_key, "startDate"),
        projection: ProjectionType::All,
        throughput: Throughput::default(),
    }
}

/// Returns the rtcstats metadata table descriptor.
/// This is a pure function - no I/O.
pub fn rtcstats_table_schema(table_name: &str) -> TableSchema {
    TableSchema {
        table_name: table_name.to_string(),
        key_schema: KeySchema::new("conferenceId", "dumpId"),
        attribute_definitions: vec![
            attribute("conferenceId", AttributeType::String),
            attribute("conferenceUrl", AttributeType::String),
            attribute("dumpId", AttributeType::String),
            attribute("startDate", AttributeType::Number),
            attribute("sessionId", AttributeType::String),
        ],
        global_secondary_indexes: vec![
            start_date_index("conferenceUrl"),
            start_date_index("conferenceId"),
            start_date_index("sessionId"),
        ],
        throughput: Throughput::default(),
        stream_enabled: false,
    }
}
