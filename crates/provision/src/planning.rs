//! Pure functions for deciding what the provisioner will do (Functional Core).

use crate::schema::TableSchema;

/// Planned changes for a provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionPlan {
    /// Table doesn't exist, create it.
    Create { table_name: String },
    /// Table exists, delete it and create it again.
    Recreate { table_name: String },
}

impl ProvisionPlan {
    /// Name of the table the plan operates on.
    pub fn table_name(&self) -> &str {
        match self {
            ProvisionPlan::Create { table_name } | ProvisionPlan::Recreate { table_name } => {
                table_name
            }
        }
    }

    /// Whether the plan deletes an existing table first.
    pub fn deletes_existing(&self) -> bool {
        matches!(self, ProvisionPlan::Recreate { .. })
    }
}

/// Pure function: Decide between create and recreate from the listed tables.
///
/// Only an exact name match counts as existing.
pub fn calculate_plan(existing_tables: &[String], desired: &TableSchema) -> ProvisionPlan {
    let table_name = desired.table_name.clone();
    if existing_tables.iter().any(|t| *t == desired.table_name) {
        ProvisionPlan::Recreate { table_name }
    } else {
        ProvisionPlan::Create { table_name }
    }
}

/// Pure function: Format a plan for display.
pub fn format_plan(plan: &ProvisionPlan, schema: &TableSchema) -> Vec<String> {
    let mut lines = Vec::new();
    if plan.deletes_existing() {
        lines.push(format!(
            "- Delete table: {} (ALL DATA WILL BE LOST)",
            plan.table_name()
        ));
    }

    lines.push(format!("+ Create table: {}", plan.table_name()));
    lines.push(format!(
        "  Partition key: {}",
        describe_attribute(schema, &schema.key_schema.partition_key)
    ));
    lines.push(format!(
        "  Sort key: {}",
        describe_attribute(schema, &schema.key_schema.sort_key)
    ));
    for index in &schema.global_secondary_indexes {
        lines.push(format!("  + GSI: {}", index.name));
        lines.push(format!(
            "    Partition key: {}",
            describe_attribute(schema, &index.key_schema.partition_key)
        ));
        lines.push(format!(
            "    Sort key: {}",
            describe_attribute(schema, &index.key_schema.sort_key)
        ));
        lines.push(format!(
            "    Throughput: {} read / {} write",
            index.throughput.read_capacity_units, index.throughput.write_capacity_units
        ));
    }
    lines.push(format!(
        "  Throughput: {} read / {} write",
        schema.throughput.read_capacity_units, schema.throughput.write_capacity_units
    ));
    lines.push(format!(
        "  Stream: {}",
        if schema.stream_enabled {
            "enabled"
        } else {
            "disabled"
        }
    ));
    lines
}

fn describe_attribute(schema: &TableSchema, name: &str) -> String {
    match schema.attribute_type(name) {
        Some(attribute_type) => format!("{} ({})", name, attribute_type.tag()),
        None => format!("{} (?)", name),
    }
}
