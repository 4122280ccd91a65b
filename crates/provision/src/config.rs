/// Default name of the rtcstats metadata table.
pub const DEFAULT_TABLE_NAME: &str = "sessions";

/// Default AWS region.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Provisioning configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionConfig {
    /// Name of the table to provision.
    pub table_name: String,
    /// AWS region.
    pub region: String,
    /// Custom endpoint URL (LocalStack, DynamoDB Local).
    pub endpoint_url: Option<String>,
}

impl ProvisionConfig {
    /// Builds a configuration, falling back to defaults for missing values.
    /// Blank strings count as missing.
    pub fn new(
        table_name: Option<String>,
        region: Option<String>,
        endpoint_url: Option<String>,
    ) -> Self {
        Self {
            table_name: non_blank(table_name).unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            region: non_blank(region).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint_url: non_blank(endpoint_url),
        }
    }

    /// Storage clients sharing this configuration use path-style addressing
    /// whenever a custom endpoint is set.
    pub fn force_path_style(&self) -> bool {
        self.endpoint_url.is_some()
    }

    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Custom endpoint ({}, region: {})", url, self.region),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
