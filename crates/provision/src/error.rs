//! Error types for table provisioning.
//!
//! Maps AWS SDK errors from the control-plane calls to `ProvisionError`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::delete_table::DeleteTableError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::list_tables::ListTablesError;
use thiserror::Error;

/// Result type alias for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisionError>;

/// Errors that can occur while provisioning the table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProvisionError {
    #[error("Could not list tables: {0}")]
    ListTables(String),

    #[error("Could not delete table '{table_name}': {message}")]
    DeleteTable { table_name: String, message: String },

    #[error("Could not create table '{table_name}': {message}")]
    CreateTable { table_name: String, message: String },

    #[error("Could not describe table '{table_name}': {message}")]
    DescribeTable { table_name: String, message: String },

    #[error("Timeout waiting for table '{table_name}' to be deleted")]
    DeletionTimeout { table_name: String },

    #[error("Invalid table schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid request: {0}")]
    Request(String),
}

/// Map a ListTables SDK error to ProvisionError.
pub fn map_list_tables_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ListTablesError, R>,
) -> ProvisionError {
    let context = DisplayErrorContext(&err).to_string();
    match err.into_service_error() {
        ListTablesError::InternalServerError(_) => {
            ProvisionError::ListTables("DynamoDB internal server error".to_string())
        }
        ListTablesError::InvalidEndpointException(_) => {
            ProvisionError::ListTables("Invalid endpoint".to_string())
        }
        _ => ProvisionError::ListTables(context),
    }
}

/// Map a DeleteTable SDK error to ProvisionError.
pub fn map_delete_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteTableError, R>,
    table_name: &str,
) -> ProvisionError {
    let context = DisplayErrorContext(&err).to_string();
    let message = match err.into_service_error() {
        DeleteTableError::ResourceNotFoundException(_) => "Table not found".to_string(),
        DeleteTableError::ResourceInUseException(_) => {
            "Table is being created, updated or deleted".to_string()
        }
        DeleteTableError::LimitExceededException(_) => {
            "Too many concurrent control-plane operations".to_string()
        }
        DeleteTableError::InternalServerError(_) => "DynamoDB internal server error".to_string(),
        _ => context,
    };
    ProvisionError::DeleteTable {
        table_name: table_name.to_string(),
        message,
    }
}

/// Map a CreateTable SDK error to ProvisionError.
pub fn map_create_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<CreateTableError, R>,
    table_name: &str,
) -> ProvisionError {
    let context = DisplayErrorContext(&err).to_string();
    let message = match err.into_service_error() {
        CreateTableError::ResourceInUseException(_) => {
            "A table with this name already exists or is still being deleted".to_string()
        }
        CreateTableError::LimitExceededException(_) => {
            "Too many concurrent control-plane operations or table limit reached".to_string()
        }
        CreateTableError::InternalServerError(_) => "DynamoDB internal server error".to_string(),
        _ => context,
    };
    ProvisionError::CreateTable {
        table_name: table_name.to_string(),
        message,
    }
}

/// Map a DescribeTable SDK error. A missing table is not an error.
pub fn map_describe_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DescribeTableError, R>,
    table_name: &str,
) -> Option<ProvisionError> {
    let context = DisplayErrorContext(&err).to_string();
    match err.into_service_error() {
        DescribeTableError::ResourceNotFoundException(_) => None,
        DescribeTableError::InternalServerError(_) => Some(ProvisionError::DescribeTable {
            table_name: table_name.to_string(),
            message: "DynamoDB internal server error".to_string(),
        }),
        _ => Some(ProvisionError::DescribeTable {
            table_name: table_name.to_string(),
            message: context,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_table() {
        let err = ProvisionError::DeleteTable {
            table_name: "sessions".to_string(),
            message: "Table not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Could not delete table 'sessions': Table not found"
        );

        let err = ProvisionError::DeletionTimeout {
            table_name: "sessions".to_string(),
        };
        assert!(err.to_string().contains("'sessions'"));
    }

    #[test]
    fn test_list_tables_message() {
        let err = ProvisionError::ListTables("connection refused".to_string());
        assert_eq!(err.to_string(), "Could not list tables: connection refused");
    }
}
