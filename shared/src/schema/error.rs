use thiserror::Error;

use crate::types::FieldId;

/// Errors that can occur when reading typed values back out of a schema object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The requested field was never written
    #[error("Schema field {field_id} is not present")]
    FieldMissing { field_id: FieldId },

    /// The field holds a value of a different schema type
    #[error("Schema field {field_id} holds {found} (expected {expected})")]
    WrongType {
        field_id: FieldId,
        expected: &'static str,
        found: &'static str,
    },
}
