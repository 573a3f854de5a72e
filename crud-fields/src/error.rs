//! Error types for the field builder and panel registry

use thiserror::Error;

/// Result type for crud-fields operations
pub type Result<T> = std::result::Result<T, CrudFieldsError>;

/// Errors that can occur while building fields or persisting panels
#[derive(Debug, Error)]
pub enum CrudFieldsError {
    /// The context has no panel to bind a builder to
    #[error("no panel registered in context")]
    NoRegistry,

    /// The context holds several panels and cannot pick one
    #[error("ambiguous panel: {count} panels registered in context")]
    AmbiguousRegistry { count: usize },

    /// The working record has no string `name` attribute
    #[error("field record has no name attribute")]
    MissingNameAttribute,

    /// A builder was requested for an empty field name
    #[error("field name cannot be empty")]
    EmptyFieldName,

    /// The attribute cannot be removed from a field
    #[error("attribute '{attribute}' is reserved and cannot be forgotten")]
    ReservedAttribute { attribute: String },

    /// An operation name that cannot be used as a file stem
    #[error("invalid operation name: '{name}'")]
    InvalidOperationName { name: String },

    /// A dynamic call was made without the value argument
    #[error("method '{method}' called without a value")]
    MissingArgument { method: String },

    /// Value could not be converted into an attribute value
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}
