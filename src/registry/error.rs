/// Errors that can occur while building or persisting a comparison registry
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// I/O error reading or writing the registry file
    #[error("Failed to access registry file: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error reading the compound table headers
    #[error("Table error: {0}")]
    TableError(#[from] crate::table::TableError),
}
