/// Fatal errors that abort a ranking run
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Required descriptive columns are absent from the compound table
    #[error("Missing required columns: {}", .0.join(", "))]
    SchemaError(Vec<String>),

    /// Engine configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
