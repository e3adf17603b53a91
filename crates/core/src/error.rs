#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The local configuration is unusable (e.g. no default storage
    /// account in the registry).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A local request is malformed and was rejected before dispatch.
    #[error("Validation failed: {0}")]
    Validation(String),
}
