use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Part not found: {0}")]
    PartNotFound(String),

    #[error("Supplier not found: {0}")]
    SupplierNotFound(String),

    #[error("Consolidation scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("No embedding vector for part: {0}")]
    VectorMissing(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Computation exceeded its budget after {elapsed_ms} ms")]
    ComputationTimeout { elapsed_ms: u64 },

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Whether the error maps to a missing-entity condition rather than a
    /// caller mistake or an engine failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::PartNotFound(_)
                | Error::SupplierNotFound(_)
                | Error::ScenarioNotFound(_)
                | Error::VectorMissing(_)
        )
    }
}
