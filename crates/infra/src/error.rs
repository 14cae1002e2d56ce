/// Errors from loading or querying the roadway network.
#[derive(Debug, thiserror::Error)]
pub enum InfraError {
    #[error("Unknown rnode: {0}")]
    UnknownRNode(String),

    #[error("Unknown station: {0}")]
    UnknownStation(String),

    #[error("Unknown corridor: {0}")]
    UnknownCorridor(String),

    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
