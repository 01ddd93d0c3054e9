use carebridge_types::ReviewStatus;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to create data directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read collection file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write collection file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize collection: {0}")]
    Serialization(serde_json::Error),
    #[error("prescription {0} not found in the queue")]
    RecordNotFound(String),
    #[error("prescription {0} already exists in the queue")]
    DuplicateRecordId(String),
    #[error("prescription {id} was already reviewed (status: {status})")]
    AlreadyReviewed { id: String, status: ReviewStatus },
    #[error("booking {0} not found")]
    BookingNotFound(String),
}

pub type WorkflowResult<T> = std::result::Result<T, WorkflowError>;
