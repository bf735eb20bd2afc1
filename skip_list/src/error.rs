use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrdoSkipListError {
    #[error("IO: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Key already exists")]
    KeyAlreadyExists,
    #[error("Key not found")]
    KeyNotFound,
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
}
