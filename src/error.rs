use crate::{
    config::ValidationError,
    io::{FromFileError, WriteError},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    ReadFile(#[from] FromFileError),

    #[error("Invalid configuration")]
    InvalidConfig(#[from] ValidationError),

    #[error("Error serializing the generated tsconfig")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    WriteFile(#[from] WriteError),
}
