use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrofitError {
    #[error("Request was considered invalid due to error: {0}")]
    InvalidRequest(anyhow::Error),
    #[error("Error while writing out results: {0}")]
    ErrorInOutput(#[from] OutputError),
}

#[derive(Debug, Error)]
#[error(transparent)]
pub struct OutputError {
    error: anyhow::Error,
}

impl OutputError {
    pub(crate) fn new(error: anyhow::Error) -> Self {
        Self { error }
    }
}
