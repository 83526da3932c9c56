pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid job snapshot: {message}")]
    InvalidSnapshot { message: String },

    #[error("Invalid layout config: {message}")]
    InvalidConfig { message: String },
}
