use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("metadata table not found: {}", .0.display())]
    CsvNotFound(PathBuf),

    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("failed to build preview for {}: {message}", .path.display())]
    PreviewFailed { path: PathBuf, message: String },

    #[error("preview decoder task failed: {0}")]
    DecoderJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
