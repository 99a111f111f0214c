use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Everything that can go wrong while driving a submission.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("file type '.{0}' is not accepted")]
    InvalidFileType(String),

    #[error("no file selected")]
    NoFileSelected,

    #[error("no target version given")]
    MissingVersion,

    #[error("gateway health check answered status {0}")]
    GatewayUnavailable(u16),

    #[error("upload rejected with status {0}")]
    UploadFailed(u16),

    #[error("conversion request failed with status {0}")]
    ConversionFailed(u16),

    #[error("download failed with status {0}")]
    DownloadFailed(u16),

    #[error("polling stopped after {attempts} consecutive failed fetches")]
    PollExhausted { attempts: u8 },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("name store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Short message suitable for an end user. Detail stays in the log.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidFileType(_) => "This file type is not supported.",
            Self::NoFileSelected => "Please select a file first.",
            Self::MissingVersion => "Please select a target version.",
            Self::GatewayUnavailable(_) => "The server is not reachable. Please try again shortly.",
            Self::UploadFailed(_) => "Upload failed. Please try again later.",
            Self::ConversionFailed(_) => "Conversion failed. Please try again later.",
            Self::DownloadFailed(_) => "Failed to download the diff report. Please try again later.",
            Self::PollExhausted { .. } => "Lost contact with the server. Please try again later.",
            Self::Network(_) => "Network error. Please check your connection.",
            Self::Store(_) | Self::Io(_) => "Something went wrong. Please try again.",
        }
    }
}
