use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned invalid JSON (status {})", .status.as_u16())]
    InvalidJson { status: StatusCode },

    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The server answered with `success: false`.
    #[error("{}", .message.as_deref().unwrap_or("request failed"))]
    Server {
        status: StatusCode,
        message: Option<String>,
        error_type: Option<String>,
        field: Option<String>,
        details: Option<serde_json::Value>,
    },

    #[error("response for {operation} carried no data")]
    MissingData { operation: &'static str },

    #[error("failed to read upload: {0}")]
    Upload(#[from] UploadError),

    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn is_server(&self) -> bool {
        matches!(self, ApiError::Server { .. })
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },

    #[error("expected an image, got {mime}")]
    NotAnImage { mime: String },

    #[error("{}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("encoding task failed: {0}")]
    Encode(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("الرجاء ملء جميع الحقول")]
    MissingFields,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to write session file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}
