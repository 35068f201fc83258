use std::fmt;

use actix_multipart::MultipartError;
use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;

#[derive(Debug)]
pub enum AppError {
    InvalidInput(String),
    NotFound(String),
    PayloadTooLarge(String),
    InternalError(String),
}

impl AppError {
    /// The bare message sent back to clients in the `error` field.
    pub fn message(&self) -> &str {
        match self {
            AppError::InvalidInput(msg)
            | AppError::NotFound(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::InternalError(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg)
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        if let AppError::InternalError(msg) = self {
            tracing::error!("Request failed: {}", msg);
        }

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(serde_json::json!({"error": self.message()}))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalError(format!("Database error: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::InternalError(format!("Malformed multipart body: {}", err))
    }
}

impl From<FileStoreError> for AppError {
    fn from(err: FileStoreError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

#[derive(Debug, Display)]
pub enum FileStoreError {
    #[display("Invalid file name: {_0}")]
    InvalidName(String),

    #[display("Failed to write {_0}: {_1}")]
    Write(String, std::io::Error),

    #[display("Failed to read {_0}: {_1}")]
    Read(String, std::io::Error),
}

impl std::error::Error for FileStoreError {}

#[derive(Debug, Display)]
pub enum SecretsError {
    #[display("Configuration file not found")]
    ConfigMissing,

    #[display("Failed to read configuration file: {_0}")]
    Read(std::io::Error),

    #[display("Failed to parse configuration file: {_0}")]
    Parse(serde_json::Error),
}

impl std::error::Error for SecretsError {}
