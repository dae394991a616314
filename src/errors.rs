// src/errors.rs
use astra::Response;
use std::fmt;

/// Errors originating from the server surface (routing, uploads,
/// export) or the layers underneath (DB, workbook I/O).
#[derive(Debug)]
pub enum ServerError {
    NotFound,
    BadRequest(String),
    UploadError(String),
    DbError(String),
    XlsxError(String),
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::NotFound => write!(f, "Not Found"),
            ServerError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            ServerError::UploadError(msg) => write!(f, "Upload Error: {msg}"),
            ServerError::DbError(msg) => write!(f, "Database Error: {msg}"),
            ServerError::XlsxError(msg) => write!(f, "Spreadsheet Error: {msg}"),
            ServerError::InternalError => write!(f, "Internal Server Error"),
        }
    }
}

impl std::error::Error for ServerError {}
