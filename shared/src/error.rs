use lambda_http::http::StatusCode;
use thiserror::Error;

/// Everything that can stop a redirect from being stored. Each kind knows the
/// HTTP status it is reported with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("Event doesn't contain a parsable JSON body")]
    BadRequestBody,
    #[error("Event body must contain a `url` and `slug`")]
    MissingField,
    #[error("Not a valid URL")]
    InvalidUrl,
    #[error("Not a valid URL for shortening")]
    InvalidUrlShape,
    #[error("{message}")]
    StorageWrite { message: String },
    #[error("{message}")]
    Http { status_code: u16, message: String },
    #[error("{message}")]
    Unexpected { message: String },
}

impl HandlerError {
    pub fn http(status_code: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status_code,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::BadRequestBody
            | HandlerError::MissingField
            | HandlerError::InvalidUrl
            | HandlerError::InvalidUrlShape => StatusCode::BAD_REQUEST,
            HandlerError::Http { status_code, .. } => StatusCode::from_u16(*status_code)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            HandlerError::StorageWrite { .. } | HandlerError::Unexpected { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message reported to the caller. Falls back to the debug representation
    /// when the error carries no text of its own.
    pub fn message(&self) -> String {
        let message = self.to_string();
        if message.is_empty() {
            format!("{:?}", self)
        } else {
            message
        }
    }
}
