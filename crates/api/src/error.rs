use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutogiftError {
    #[error("Internal server error")]
    InternalError,
    #[error("Invalid data provided: {0}")]
    BadClientData(String),
    #[error("Conflict with the current state: {0}")]
    Conflict(String),
    #[error("Unauthorized request: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Too many requests: {0}")]
    TooManyRequests(String),
}

/// Body of every error response, the app shows `message` to the user
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status: u16,
    message: String,
}

impl AutogiftError {
    fn message(&self) -> String {
        match self {
            Self::InternalError => "Something went wrong, please try again later".into(),
            Self::BadClientData(msg)
            | Self::Conflict(msg)
            | Self::Unauthorized(msg)
            | Self::NotFound(msg)
            | Self::TooManyRequests(msg) => msg.clone(),
        }
    }
}

impl actix_web::error::ResponseError for AutogiftError {
    fn status_code(&self) -> StatusCode {
        match *self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadClientData(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorBody {
            status: status.as_u16(),
            message: self.message(),
        })
    }
}
