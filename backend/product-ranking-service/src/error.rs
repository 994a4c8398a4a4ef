use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::services::catalog::StoreError;

pub type Result<T> = std::result::Result<T, AppError>;

/// Body returned for every store failure; the cause stays in the logs.
pub const GENERIC_FETCH_ERROR: &str = "Error fetching products";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} is required")]
    MissingParameter(&'static str),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let code = self.status_code();
        let message = match self {
            AppError::MissingParameter(_) => self.to_string(),
            AppError::DataSourceUnavailable(_) => GENERIC_FETCH_ERROR.to_string(),
        };

        HttpResponse::build(code).json(ErrorResponse {
            error: message,
            code: code.as_u16(),
        })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            AppError::DataSourceUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::DataSourceUnavailable(err.to_string())
    }
}
