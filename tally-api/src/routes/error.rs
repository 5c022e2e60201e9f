use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use timesheet::TimesheetError;

use crate::services::sheet_source::{DataRefreshError, SheetFetchError};

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    #[allow(dead_code)]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<TimesheetError> for ApiError {
    fn from(err: TimesheetError) -> Self {
        match err {
            TimesheetError::Empty => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            TimesheetError::MissingColumn(_)
            | TimesheetError::Validation(_)
            | TimesheetError::Csv(_) => Self::bad_request(err.to_string()),
        }
    }
}

impl From<DataRefreshError> for ApiError {
    fn from(err: DataRefreshError) -> Self {
        match err {
            DataRefreshError::Fetch(SheetFetchError::NotConfigured) => {
                Self::bad_request("no sheet url configured")
            }
            DataRefreshError::Fetch(ref fetch) => {
                tracing::error!("sheet fetch failed: {:?}", fetch);
                Self::bad_gateway(err.to_string())
            }
            DataRefreshError::Parse(parse) => parse.into(),
        }
    }
}
