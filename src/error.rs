use std::io;

use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::{response_writer::ResponseWriter, status_code_registry::ReasonPhrase};

/// Route registration defects. These surface at startup, never per request.
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("invalid regex for parameter `{name}` in `{pattern}`: {source}")]
    InvalidRegex {
        pattern: String,
        name: String,
        #[source]
        source: regex::Error,
    },
    #[error("parameter `{name}` declared more than once in `{pattern}`")]
    DuplicateParam { pattern: String, name: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("could not access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("could not decode stored data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Error reported to API clients as `{"type": ..., "message": ...}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidJson(String),
    #[error("{0}")]
    FormatValidation(String),
    #[error("{0}")]
    DataValidation(String),
    #[error("internal server error")]
    Internal(#[from] StoreError),
}

impl ApiError {
    pub fn not_found() -> Self {
        Self::NotFound("resource not found".to_owned())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::InvalidJson(_) => "invalid_json",
            Self::FormatValidation(_) => "format_validation",
            Self::DataValidation(_) => "data_validation",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn reason_phrase(&self) -> ReasonPhrase {
        match self {
            Self::NotFound(_) => ReasonPhrase::NotFound,
            Self::InvalidJson(_) | Self::FormatValidation(_) => ReasonPhrase::BadRequest,
            Self::DataValidation(_) => ReasonPhrase::UnprocessableContent,
            Self::Internal(_) => ReasonPhrase::InternalServerError,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    message: String,
}

pub fn send_error(w: &mut ResponseWriter, err: &ApiError) {
    if let ApiError::Internal(source) = err {
        error!(?source);
    }
    w.set_reason_phrase(err.reason_phrase());
    w.set_json(&ErrorBody {
        kind: err.kind(),
        message: err.to_string(),
    });
}
