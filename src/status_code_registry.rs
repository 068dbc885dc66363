use std::{collections::HashMap, fmt::Display};

use lazy_static::lazy_static;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

// https://www.iana.org/assignments/http-status-codes/http-status-codes.xhtml
// Only the codes this service emits are listed.

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, EnumIter)]
#[repr(u16)]
pub enum ReasonPhrase {
    // Success
    OK = 200,
    Created = 201,
    NoContent = 204,
    // Client Error
    BadRequest = 400,
    NotFound = 404,
    UnprocessableContent = 422,
    // Server Error
    InternalServerError = 500,
}

impl ReasonPhrase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OK => "OK",
            Self::Created => "Created",
            Self::NoContent => "No Content",
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::UnprocessableContent => "Unprocessable Content",
            Self::InternalServerError => "Internal Server Error",
        }
    }
}

impl Display for ReasonPhrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

lazy_static! {
    static ref STATUS_CODE_REGISTRY: StatusCodeRegistry = StatusCodeRegistry::new();
}

pub fn get_status_code(reason_phrase: ReasonPhrase) -> u16 {
    STATUS_CODE_REGISTRY.get_status_code(reason_phrase)
}

struct StatusCodeRegistry {
    status_code_lookup: HashMap<ReasonPhrase, u16>,
}

impl StatusCodeRegistry {
    fn new() -> Self {
        let status_code_lookup = ReasonPhrase::iter()
            .map(|reason_phrase| (reason_phrase, reason_phrase as u16))
            .collect();
        Self { status_code_lookup }
    }

    fn get_status_code(&self, reason_phrase: ReasonPhrase) -> u16 {
        // Every variant is inserted in `new`, the fallback is unreachable.
        self.status_code_lookup
            .get(&reason_phrase)
            .copied()
            .unwrap_or(reason_phrase as u16)
    }
}
