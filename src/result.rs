//! The uniform `ok(T)` / `err(code, message)` contract every CRM gateway
//! operation and tool handler returns across its boundary. Mirrors
//! `crm_result.py`'s `Payload`/`ok`/`err` helpers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed taxonomy of error codes. Adding a variant here is a contract
/// change — every caller matching on this enum must be updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ValidationError,
    NotFound,
    Conflict,
    Unauthorized,
    RateLimited,
    CrmUnavailable,
    CrmBadResponse,
    CrmError,
    NetworkError,
    InvalidResponse,
    HttpError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationError => "validation_error",
            ErrorCode::NotFound => "not_found",
            ErrorCode::Conflict => "conflict",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::RateLimited => "rate_limited",
            ErrorCode::CrmUnavailable => "crm_unavailable",
            ErrorCode::CrmBadResponse => "crm_bad_response",
            ErrorCode::CrmError => "crm_error",
            ErrorCode::NetworkError => "network_error",
            ErrorCode::InvalidResponse => "invalid_response",
            ErrorCode::HttpError => "http_error",
            ErrorCode::InternalError => "internal_error",
        };
        f.write_str(s)
    }
}

/// A user-safe failure: `code` is machine-matchable, `message` is the only
/// text allowed to reach the agent. Diagnostic detail belongs in logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub error: String,
}

pub type Payload<T> = Result<T, ErrorPayload>;

pub fn ok<T>(value: T) -> Payload<T> {
    Ok(value)
}

pub fn err<T>(code: ErrorCode, message: impl Into<String>) -> Payload<T> {
    Err(ErrorPayload {
        code,
        error: message.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_renders_snake_case() {
        assert_eq!(ErrorCode::ValidationError.to_string(), "validation_error");
        assert_eq!(ErrorCode::CrmBadResponse.to_string(), "crm_bad_response");
    }

    #[test]
    fn ok_and_err_round_trip() {
        let value: Payload<i32> = ok(42);
        assert_eq!(value.unwrap(), 42);

        let failure: Payload<i32> = err(ErrorCode::NotFound, "not found");
        let payload = failure.unwrap_err();
        assert_eq!(payload.code, ErrorCode::NotFound);
        assert_eq!(payload.error, "not found");
    }
}
