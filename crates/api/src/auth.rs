//! Principal extraction and capability checks
//!
//! Credential verification lives in the identity service; the gateway
//! forwards the verified subject/role pair in trusted headers. This
//! module only parses those headers and consults the capability table.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{DateTime, Utc};

use pgtracker_core::{Action, Error as CoreError, PermissionMatrix, Principal, Role};

use crate::error::ApiError;

/// Header carrying the verified subject identifier
pub const SUBJECT_HEADER: &str = "x-auth-subject";
/// Header carrying the verified role
pub const ROLE_HEADER: &str = "x-auth-role";
/// Optional header carrying the credential expiry (RFC 3339)
pub const EXPIRY_HEADER: &str = "x-auth-expiry";

/// Extractor for the verified principal attached to each request
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub Principal);

impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = principal_from_parts(parts)?;
        if principal.is_expired(Utc::now()) {
            return Err(ApiError::Unauthorized("credential has expired".into()));
        }
        Ok(AuthPrincipal(principal))
    }
}

fn principal_from_parts(parts: &Parts) -> Result<Principal, ApiError> {
    let subject = header_value(parts, SUBJECT_HEADER)?
        .ok_or_else(|| ApiError::Unauthorized(format!("missing {SUBJECT_HEADER} header")))?;
    let role_raw = header_value(parts, ROLE_HEADER)?
        .ok_or_else(|| ApiError::Unauthorized(format!("missing {ROLE_HEADER} header")))?;
    let role = Role::parse(role_raw)
        .ok_or_else(|| ApiError::Unauthorized(format!("unknown role {role_raw}")))?;

    let mut principal = Principal::new(subject.to_string(), role);
    if let Some(raw) = header_value(parts, EXPIRY_HEADER)? {
        let expiry = DateTime::parse_from_rfc3339(raw)
            .map_err(|_| ApiError::Unauthorized("unparseable credential expiry".into()))?;
        principal = principal.with_expiry(expiry.with_timezone(&Utc));
    }
    Ok(principal)
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Result<Option<&'a str>, ApiError> {
    match parts.headers.get(name) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(Some)
            .map_err(|_| ApiError::Unauthorized(format!("unreadable {name} header"))),
    }
}

/// Gate an operation on the capability table
pub fn require(principal: &Principal, action: Action) -> Result<(), ApiError> {
    if PermissionMatrix::can_perform(principal.role, action) {
        Ok(())
    } else {
        Err(CoreError::PermissionDenied(format!(
            "role {} may not perform this operation",
            principal.role
        ))
        .into())
    }
}
