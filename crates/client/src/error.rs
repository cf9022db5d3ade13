//! Error classification.
//!
//! The remote API fails in heterogeneous shapes: bare status codes, plain
//! string bodies, ordered lists of validation messages, JSON objects, and
//! transport errors. [`classify`] turns any of them into one of four fixed
//! kinds with a user-facing display string.
//!
//! Precedence is fixed and tested: the HTTP status wins over body-shape
//! heuristics, so a 403 carrying the string body `"Bad input"` classifies as
//! `Forbidden("Bad input")`, not `ValidationFailed`.
//!
//! Classification is pure. Whether `Unauthenticated` also clears the
//! identity and navigates to login is the caller's decision.

use thiserror::Error;

use crate::gateway::{ErrorBody, GatewayError};
use crate::notify::messages;

/// The fixed failure taxonomy surfaced to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// No or invalid identity (HTTP 401).
    #[error("please login to the site")]
    Unauthenticated,

    /// Role mismatch or server-denied operation (HTTP 403), with the
    /// server-supplied reason when one was embedded.
    #[error("{0}")]
    Forbidden(String),

    /// Malformed input rejected by the server, carrying its exact message.
    #[error("{0}")]
    ValidationFailed(String),

    /// Transport or unknown failure with a best-effort message.
    #[error("{0}")]
    NetworkOrServer(String),
}

/// Classify a remote-call failure.
///
/// Resolution order: status 401, status 403, string body, string-list body,
/// generic message, fixed fallback.
#[must_use]
pub fn classify(err: &GatewayError) -> ErrorKind {
    match err {
        GatewayError::Status { status: 401, .. } => ErrorKind::Unauthenticated,
        GatewayError::Status { status: 403, body } => ErrorKind::Forbidden(
            embedded_message(body).unwrap_or_else(|| messages::ACCESS_DENIED.to_owned()),
        ),
        GatewayError::Status { body, .. } => match body {
            ErrorBody::Text(message) => ErrorKind::ValidationFailed(message.clone()),
            ErrorBody::List(list) => list.first().map_or_else(
                || ErrorKind::NetworkOrServer(messages::GENERAL_ERROR.to_owned()),
                |first| ErrorKind::ValidationFailed(first.clone()),
            ),
            ErrorBody::Json(_) | ErrorBody::Empty => ErrorKind::NetworkOrServer(
                embedded_message(body).unwrap_or_else(|| messages::GENERAL_ERROR.to_owned()),
            ),
        },
        GatewayError::Transport(message) | GatewayError::Parse(message) => {
            ErrorKind::NetworkOrServer(message.clone())
        }
    }
}

/// Best-effort extraction of a server-supplied message from a failure body.
fn embedded_message(body: &ErrorBody) -> Option<String> {
    match body {
        ErrorBody::Text(message) => Some(message.clone()),
        ErrorBody::List(list) => list.first().cloned(),
        ErrorBody::Json(value) => value
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_owned),
        ErrorBody::Empty => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn status(status: u16, body: ErrorBody) -> GatewayError {
        GatewayError::Status { status, body }
    }

    #[test]
    fn test_401_wins_over_any_body() {
        let err = status(401, ErrorBody::Text("you shall not pass".to_owned()));
        assert_eq!(classify(&err), ErrorKind::Unauthenticated);
    }

    #[test]
    fn test_403_uses_embedded_string_body() {
        // Status precedence over body-type heuristics: a string body on a
        // 403 is the forbidden reason, not a validation message.
        let err = status(403, ErrorBody::Text("Bad input".to_owned()));
        assert_eq!(classify(&err), ErrorKind::Forbidden("Bad input".to_owned()));
    }

    #[test]
    fn test_403_uses_first_list_element() {
        let err = status(
            403,
            ErrorBody::List(vec!["first reason".to_owned(), "second".to_owned()]),
        );
        assert_eq!(
            classify(&err),
            ErrorKind::Forbidden("first reason".to_owned())
        );
    }

    #[test]
    fn test_403_without_body_falls_back_to_access_denied() {
        let err = status(403, ErrorBody::Empty);
        assert_eq!(
            classify(&err),
            ErrorKind::Forbidden("access denied".to_owned())
        );
    }

    #[test]
    fn test_string_body_is_exact_validation_message() {
        let err = status(400, ErrorBody::Text("coupon title already exists".to_owned()));
        assert_eq!(
            classify(&err),
            ErrorKind::ValidationFailed("coupon title already exists".to_owned())
        );
    }

    #[test]
    fn test_list_body_uses_first_element() {
        let err = status(
            400,
            ErrorBody::List(vec!["price must be positive".to_owned(), "other".to_owned()]),
        );
        assert_eq!(
            classify(&err),
            ErrorKind::ValidationFailed("price must be positive".to_owned())
        );
    }

    #[test]
    fn test_json_message_field_is_generic_failure() {
        let err = status(500, ErrorBody::Json(json!({"message": "db down"})));
        assert_eq!(
            classify(&err),
            ErrorKind::NetworkOrServer("db down".to_owned())
        );
    }

    #[test]
    fn test_transport_message_is_generic_failure() {
        let err = GatewayError::Transport("connection refused".to_owned());
        assert_eq!(
            classify(&err),
            ErrorKind::NetworkOrServer("connection refused".to_owned())
        );
    }

    #[test]
    fn test_fallback_message() {
        let err = status(500, ErrorBody::Empty);
        assert_eq!(
            classify(&err),
            ErrorKind::NetworkOrServer("general error occurred, please try again.".to_owned())
        );
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(
            ErrorKind::Unauthenticated.to_string(),
            "please login to the site"
        );
        assert_eq!(
            ErrorKind::Forbidden("access denied".to_owned()).to_string(),
            "access denied"
        );
    }
}
