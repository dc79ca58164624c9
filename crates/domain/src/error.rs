//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`RuleBridgeError`] via `#[from]`. Adapters never surface `String`-typed
//! errors across the port boundary.

/// Top-level error for the workspace.
#[derive(Debug, thiserror::Error)]
pub enum RuleBridgeError {
    /// A domain invariant was violated.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A lookup found nothing.
    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    /// Talking to the remote rule registry failed.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Validation failures raised by domain invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A rule's name must not be empty.
    #[error("rule name must not be empty")]
    EmptyRuleName,

    /// A soft trigger's name must not be empty.
    #[error("trigger name must not be empty")]
    EmptyTriggerName,

    /// A rule must carry a trigger.
    #[error("rule has no trigger")]
    MissingTrigger,

    /// A rule must carry an action.
    #[error("rule has no action")]
    MissingAction,

    /// An HTTP action's URL must be absolute, otherwise the remote system
    /// cannot resolve it when the rule fires.
    #[error("http action url is not absolute: {0}")]
    RelativeActionUrl(String),

    /// A local callback action's path must not be empty.
    #[error("callback path must not be empty")]
    EmptyCallbackPath,
}

/// A lookup that found nothing.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    /// Kind of thing that was looked up (e.g. `"Rule"`).
    pub entity: &'static str,
    /// Identifier or correlation key that was searched for.
    pub id: String,
}

/// Failures talking to the remote rule registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The remote rejected the stored credentials.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// An operation requiring a session was attempted before `login`.
    #[error("not logged in")]
    NotLoggedIn,

    /// The remote could not be reached or the connection failed mid-flight.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The remote answered with a status the client does not understand.
    #[error("unexpected response {status}: {body}")]
    UnexpectedResponse {
        /// HTTP status code.
        status: u16,
        /// Response body, as received.
        body: String,
    },

    /// The remote answered 2xx but the body did not parse.
    #[error("malformed response body: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_validation_error_into_top_level_error() {
        let err: RuleBridgeError = ValidationError::EmptyRuleName.into();
        assert!(matches!(
            err,
            RuleBridgeError::Validation(ValidationError::EmptyRuleName)
        ));
    }

    #[test]
    fn should_convert_not_found_error_into_top_level_error() {
        let err: RuleBridgeError = NotFoundError {
            entity: "Rule",
            id: "abc".to_string(),
        }
        .into();
        assert!(matches!(err, RuleBridgeError::NotFound(_)));
    }

    #[test]
    fn should_render_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "Rule",
            id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Rule not found: abc");
    }

    #[test]
    fn should_render_unexpected_response_with_status() {
        let err = RegistryError::UnexpectedResponse {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "unexpected response 503: overloaded");
    }
}
