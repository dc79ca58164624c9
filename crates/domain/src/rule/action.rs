//! Action — the effect performed when a rule fires.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An effect the remote system performs when the rule's trigger fires.
///
/// The reachability invariant lives with the caller: an `Http` URL must be
/// resolvable by the remote system, and a `LocalCallback` path must be
/// registered on the local callback server before the trigger can fire,
/// otherwise the callback request is dropped with a 404.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Issue an HTTP request to an arbitrary absolute URL.
    Http { url: String },
    /// Invoke a path hosted on the local callback server.
    LocalCallback { path: String },
}

impl Action {
    /// HTTP action hitting `url`.
    #[must_use]
    pub fn http(url: impl Into<String>) -> Self {
        Self::Http { url: url.into() }
    }

    /// Callback action invoking `path` on the local server.
    ///
    /// A missing leading slash is added, so `"test"` and `"/test"` name the
    /// same path.
    #[must_use]
    pub fn local_callback(path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        Self::LocalCallback { path }
    }

    /// Check action invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::RelativeActionUrl`] for a non-absolute
    /// HTTP URL and [`ValidationError::EmptyCallbackPath`] for an empty
    /// callback path.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Http { url } => {
                if url.starts_with("http://") || url.starts_with("https://") {
                    Ok(())
                } else {
                    Err(ValidationError::RelativeActionUrl(url.clone()))
                }
            }
            Self::LocalCallback { path } => {
                if path.trim_matches('/').is_empty() {
                    Err(ValidationError::EmptyCallbackPath)
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http { url } => write!(f, "http({url})"),
            Self::LocalCallback { path } => write!(f, "local_callback({path})"),
        }
    }
}
