//! Callback host port — route registration on the local callback server.

use std::sync::Arc;

/// In-process function invoked when a callback route is hit.
pub type CallbackFn = Arc<dyn Fn() + Send + Sync>;

/// Registration surface of the local callback server.
///
/// Routes may be registered at any time, including while the server is
/// already listening; the last registration for a given path wins. A path
/// that was never registered answers 404, so callers must register a rule's
/// callback path before the remote trigger can fire.
pub trait CallbackHost {
    /// Register an in-process callback at `path`.
    fn register_callback(&self, path: &str, handler: CallbackFn);

    /// Register a redirect from `path` to `target`.
    fn register_redirect(&self, path: &str, target: &str);
}
