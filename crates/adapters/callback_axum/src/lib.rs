//! # rulebridge-adapter-callback-axum
//!
//! The local callback server: an axum listener whose routes live in a
//! run-time-mutable table. Remote rules with a local-callback action hit
//! this server when they fire; the matching route runs an in-process
//! function or answers with a redirect.
//!
//! The [`CallbackRoutes`] handle implements the app's `CallbackHost` port,
//! so routes can be registered before or while the server is listening —
//! the last registration for a path wins, and unregistered paths answer 404.

pub mod router;
pub mod routes;
pub mod server;

pub use routes::CallbackRoutes;
pub use server::CallbackServer;
