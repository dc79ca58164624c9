//! # rulebridge-adapter-registry-http
//!
//! HTTP implementation of the `RuleRegistry` port. Talks to the remote
//! rule registry's REST API:
//!
//! - `POST /api/login` — exchange credentials for a bearer token
//! - `GET /api/rules` — list the rules currently on the system
//! - `POST /api/rules` — save a rule; the response carries the canonical,
//!   server-assigned version
//! - `POST /api/rules/{id}/enabled` — toggle enabled state
//! - `GET /api/rules/{id}` — fetch one rule for verification
//!
//! A save the remote rejects surfaces as `Ok(None)` (the caller decides how
//! to proceed); transport and authentication failures are real errors.

pub mod client;

pub use client::HttpRuleRegistry;
