//! # rulebridge-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `RuleRegistry` — remote rule registry operations (login, list, save,
//!     enable/disable, fetch by id)
//!   - `CallbackHost` — route registration on the local callback server
//! - Provide the in-memory [`RuleCache`](rule_cache::RuleCache) of rules
//!   registered during a run
//! - Drive the [`Provisioner`](provisioner::Provisioner) workflow:
//!   login → fetch remote rules → create rules concurrently → record every
//!   outcome → disable and verify a designated rule
//!
//! ## Dependency rule
//! Depends on `rulebridge-domain` only (plus `tokio` for tasks and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod ports;
pub mod provisioner;
pub mod rule_cache;
