//! # rulebridge-domain
//!
//! Pure domain model for the rulebridge rule-provisioning system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Rules** (trigger → action bindings registered on a remote system)
//! - Define **Soft Triggers** (manually activated event conditions with an icon)
//! - Define **Actions** (the effect a rule performs when it fires)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod rule;
