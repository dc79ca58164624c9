//! Rule — a trigger → action binding registered on a remote system.
//!
//! A rule declares that when its [`SoftTrigger`] fires on the remote
//! system, the system performs the rule's [`Action`]. Rules are built
//! locally through an immutable builder, persisted remotely, and may be
//! disabled afterwards without being deleted.

mod action;
mod trigger;

pub use action::Action;
pub use trigger::{SoftTrigger, TriggerIcon};

use serde::{Deserialize, Serialize};

use crate::error::{RuleBridgeError, ValidationError};
use crate::id::RuleId;

/// A trigger → action binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    pub enabled: bool,
    pub trigger: SoftTrigger,
    pub action: Action,
    /// Free-text annotation shown alongside the rule on the remote system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Rule {
    /// Create a builder for constructing a [`Rule`].
    #[must_use]
    pub fn builder() -> RuleBuilder {
        RuleBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RuleBridgeError::Validation`] when:
    /// - `name` is empty ([`ValidationError::EmptyRuleName`])
    /// - the trigger's name is empty ([`ValidationError::EmptyTriggerName`])
    /// - an HTTP action's URL is not absolute ([`ValidationError::RelativeActionUrl`])
    /// - a callback action's path is empty ([`ValidationError::EmptyCallbackPath`])
    pub fn validate(&self) -> Result<(), RuleBridgeError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyRuleName.into());
        }
        if self.trigger.name.is_empty() {
            return Err(ValidationError::EmptyTriggerName.into());
        }
        self.action.validate()?;
        Ok(())
    }
}

/// Step-by-step builder for [`Rule`].
///
/// The builder is consumed by [`build`](RuleBuilder::build), which validates
/// and returns a fully-formed value; there is no mutable chained state on the
/// rule itself.
#[derive(Debug, Default)]
pub struct RuleBuilder {
    id: Option<RuleId>,
    name: Option<String>,
    enabled: Option<bool>,
    trigger: Option<SoftTrigger>,
    action: Option<Action>,
    comment: Option<String>,
}

impl RuleBuilder {
    #[must_use]
    pub fn id(mut self, id: RuleId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Set the trigger this rule reacts to.
    #[must_use]
    pub fn on(mut self, trigger: SoftTrigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Set the action performed when the trigger fires.
    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Consume the builder, validate, and return a [`Rule`].
    ///
    /// # Errors
    ///
    /// Returns [`RuleBridgeError::Validation`] if the trigger or action is
    /// missing, or if any domain invariant fails.
    pub fn build(self) -> Result<Rule, RuleBridgeError> {
        let trigger = self.trigger.ok_or(ValidationError::MissingTrigger)?;
        let action = self.action.ok_or(ValidationError::MissingAction)?;
        let rule = Rule {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            enabled: self.enabled.unwrap_or(true),
            trigger,
            action,
            comment: self.comment,
        };
        rule.validate()?;
        Ok(rule)
    }
}
