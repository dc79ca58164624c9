//! Rule registry port — operations against the remote rule registry.

use std::future::Future;

use rulebridge_domain::error::RegistryError;
use rulebridge_domain::id::RuleId;
use rulebridge_domain::rule::Rule;

/// Client contract for the remote system holding trigger → action rules.
///
/// All operations are network calls. `save_rule` distinguishes between a
/// remote *rejection* (`Ok(None)` — the original API's null result, which
/// callers must handle) and a *transport* failure (`Err`).
pub trait RuleRegistry {
    /// Authenticate with the stored credentials, establishing a session.
    fn login(&self) -> impl Future<Output = Result<(), RegistryError>> + Send;

    /// Retrieve the current rule set from the remote system, in remote order.
    fn system_rules(&self) -> impl Future<Output = Result<Vec<Rule>, RegistryError>> + Send;

    /// Persist a locally built rule.
    ///
    /// Returns the server-confirmed rule (the remote may assign its own
    /// canonical identifier), or `None` when the remote rejects the rule.
    fn save_rule(
        &self,
        rule: Rule,
    ) -> impl Future<Output = Result<Option<Rule>, RegistryError>> + Send;

    /// Toggle a rule's enabled state remotely. Side effect only.
    fn set_rule_enabled(
        &self,
        id: RuleId,
        enabled: bool,
    ) -> impl Future<Output = Result<(), RegistryError>> + Send;

    /// Fetch one rule's current remote state by identifier.
    fn rule(&self, id: RuleId)
    -> impl Future<Output = Result<Option<Rule>, RegistryError>> + Send;
}
