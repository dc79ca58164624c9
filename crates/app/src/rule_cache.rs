//! In-memory cache of rules known to this run.
//!
//! Holds the rules found on the remote at startup (plus any pre-seeded from
//! configuration) and the outcome of every save issued during provisioning,
//! keyed by the originating plan name. The plan name is the correlation key
//! used to pick a rule for follow-up operations; nothing here depends on the
//! order in which concurrent saves complete.

use std::collections::HashMap;
use std::sync::Mutex;

use rulebridge_domain::rule::Rule;
use rulebridge_domain::time::{self, Timestamp};

/// Recorded result of one save operation.
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    /// Server-confirmed rule, or `None` when the remote rejected the save.
    pub rule: Option<Rule>,
    /// When the outcome was recorded.
    pub registered_at: Timestamp,
}

#[derive(Default)]
struct Inner {
    seeded: Vec<Rule>,
    outcomes: HashMap<String, SaveOutcome>,
}

/// Process-wide cache of configuration-seeded and run-created rules.
#[derive(Default)]
pub struct RuleCache {
    inner: Mutex<Inner>,
}

impl RuleCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append already-existing rules (from the remote listing or the config
    /// file) to the seeded set.
    pub fn seed(&self, rules: Vec<Rule>) {
        let mut inner = self.inner.lock().expect("rule cache poisoned");
        inner.seeded.extend(rules);
    }

    /// Number of seeded rules.
    #[must_use]
    pub fn seeded_count(&self) -> usize {
        self.inner.lock().expect("rule cache poisoned").seeded.len()
    }

    /// Record the outcome of a save. A `None` rule (failed save) is recorded
    /// like any other outcome.
    pub fn register(&self, plan_name: &str, rule: Option<Rule>) {
        let mut inner = self.inner.lock().expect("rule cache poisoned");
        inner.outcomes.insert(
            plan_name.to_string(),
            SaveOutcome {
                rule,
                registered_at: time::now(),
            },
        );
    }

    /// Server-confirmed rule for a plan, if the save succeeded.
    #[must_use]
    pub fn saved(&self, plan_name: &str) -> Option<Rule> {
        let inner = self.inner.lock().expect("rule cache poisoned");
        inner.outcomes.get(plan_name).and_then(|o| o.rule.clone())
    }

    /// Full recorded outcome for a plan, if any save settled for it.
    #[must_use]
    pub fn outcome(&self, plan_name: &str) -> Option<SaveOutcome> {
        let inner = self.inner.lock().expect("rule cache poisoned");
        inner.outcomes.get(plan_name).cloned()
    }

    /// Number of settled save outcomes (successes and failures).
    #[must_use]
    pub fn outcome_count(&self) -> usize {
        self.inner.lock().expect("rule cache poisoned").outcomes.len()
    }
}
