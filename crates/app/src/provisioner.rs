//! Provisioner — the rule-registration workflow against a remote registry.
//!
//! The workflow: log in, fetch the rules already on the remote, create the
//! planned rules as concurrent saves, feed every settled outcome (confirmed
//! rule or rejection) into the [`RuleCache`], and only then report completion.
//! A follow-up step disables and verifies one rule, picked by its plan name
//! rather than by position in the completion order.

use std::sync::Arc;

use tokio::task::JoinSet;

use rulebridge_domain::error::{NotFoundError, RegistryError, RuleBridgeError};
use rulebridge_domain::rule::{Action, Rule, SoftTrigger, TriggerIcon};

use crate::ports::{CallbackFn, CallbackHost, RuleRegistry};
use crate::rule_cache::RuleCache;

/// Declarative description of one rule to create.
pub struct RulePlan {
    /// Name of the rule; also the correlation key for its save outcome.
    pub name: String,
    pub trigger: SoftTrigger,
    pub effect: Effect,
}

/// What the planned rule should do when its trigger fires.
pub enum Effect {
    /// Hit an arbitrary absolute URL.
    Http { url: String },
    /// Invoke a path on the local callback server, running `on_hit` in
    /// process when the request arrives.
    Callback { path: String, on_hit: CallbackFn },
}

impl RulePlan {
    /// Plan a rule whose action is an HTTP request to `url`.
    #[must_use]
    pub fn http(name: impl Into<String>, trigger: SoftTrigger, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            trigger,
            effect: Effect::Http { url: url.into() },
        }
    }

    /// Plan a rule whose action calls back into this process at `path`.
    #[must_use]
    pub fn callback(
        name: impl Into<String>,
        trigger: SoftTrigger,
        path: impl Into<String>,
        on_hit: CallbackFn,
    ) -> Self {
        Self {
            name: name.into(),
            trigger,
            effect: Effect::Callback {
                path: path.into(),
                on_hit,
            },
        }
    }

    /// Convenience constructor bundling trigger creation and callback
    /// wiring: the rule and its soft trigger share `name`, the callback is
    /// hosted at `path`.
    #[must_use]
    pub fn trigger_callback(
        path: impl Into<String>,
        name: impl Into<String>,
        icon: TriggerIcon,
        on_hit: CallbackFn,
    ) -> Self {
        let name = name.into();
        Self {
            trigger: SoftTrigger::with_icon(name.clone(), icon),
            name,
            effect: Effect::Callback {
                path: path.into(),
                on_hit,
            },
        }
    }
}

/// Settled outcome of one planned save.
#[derive(Debug, Clone)]
pub struct SavedRule {
    /// Plan name the outcome belongs to.
    pub plan: String,
    /// Server-confirmed rule, or `None` when the remote rejected the save
    /// or the save failed in transit.
    pub rule: Option<Rule>,
    /// Error text when the save failed in transit.
    pub error: Option<String>,
}

/// Report produced once every planned save has settled.
#[derive(Debug, Clone, Default)]
pub struct ProvisionReport {
    /// One entry per plan, in completion order.
    pub saved: Vec<SavedRule>,
}

impl ProvisionReport {
    /// Server-confirmed rule for a plan name, if its save succeeded.
    #[must_use]
    pub fn saved_rule(&self, plan_name: &str) -> Option<&Rule> {
        self.saved
            .iter()
            .find(|s| s.plan == plan_name)
            .and_then(|s| s.rule.as_ref())
    }

    /// Number of saves the remote confirmed.
    #[must_use]
    pub fn confirmed_count(&self) -> usize {
        self.saved.iter().filter(|s| s.rule.is_some()).count()
    }
}

/// Drives the provisioning workflow over a [`RuleRegistry`] and a
/// [`CallbackHost`].
pub struct Provisioner<R, H> {
    registry: Arc<R>,
    host: H,
    cache: Arc<RuleCache>,
}

impl<R, H> Provisioner<R, H>
where
    R: RuleRegistry + Send + Sync + 'static,
    H: CallbackHost,
{
    /// Create a provisioner with an empty rule cache.
    pub fn new(registry: Arc<R>, host: H) -> Self {
        Self {
            registry,
            host,
            cache: Arc::new(RuleCache::new()),
        }
    }

    /// The cache holding seeded rules and save outcomes.
    #[must_use]
    pub fn cache(&self) -> &Arc<RuleCache> {
        &self.cache
    }

    /// Run the provisioning workflow for `plans`.
    ///
    /// Callback routes are registered on the host *before* the corresponding
    /// save is issued, so a rule can never be live on the remote while its
    /// local path is unreachable. Saves run concurrently; the returned report
    /// is complete — it contains one settled entry per plan. A rejected or
    /// failed save yields an entry with `rule: None` and does not abort the
    /// run.
    ///
    /// # Errors
    ///
    /// Returns an error when login or the initial rule listing fails, or
    /// when a plan fails domain validation. Individual save failures are
    /// reported, not raised.
    #[tracing::instrument(skip_all, fields(plans = plans.len()))]
    pub async fn provision(&self, plans: Vec<RulePlan>) -> Result<ProvisionReport, RuleBridgeError> {
        self.registry.login().await?;
        tracing::info!("logged in to remote registry");

        let existing = self.registry.system_rules().await?;
        tracing::info!(existing = existing.len(), "fetched remote rules");
        self.cache.seed(existing);

        let mut saves: JoinSet<(String, Result<Option<Rule>, RegistryError>)> = JoinSet::new();
        for plan in plans {
            let (name, rule) = self.prepare(plan)?;
            let registry = Arc::clone(&self.registry);
            saves.spawn(async move {
                let outcome = registry.save_rule(rule).await;
                (name, outcome)
            });
        }

        let mut report = ProvisionReport::default();
        while let Some(joined) = saves.join_next().await {
            let Ok((plan, outcome)) = joined else {
                tracing::error!("rule save task aborted");
                continue;
            };
            let entry = match outcome {
                Ok(rule) => {
                    if rule.is_none() {
                        tracing::warn!(plan = %plan, "remote rejected rule");
                    }
                    SavedRule {
                        plan,
                        rule,
                        error: None,
                    }
                }
                Err(err) => {
                    tracing::warn!(plan = %plan, error = %err, "rule save failed");
                    SavedRule {
                        plan,
                        rule: None,
                        error: Some(err.to_string()),
                    }
                }
            };
            self.cache.register(&entry.plan, entry.rule.clone());
            report.saved.push(entry);
        }

        tracing::info!(
            confirmed = report.confirmed_count(),
            total = report.saved.len(),
            "all rules made on system"
        );
        Ok(report)
    }

    /// Disable the rule saved for `plan_name` and return its confirmed
    /// remote state.
    ///
    /// # Errors
    ///
    /// Returns [`RuleBridgeError::NotFound`] when no confirmed rule exists
    /// for the plan, or a registry error from the disable/fetch calls.
    #[tracing::instrument(skip(self))]
    pub async fn finish(&self, plan_name: &str) -> Result<Rule, RuleBridgeError> {
        let saved = self.cache.saved(plan_name).ok_or_else(|| NotFoundError {
            entity: "Rule",
            id: plan_name.to_string(),
        })?;

        self.registry.set_rule_enabled(saved.id, false).await?;

        let confirmed = self
            .registry
            .rule(saved.id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "Rule",
                id: saved.id.to_string(),
            })?;

        tracing::info!(rule = %serde_json::json!(&confirmed), "rule disabled on remote");
        Ok(confirmed)
    }

    /// Turn a plan into a buildable rule, registering callback routes on the
    /// host first.
    fn prepare(&self, plan: RulePlan) -> Result<(String, Rule), RuleBridgeError> {
        let RulePlan {
            name,
            trigger,
            effect,
        } = plan;
        let action = match effect {
            Effect::Http { url } => Action::http(url),
            Effect::Callback { path, on_hit } => {
                self.host.register_callback(&path, on_hit);
                Action::local_callback(path)
            }
        };
        let rule = Rule::builder()
            .name(name.clone())
            .on(trigger)
            .action(action)
            .build()?;
        Ok((name, rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use rulebridge_domain::id::RuleId;

    /// Test double for the remote registry. Records every call; behavior is
    /// steered per plan name.
    #[derive(Default)]
    struct StubRegistry {
        fail_login: bool,
        remote_rules: Mutex<Vec<Rule>>,
        /// Plan names the remote rejects with a null save.
        reject: Vec<String>,
        /// Plan name whose save is delayed, and by how long.
        delay: Option<(String, Duration)>,
        /// Snapshot of host registrations, shared with the stub host, read
        /// at save time.
        routes_at_save: Arc<Mutex<Vec<String>>>,
        saves: Mutex<Vec<(String, Vec<String>)>>,
        disables: Mutex<Vec<(RuleId, bool)>>,
        stored: Mutex<HashMap<RuleId, Rule>>,
    }

    impl RuleRegistry for StubRegistry {
        async fn login(&self) -> Result<(), RegistryError> {
            if self.fail_login {
                Err(RegistryError::Auth("bad credentials".to_string()))
            } else {
                Ok(())
            }
        }

        async fn system_rules(&self) -> Result<Vec<Rule>, RegistryError> {
            Ok(self.remote_rules.lock().unwrap().clone())
        }

        async fn save_rule(&self, rule: Rule) -> Result<Option<Rule>, RegistryError> {
            if let Some((name, delay)) = &self.delay {
                if *name == rule.name {
                    tokio::time::sleep(*delay).await;
                }
            }
            let routes = self.routes_at_save.lock().unwrap().clone();
            self.saves.lock().unwrap().push((rule.name.clone(), routes));
            if self.reject.contains(&rule.name) {
                return Ok(None);
            }
            // The remote assigns its own canonical identifier.
            let canonical = Rule {
                id: RuleId::new(),
                ..rule
            };
            self.stored
                .lock()
                .unwrap()
                .insert(canonical.id, canonical.clone());
            Ok(Some(canonical))
        }

        async fn set_rule_enabled(&self, id: RuleId, enabled: bool) -> Result<(), RegistryError> {
            self.disables.lock().unwrap().push((id, enabled));
            if let Some(rule) = self.stored.lock().unwrap().get_mut(&id) {
                rule.enabled = enabled;
            }
            Ok(())
        }

        async fn rule(&self, id: RuleId) -> Result<Option<Rule>, RegistryError> {
            Ok(self.stored.lock().unwrap().get(&id).cloned())
        }
    }

    /// Test double for the callback host, sharing its route list with the
    /// stub registry.
    #[derive(Default, Clone)]
    struct StubHost {
        routes: Arc<Mutex<Vec<String>>>,
    }

    impl CallbackHost for StubHost {
        fn register_callback(&self, path: &str, _handler: CallbackFn) {
            self.routes.lock().unwrap().push(path.to_string());
        }

        fn register_redirect(&self, path: &str, _target: &str) {
            self.routes.lock().unwrap().push(path.to_string());
        }
    }

    fn noop() -> CallbackFn {
        Arc::new(|| {})
    }

    fn example_plans() -> Vec<RulePlan> {
        vec![
            RulePlan::http(
                "Soft Trigger Http Action",
                SoftTrigger::new("redirect"),
                "http://127.0.0.1:8080/welcome/",
            ),
            RulePlan::callback(
                "Soft Trigger Http Action -> node",
                SoftTrigger::new("Node callback"),
                "/test",
                noop(),
            ),
            RulePlan::trigger_callback(
                "/SimpleCallback",
                "Node callback - simple",
                TriggerIcon::LightsOn,
                noop(),
            ),
        ]
    }

    fn provisioner_with(registry: StubRegistry) -> (Provisioner<StubRegistry, StubHost>, Arc<StubRegistry>) {
        let host = StubHost::default();
        let mut registry = registry;
        registry.routes_at_save = Arc::clone(&host.routes);
        let registry = Arc::new(registry);
        (Provisioner::new(Arc::clone(&registry), host), registry)
    }

    #[tokio::test]
    async fn should_save_each_plan_exactly_once() {
        let (provisioner, registry) = provisioner_with(StubRegistry::default());
        provisioner.provision(example_plans()).await.unwrap();

        let saves = registry.saves.lock().unwrap();
        assert_eq!(saves.len(), 3);
        let mut names: Vec<_> = saves.iter().map(|(n, _)| n.clone()).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "Node callback - simple",
                "Soft Trigger Http Action",
                "Soft Trigger Http Action -> node",
            ]
        );
    }

    #[tokio::test]
    async fn should_register_callback_route_before_each_save() {
        let (provisioner, registry) = provisioner_with(StubRegistry::default());
        provisioner.provision(example_plans()).await.unwrap();

        let saves = registry.saves.lock().unwrap();
        let routes_when_node_saved = &saves
            .iter()
            .find(|(n, _)| n == "Soft Trigger Http Action -> node")
            .unwrap()
            .1;
        assert!(routes_when_node_saved.contains(&"/test".to_string()));

        let routes_when_simple_saved = &saves
            .iter()
            .find(|(n, _)| n == "Node callback - simple")
            .unwrap()
            .1;
        assert!(routes_when_simple_saved.contains(&"/SimpleCallback".to_string()));
    }

    #[tokio::test]
    async fn should_wait_for_all_saves_before_completing() {
        let (provisioner, _registry) = provisioner_with(StubRegistry {
            delay: Some((
                "Soft Trigger Http Action".to_string(),
                Duration::from_millis(100),
            )),
            ..StubRegistry::default()
        });

        let report = provisioner.provision(example_plans()).await.unwrap();
        // The delayed save must have settled by the time the report exists.
        assert_eq!(report.saved.len(), 3);
        assert!(report.saved_rule("Soft Trigger Http Action").is_some());
        assert_eq!(provisioner.cache().outcome_count(), 3);
    }

    #[tokio::test]
    async fn should_record_none_when_remote_rejects_a_save() {
        let (provisioner, _registry) = provisioner_with(StubRegistry {
            reject: vec!["Soft Trigger Http Action".to_string()],
            ..StubRegistry::default()
        });

        let report = provisioner.provision(example_plans()).await.unwrap();
        assert_eq!(report.saved.len(), 3);
        assert!(report.saved_rule("Soft Trigger Http Action").is_none());
        assert_eq!(report.confirmed_count(), 2);
        // The rejected outcome is in the cache, recorded as absent.
        assert!(provisioner.cache().outcome("Soft Trigger Http Action").is_some());
        assert!(provisioner.cache().saved("Soft Trigger Http Action").is_none());
    }

    #[tokio::test]
    async fn should_still_finish_other_rule_when_one_save_is_rejected() {
        let (provisioner, registry) = provisioner_with(StubRegistry {
            reject: vec!["Soft Trigger Http Action".to_string()],
            ..StubRegistry::default()
        });

        provisioner.provision(example_plans()).await.unwrap();
        let confirmed = provisioner.finish("Node callback - simple").await.unwrap();
        assert!(!confirmed.enabled);
        assert_eq!(registry.disables.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_disable_only_the_designated_rule() {
        let (provisioner, registry) = provisioner_with(StubRegistry::default());
        let report = provisioner.provision(example_plans()).await.unwrap();
        let designated = report.saved_rule("Node callback - simple").unwrap().id;

        provisioner.finish("Node callback - simple").await.unwrap();

        let disables = registry.disables.lock().unwrap();
        assert_eq!(disables.as_slice(), &[(designated, false)]);
    }

    #[tokio::test]
    async fn should_fail_when_login_fails() {
        let (provisioner, registry) = provisioner_with(StubRegistry {
            fail_login: true,
            ..StubRegistry::default()
        });

        let result = provisioner.provision(example_plans()).await;
        assert!(matches!(
            result,
            Err(RuleBridgeError::Registry(RegistryError::Auth(_)))
        ));
        // Nothing further executed.
        assert!(registry.saves.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_seed_cache_with_remote_rules() {
        let existing = Rule::builder()
            .name("pre-existing")
            .on(SoftTrigger::new("existing"))
            .action(Action::http("http://example.com/"))
            .build()
            .unwrap();
        let (provisioner, _registry) = provisioner_with(StubRegistry {
            remote_rules: Mutex::new(vec![existing]),
            ..StubRegistry::default()
        });

        provisioner.provision(example_plans()).await.unwrap();
        assert_eq!(provisioner.cache().seeded_count(), 1);
    }

    #[tokio::test]
    async fn should_return_not_found_when_finishing_unknown_plan() {
        let (provisioner, _registry) = provisioner_with(StubRegistry::default());
        provisioner.provision(example_plans()).await.unwrap();

        let result = provisioner.finish("no such plan").await;
        assert!(matches!(result, Err(RuleBridgeError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_fail_when_plan_violates_domain_invariants() {
        let (provisioner, registry) = provisioner_with(StubRegistry::default());
        let plans = vec![RulePlan::http(
            "",
            SoftTrigger::new("redirect"),
            "http://example.com/",
        )];

        let result = provisioner.provision(plans).await;
        assert!(matches!(result, Err(RuleBridgeError::Validation(_))));
        assert!(registry.saves.lock().unwrap().is_empty());
    }
}
