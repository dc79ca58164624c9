//! `rulebridged` — registers soft-trigger rules on a remote registry and
//! serves their HTTP callbacks locally.
//!
//! On startup the daemon binds the callback server, logs in to the remote
//! registry, provisions the example rules concurrently, then disables and
//! verifies one of them before settling into serving callbacks until
//! interrupted.

mod config;

use std::sync::Arc;

use rulebridge_adapter_callback_axum::CallbackServer;
use rulebridge_adapter_registry_http::HttpRuleRegistry;
use rulebridge_app::ports::CallbackHost;
use rulebridge_app::provisioner::{Provisioner, RulePlan};
use rulebridge_domain::rule::{SoftTrigger, TriggerIcon};

use crate::config::Config;

/// Plan whose rule gets disabled and re-fetched once provisioning settles.
const VERIFIED_PLAN: &str = "Node callback - simple";

fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            std::process::exit(1);
        }
    };
    init_tracing(&config.logging.filter);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!(error = %err, "unable to start async runtime");
            std::process::exit(1);
        }
    };

    if let Err(err) = runtime.block_on(run(config)) {
        tracing::error!(error = %err, "fatal error");
        std::process::exit(1);
    }
}

fn init_tracing(filter: &str) {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

async fn run(config: Config) -> anyhow::Result<()> {
    let server = CallbackServer::new(config.my_ip.clone(), config.my_port);
    let routes = server.routes();

    // The welcome route must exist before any remote rule can point at it.
    routes.register_redirect("/welcome/", "https://www.google.com/");

    let bound = server.bind().await?;
    tracing::info!(addr = %bound.local_addr()?, "callback server listening");
    let serving = tokio::spawn(bound.serve_with_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown requested");
    }));

    let registry = Arc::new(HttpRuleRegistry::new(
        config.system_url.clone(),
        config.username.clone(),
        config.password.clone(),
    )?);
    let provisioner = Provisioner::new(registry, routes);
    provisioner.cache().seed(config.rules.clone());

    let report = provisioner.provision(example_plans(&config)).await?;
    tracing::info!(
        confirmed = report.confirmed_count(),
        planned = report.saved.len(),
        "provisioning finished"
    );

    let confirmed = provisioner.finish(VERIFIED_PLAN).await?;
    tracing::info!(rule = %serde_json::json!(&confirmed), "verified rule state");

    serving.await??;
    Ok(())
}

/// The three example rules: an HTTP redirect rule, a local node-style
/// callback rule, and a soft trigger with its own button icon.
fn example_plans(config: &Config) -> Vec<RulePlan> {
    vec![
        RulePlan::http(
            "Soft Trigger Http Action",
            SoftTrigger::new("redirect"),
            config.welcome_url(),
        ),
        RulePlan::callback(
            "Soft Trigger Http Action -> node",
            SoftTrigger::new("Node callback"),
            "/test",
            Arc::new(|| tracing::info!("callback works")),
        ),
        RulePlan::trigger_callback(
            "/SimpleCallback",
            VERIFIED_PLAN,
            TriggerIcon::LightsOn,
            Arc::new(|| tracing::info!("callback works")),
        ),
    ]
}
