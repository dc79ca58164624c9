//! Reqwest-backed rule registry client.

use std::time::Duration;

use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use rulebridge_app::ports::RuleRegistry;
use rulebridge_domain::error::RegistryError;
use rulebridge_domain::id::RuleId;
use rulebridge_domain::rule::Rule;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Serialize)]
struct EnableRequest {
    enabled: bool,
}

/// HTTP client for the remote rule registry.
///
/// Built once with request and connect timeouts; redirects are disabled so
/// a POST is never silently replayed as a GET. The session token obtained
/// by [`login`](RuleRegistry::login) is held behind an async lock and sent
/// as a bearer header on every subsequent call.
pub struct HttpRuleRegistry {
    http: Client,
    base: String,
    username: String,
    password: String,
    token: RwLock<Option<String>>,
}

impl HttpRuleRegistry {
    /// Create a client for the registry at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Transport`] when the underlying HTTP client
    /// cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, RegistryError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|err| RegistryError::Transport(err.to_string()))?;

        Ok(Self {
            http,
            base: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            token: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn bearer(&self) -> Result<String, RegistryError> {
        self.token
            .read()
            .await
            .as_ref()
            .map(|token| format!("Bearer {token}"))
            .ok_or(RegistryError::NotLoggedIn)
    }
}

impl RuleRegistry for HttpRuleRegistry {
    #[tracing::instrument(skip(self), fields(base = %self.base, username = %self.username))]
    async fn login(&self) -> Result<(), RegistryError> {
        let response = self
            .http
            .post(self.url("/api/login"))
            .json(&LoginRequest {
                username: &self.username,
                password: &self.password,
            })
            .send()
            .await
            .map_err(|err| RegistryError::Transport(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "login rejected");
            return Err(RegistryError::Auth(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::UnexpectedResponse {
                status: status.as_u16(),
                body,
            });
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|err| RegistryError::Decode(err.to_string()))?;
        *self.token.write().await = Some(body.token);
        tracing::info!("logged in to rule registry");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn system_rules(&self) -> Result<Vec<Rule>, RegistryError> {
        let auth = self.bearer().await?;
        let response = self
            .http
            .get(self.url("/api/rules"))
            .header(header::AUTHORIZATION, auth)
            .send()
            .await
            .map_err(|err| RegistryError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::UnexpectedResponse {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|err| RegistryError::Decode(err.to_string()))
    }

    #[tracing::instrument(skip(self, rule), fields(name = %rule.name))]
    async fn save_rule(&self, rule: Rule) -> Result<Option<Rule>, RegistryError> {
        let auth = self.bearer().await?;
        let response = self
            .http
            .post(self.url("/api/rules"))
            .header(header::AUTHORIZATION, auth)
            .json(&rule)
            .send()
            .await
            .map_err(|err| RegistryError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let saved: Rule = response
                .json()
                .await
                .map_err(|err| RegistryError::Decode(err.to_string()))?;
            tracing::info!(rule_id = %saved.id, "rule saved on system");
            Ok(Some(saved))
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "remote rejected rule");
            Ok(None)
        }
    }

    #[tracing::instrument(skip(self))]
    async fn set_rule_enabled(&self, id: RuleId, enabled: bool) -> Result<(), RegistryError> {
        let auth = self.bearer().await?;
        let response = self
            .http
            .post(self.url(&format!("/api/rules/{id}/enabled")))
            .header(header::AUTHORIZATION, auth)
            .json(&EnableRequest { enabled })
            .send()
            .await
            .map_err(|err| RegistryError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::UnexpectedResponse {
                status: status.as_u16(),
                body,
            });
        }
        tracing::info!(rule_id = %id, enabled, "rule enabled state updated");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn rule(&self, id: RuleId) -> Result<Option<Rule>, RegistryError> {
        let auth = self.bearer().await?;
        let response = self
            .http
            .get(self.url(&format!("/api/rules/{id}")))
            .header(header::AUTHORIZATION, auth)
            .send()
            .await
            .map_err(|err| RegistryError::Transport(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::UnexpectedResponse {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map(Some)
            .map_err(|err| RegistryError::Decode(err.to_string()))
    }
}
