//! Jira REST client.
//!
//! Talks to the v2 REST API (`/rest/api/2/...`), whose issue descriptions
//! are plain text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use tracing::{debug, error};

use super::{Issue, IssueFields, IssueTracker, Project, Result, TicketError};

/// Jira connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JiraConfig {
    /// Instance base URL, e.g. `https://example.atlassian.net`.
    pub url: String,
    /// Account name; required for Jira Cloud.
    pub username: Option<String>,
    /// API token (Cloud) or personal access token (Server/Data Center).
    pub api_token: Option<String>,
    /// Jira Cloud instance.
    pub cloud: bool,
    /// Name of the project tickets are filed in.
    pub project_name: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: None,
            api_token: None,
            cloud: false,
            project_name: "SOLAR".to_string(),
            timeout_secs: 30,
        }
    }
}

impl JiraConfig {
    /// Create config from environment variables.
    ///
    /// - `JIRA_INSTANCE_URL`: instance URL
    /// - `JIRA_USERNAME`: account name
    /// - `JIRA_API_TOKEN`: API token
    /// - `JIRA_CLOUD`: `true` for Jira Cloud (default: false)
    /// - `PROJECT_NAME`: project name (default: SOLAR)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Overlay any of the `JIRA_*` / `PROJECT_NAME` variables that are set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("JIRA_INSTANCE_URL") {
            self.url = url;
        }
        if let Ok(username) = std::env::var("JIRA_USERNAME") {
            self.username = Some(username);
        }
        if let Ok(token) = std::env::var("JIRA_API_TOKEN") {
            self.api_token = Some(token);
        }
        if let Ok(cloud) = std::env::var("JIRA_CLOUD") {
            self.cloud = cloud.eq_ignore_ascii_case("true");
        }
        if let Ok(project) = std::env::var("PROJECT_NAME") {
            self.project_name = project;
        }
    }

    /// Whether enough is set to talk to Jira.
    pub fn is_complete(&self) -> bool {
        let has = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        !self.url.is_empty() && has(&self.api_token) && (has(&self.username) || !self.cloud)
    }

    /// Set the instance URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set username and API token.
    pub fn with_credentials(mut self, username: impl Into<String>, token: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.api_token = Some(token.into());
        self
    }

    /// Set the project name.
    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct CreatedIssue {
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(default)]
    issues: Vec<Issue>,
}

/// HTTP client for a Jira instance.
pub struct JiraClient {
    client: Client,
    config: JiraConfig,
}

impl JiraClient {
    /// Create a new client with the given configuration.
    pub fn new(config: JiraConfig) -> Result<Self> {
        if !config.is_complete() {
            return Err(TicketError::Config(
                "Jira URL and credentials not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/rest/api/2/{}", self.config.url.trim_end_matches('/'), path)
    }

    /// Basic auth with username + token, or bearer token when no username
    /// is set (Server/Data Center personal access tokens).
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.config.api_token.as_deref().unwrap_or_default();
        match self.config.username.as_deref() {
            Some(user) if !user.is_empty() => request.basic_auth(user, Some(token)),
            _ => request.bearer_auth(token),
        }
    }

    async fn check(response: Response, operation: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        error!(
            operation = %operation,
            status = %status,
            body = %body,
            "Jira request failed"
        );
        Err(TicketError::Status {
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        })
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        let request = self.client.get(self.endpoint("project"));
        let response = self.authorize(request).send().await?;
        let projects: Vec<Project> = Self::check(response, "list_projects").await?.json().await?;

        debug!(count = projects.len(), "Listed Jira projects");
        Ok(projects)
    }

    async fn create_issue(&self, fields: &IssueFields) -> Result<String> {
        let body = serde_json::json!({ "fields": fields });
        let request = self.client.post(self.endpoint("issue")).json(&body);
        let response = self.authorize(request).send().await?;
        let created: CreatedIssue = Self::check(response, "create_issue").await?.json().await?;

        let key = created.key.unwrap_or_else(|| "Unknown".to_string());
        debug!(key = %key, "Created Jira issue");
        Ok(key)
    }

    async fn search(&self, jql: &str) -> Result<Vec<Issue>> {
        let request = self.client.get(self.endpoint("search")).query(&[("jql", jql)]);
        let response = self.authorize(request).send().await?;
        let results: SearchResults = Self::check(response, "search").await?.json().await?;

        debug!(jql = %jql, count = results.issues.len(), "Searched Jira issues");
        Ok(results.issues)
    }
}
