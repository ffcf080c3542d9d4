//! Support tickets in an external issue tracker.
//!
//! Tickets are linked to customers only through free text: the description
//! starts with `Customer ID: {id}` and customer lookups search for that
//! string. A `customer-{id}` label is also written.
//!
//! - [`IssueTracker`]: the REST seam ([`JiraClient`], [`MockIssueTracker`])
//! - [`TicketDesk`]: the support-facing facade returning tool results

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod desk;
mod jira;
mod mock;

pub use desk::{CustomerTickets, TicketCreated, TicketDesk, TicketRequest, NOT_CONFIGURED};
pub use jira::{JiraClient, JiraConfig};
pub use mock::MockIssueTracker;

/// Errors from issue tracker calls.
#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Tracker answered with a non-success status.
    #[error("HTTP {status} - {body}")]
    Status { status: u16, body: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No project with the configured name.
    #[error("Project '{0}' not found in Jira.")]
    ProjectNotFound(String),
}

pub type Result<T> = std::result::Result<T, TicketError>;

/// Category of a support ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketType {
    Installation,
    Maintenance,
    Performance,
    Billing,
    Technical,
}

impl TicketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::Installation => "Installation",
            TicketType::Maintenance => "Maintenance",
            TicketType::Performance => "Performance",
            TicketType::Billing => "Billing",
            TicketType::Technical => "Technical",
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracker project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    pub key: String,
    pub name: String,
}

/// Fields of a new issue, in the tracker's create-issue shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueFields {
    pub project: ProjectRef,
    pub summary: String,
    pub description: String,
    #[serde(rename = "issuetype")]
    pub issue_type: NamedRef,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRef {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// Issue as returned by a search.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub fields: IssueSummaryFields,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct IssueSummaryFields {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub status: Option<NamedRef>,
    #[serde(default, rename = "issuetype")]
    pub issue_type: Option<NamedRef>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

/// Interface for the issue tracker REST API.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// All projects visible to the configured user.
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// Create an issue and return its key.
    async fn create_issue(&self, fields: &IssueFields) -> Result<String>;

    /// Run a JQL query.
    async fn search(&self, jql: &str) -> Result<Vec<Issue>>;
}

/// Find the key of the project called `name`.
pub async fn resolve_project_key(tracker: &dyn IssueTracker, name: &str) -> Result<String> {
    let projects = tracker.list_projects().await?;
    if projects.is_empty() {
        return Err(TicketError::Config(
            "No projects found in Jira instance.".to_string(),
        ));
    }
    projects
        .into_iter()
        .find(|p| p.name == name)
        .map(|p| p.key)
        .ok_or_else(|| TicketError::ProjectNotFound(name.to_string()))
}

/// Description text linking a ticket to a customer.
pub fn customer_description(customer_id: &str, email: Option<&str>, description: &str) -> String {
    let mut info = format!("Customer ID: {customer_id}\n");
    if let Some(email) = email.filter(|e| !e.is_empty()) {
        info.push_str(&format!("Customer Email: {email}\n"));
    }
    format!("{info}\n{description}")
}

/// JQL matching tickets whose description names `customer_id`.
pub fn customer_jql(project_key: &str, customer_id: &str) -> String {
    format!(
        "project = {project_key} AND description ~ \"Customer ID: {}\"",
        escape_jql(customer_id)
    )
}

fn escape_jql(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
