//! Support-facing ticket operations.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use super::{
    customer_description, customer_jql, resolve_project_key, IssueFields, IssueTracker,
    JiraClient, JiraConfig, NamedRef, ProjectRef, TicketType,
};
use crate::support::{ToolError, ToolResult};

pub const NOT_CONFIGURED: &str = "Jira integration is not properly configured";

/// Issue type used for every support ticket.
const ISSUE_TYPE: &str = "Task";

/// A ticket to file for a customer.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketRequest {
    pub customer_id: String,
    pub title: String,
    pub description: String,
    pub ticket_type: TicketType,
    pub customer_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketCreated {
    pub message: String,
    pub ticket_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketSummary {
    pub key: Option<String>,
    pub summary: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub ticket_type: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerTickets {
    pub count: usize,
    pub tickets: Vec<TicketSummary>,
}

struct Connection {
    tracker: Arc<dyn IssueTracker>,
    project_key: String,
}

/// Ticket operations bound to one tracker project.
///
/// An unconfigured desk answers every call with [`NOT_CONFIGURED`].
pub struct TicketDesk {
    connection: Option<Connection>,
}

impl TicketDesk {
    pub fn new(tracker: Arc<dyn IssueTracker>, project_key: impl Into<String>) -> Self {
        Self {
            connection: Some(Connection {
                tracker,
                project_key: project_key.into(),
            }),
        }
    }

    pub fn unconfigured() -> Self {
        Self { connection: None }
    }

    /// Connect to Jira and resolve the project key.
    ///
    /// Missing credentials or a failed lookup leave the desk unconfigured.
    pub async fn connect(config: &JiraConfig) -> Self {
        if !config.is_complete() {
            warn!("Jira integration disabled due to missing credentials");
            return Self::unconfigured();
        }

        let client = match JiraClient::new(config.clone()) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                warn!(error = %e, "Failed to initialize Jira client");
                return Self::unconfigured();
            }
        };

        Self::with_tracker(client, &config.project_name).await
    }

    /// Resolve `project_name` on `tracker`.
    pub async fn with_tracker(tracker: Arc<dyn IssueTracker>, project_name: &str) -> Self {
        match resolve_project_key(tracker.as_ref(), project_name).await {
            Ok(key) => {
                info!(project = %project_name, key = %key, "Jira integration ready");
                Self::new(tracker, key)
            }
            Err(e) => {
                warn!(project = %project_name, error = %e, "Failed to initialize project key");
                Self::unconfigured()
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.connection.is_some()
    }

    fn connection(&self) -> ToolResult<&Connection> {
        self.connection
            .as_ref()
            .ok_or_else(|| ToolError::not_configured(NOT_CONFIGURED))
    }

    /// File a support ticket for a customer.
    pub async fn create_ticket(&self, request: &TicketRequest) -> ToolResult<TicketCreated> {
        let conn = self.connection()?;

        let fields = IssueFields {
            project: ProjectRef {
                key: conn.project_key.clone(),
            },
            summary: request.title.clone(),
            description: customer_description(
                &request.customer_id,
                request.customer_email.as_deref(),
                &request.description,
            ),
            issue_type: NamedRef {
                name: Some(ISSUE_TYPE.to_string()),
            },
            labels: vec![
                request.ticket_type.to_string(),
                format!("customer-{}", request.customer_id),
            ],
        };

        match conn.tracker.create_issue(&fields).await {
            Ok(ticket_key) => {
                info!(
                    customer_id = %request.customer_id,
                    ticket_key = %ticket_key,
                    "Support ticket created"
                );
                Ok(TicketCreated {
                    message: format!(
                        "{} support ticket created successfully",
                        request.ticket_type
                    ),
                    ticket_key,
                })
            }
            Err(e) => {
                error!(customer_id = %request.customer_id, error = %e, "Failed to create Jira ticket");
                Err(ToolError::external(format!("Failed to create Jira ticket: {e}")))
            }
        }
    }

    /// Tickets whose description names `customer_id`.
    pub async fn get_customer_tickets(&self, customer_id: &str) -> ToolResult<CustomerTickets> {
        let conn = self.connection()?;
        let jql = customer_jql(&conn.project_key, customer_id);

        let issues = conn.tracker.search(&jql).await.map_err(|e| {
            error!(customer_id = %customer_id, error = %e, "Failed to retrieve customer tickets");
            ToolError::external(format!("Failed to retrieve customer tickets: {e}"))
        })?;

        let tickets: Vec<TicketSummary> = issues
            .into_iter()
            .map(|issue| TicketSummary {
                key: issue.key,
                summary: issue.fields.summary,
                status: issue.fields.status.and_then(|s| s.name),
                ticket_type: issue.fields.issue_type.and_then(|t| t.name),
                created: issue.fields.created,
                updated: issue.fields.updated,
            })
            .collect();

        Ok(CustomerTickets {
            count: tickets.len(),
            tickets,
        })
    }
}
