//! Mock IssueTracker implementation for testing.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Issue, IssueFields, IssueSummaryFields, IssueTracker, NamedRef, Project, Result, TicketError};

/// In-memory tracker.
///
/// Search understands only the `description ~ "..."` clause written by
/// [`super::customer_jql`]: it returns issues whose description contains
/// the quoted text.
#[derive(Default)]
pub struct MockIssueTracker {
    projects: Vec<Project>,
    issues: RwLock<Vec<(String, IssueFields)>>,
    fail_all: RwLock<bool>,
}

impl MockIssueTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self {
            projects,
            ..Self::default()
        }
    }

    pub async fn set_fail_all(&self, fail: bool) {
        *self.fail_all.write().await = fail;
    }

    /// Issues created so far, with their keys.
    pub async fn created(&self) -> Vec<(String, IssueFields)> {
        self.issues.read().await.clone()
    }

    async fn check(&self) -> Result<()> {
        if *self.fail_all.read().await {
            return Err(TicketError::Status {
                status: 503,
                body: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn description_needle(jql: &str) -> Option<String> {
        let (_, rest) = jql.split_once("description ~ \"")?;
        let end = rest.rfind('"')?;
        Some(rest[..end].replace("\\\"", "\"").replace("\\\\", "\\"))
    }
}

#[async_trait]
impl IssueTracker for MockIssueTracker {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        self.check().await?;
        Ok(self.projects.clone())
    }

    async fn create_issue(&self, fields: &IssueFields) -> Result<String> {
        self.check().await?;
        let mut issues = self.issues.write().await;
        let key = format!("{}-{}", fields.project.key, issues.len() + 1);
        issues.push((key.clone(), fields.clone()));
        Ok(key)
    }

    async fn search(&self, jql: &str) -> Result<Vec<Issue>> {
        self.check().await?;
        let needle = Self::description_needle(jql).unwrap_or_default();
        let issues = self.issues.read().await;
        Ok(issues
            .iter()
            .filter(|(_, f)| f.description.contains(&needle))
            .map(|(key, f)| Issue {
                key: Some(key.clone()),
                fields: IssueSummaryFields {
                    summary: Some(f.summary.clone()),
                    status: Some(NamedRef {
                        name: Some("To Do".to_string()),
                    }),
                    issue_type: Some(f.issue_type.clone()),
                    created: None,
                    updated: None,
                },
            })
            .collect())
    }
}
