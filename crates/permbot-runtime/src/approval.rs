//! Approval routing: tracking ticket assigned to the on-call approver.

use crate::adapter::{OnCallDirectory, Ticketing};
use permbot_core::{Ticket, WorkflowError};
use std::sync::Arc;

/// What the ticket is about.
#[derive(Debug, Clone, Copy)]
pub struct ApprovalSubject<'a> {
    pub requester_email: &'a str,
    pub service: &'a str,
    pub resource: &'a str,
    pub permission: &'a str,
    pub account: &'a str,
    pub pull_request_url: &'a str,
}

pub struct ApprovalRouter {
    on_call: Arc<dyn OnCallDirectory>,
    ticketing: Arc<dyn Ticketing>,
    schedule_id: String,
    project_key: String,
    issue_type: String,
}

impl ApprovalRouter {
    pub fn new(
        on_call: Arc<dyn OnCallDirectory>,
        ticketing: Arc<dyn Ticketing>,
        schedule_id: impl Into<String>,
        project_key: impl Into<String>,
        issue_type: impl Into<String>,
    ) -> Self {
        Self {
            on_call,
            ticketing,
            schedule_id: schedule_id.into(),
            project_key: project_key.into(),
            issue_type: issue_type.into(),
        }
    }

    /// Create the ticket and return its key.
    pub async fn route(&self, subject: ApprovalSubject<'_>) -> Result<String, WorkflowError> {
        let approver_email = match self.on_call.on_call_email(&self.schedule_id).await {
            Ok(Some(email)) => email,
            Ok(None) => {
                tracing::error!(schedule_id = %self.schedule_id, "nobody on call");
                return Err(WorkflowError::OnCallLookupFailed);
            }
            Err(e) => {
                tracing::error!(schedule_id = %self.schedule_id, error = %e, "on-call lookup failed");
                return Err(WorkflowError::OnCallLookupFailed);
            }
        };

        let assignee_id = self
            .account_id(&approver_email)
            .await
            .ok_or(WorkflowError::TicketAssigneeUnresolved)?;
        let requester_id = self
            .account_id(subject.requester_email)
            .await
            .ok_or(WorkflowError::TicketRequesterUnresolved)?;

        let ticket = Ticket {
            project_key: self.project_key.clone(),
            issue_type: self.issue_type.clone(),
            summary: Ticket::summary_for(subject.service, subject.permission, subject.account),
            assignee_id,
            requester_id,
            service: subject.service.to_string(),
            resource: subject.resource.to_string(),
            permission: subject.permission.to_string(),
            account: subject.account.to_string(),
            pull_request_url: subject.pull_request_url.to_string(),
        };

        let key = self.ticketing.create_issue(&ticket).await.map_err(|e| {
            tracing::error!(project = %self.project_key, error = %e, "ticket creation failed");
            WorkflowError::TicketCreationFailed
        })?;
        tracing::info!(key = %key, approver = %approver_email, "approval ticket created");
        Ok(key)
    }

    async fn account_id(&self, email: &str) -> Option<String> {
        match self.ticketing.find_user_by_email(email).await {
            Ok(Some(id)) => Some(id),
            Ok(None) => {
                tracing::warn!(email, "no ticketing user for email");
                None
            }
            Err(e) => {
                tracing::error!(email, error = %e, "ticketing user search failed");
                None
            }
        }
    }
}
