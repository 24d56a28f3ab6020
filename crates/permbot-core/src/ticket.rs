//! Approval ticket entity.

use serde::{Deserialize, Serialize};

/// Tracking ticket routed to the on-call approver.
///
/// The ticketing adapter renders this into its own rich-text format; the
/// fields here are what the description must reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub project_key: String,
    pub issue_type: String,
    pub summary: String,
    /// Ticketing account id of the on-call approver (assignee).
    pub assignee_id: String,
    /// Ticketing account id of the requester (mentioned, not assigned).
    pub requester_id: String,
    pub service: String,
    pub resource: String,
    pub permission: String,
    pub account: String,
    pub pull_request_url: String,
}

impl Ticket {
    pub fn summary_for(service: &str, permission: &str, account: &str) -> String {
        format!(
            "AWS SSO - grant permissions for {} - {} - {}",
            service, permission, account
        )
    }
}
