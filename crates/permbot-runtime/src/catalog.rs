//! Grantable resource listing.
//!
//! Listings are fetched fresh on every call and returned in provider order,
//! without sorting or de-duplication.

use crate::adapter::ResourceLister;
use permbot_core::WorkflowError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Services the bot can grant on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    S3,
    Sqs,
}

impl FromStr for ServiceKind {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s3" => Ok(ServiceKind::S3),
            "sqs" => Ok(ServiceKind::Sqs),
            other => Err(WorkflowError::UnsupportedService {
                service: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKind::S3 => f.write_str("s3"),
            ServiceKind::Sqs => f.write_str("sqs"),
        }
    }
}

pub struct ResourceCatalog {
    lister: Arc<dyn ResourceLister>,
}

impl ResourceCatalog {
    pub fn new(lister: Arc<dyn ResourceLister>) -> Self {
        Self { lister }
    }

    /// Resource names of `service` in the account.
    pub async fn list(&self, service: &str, account_id: &str) -> Result<Vec<String>, WorkflowError> {
        let kind: ServiceKind = service.parse()?;
        let listed = match kind {
            ServiceKind::S3 => self.lister.list_buckets(account_id).await,
            ServiceKind::Sqs => self
                .lister
                .list_queues(account_id)
                .await
                .map(|urls| urls.iter().map(|u| queue_name(u).to_string()).collect()),
        };
        let resources = listed.map_err(|e| {
            tracing::error!(service = %kind, account_id, error = %e, "resource listing failed");
            WorkflowError::ResourceListingFailed
        })?;
        tracing::debug!(service = %kind, account_id, count = resources.len(), "resources listed");
        Ok(resources)
    }
}

/// Check that the requested resource is part of a listing.
pub fn require_member(resources: &[String], resource: &str) -> Result<(), WorkflowError> {
    if resources.iter().any(|r| r == resource) {
        Ok(())
    } else {
        Err(WorkflowError::ResourceNotFound {
            resource: resource.to_string(),
        })
    }
}

/// Trailing path segment of a queue URL.
fn queue_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
