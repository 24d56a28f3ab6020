//! Authorization group resolution.
//!
//! Selection policy for the groups returned by the directory:
//!
//! - none: `Unauthorized`
//! - exactly one: that group, whatever the disambiguator says
//! - several, no disambiguator: `AmbiguousAuthorization`
//! - several, disambiguator: first group sharing a `_`-separated token with
//!   the disambiguator; no overlap is also `AmbiguousAuthorization`

use crate::adapter::DirectoryService;
use permbot_core::{Actor, AuthorizationGroup, WorkflowError};
use std::collections::HashSet;
use std::sync::Arc;

const TOKEN_DELIMITER: char = '_';

pub struct IdentityResolver {
    directory: Arc<dyn DirectoryService>,
    group_prefix: String,
}

impl IdentityResolver {
    pub fn new(directory: Arc<dyn DirectoryService>, group_prefix: impl Into<String>) -> Self {
        Self {
            directory,
            group_prefix: group_prefix.into(),
        }
    }

    /// All authorization groups of the actor.
    pub async fn groups(&self, actor: &Actor) -> Result<Vec<AuthorizationGroup>, WorkflowError> {
        let names = self
            .directory
            .groups_for_user(&actor.email)
            .await
            .map_err(|e| {
                tracing::error!(email = %actor.email, error = %e, "directory group lookup failed");
                WorkflowError::DirectoryLookupFailed
            })?;

        Ok(names
            .into_iter()
            .map(|name| AuthorizationGroup::from_directory(name, &self.group_prefix))
            .collect())
    }

    /// Succeeds when the actor holds at least one authorization group.
    pub async fn require_any(
        &self,
        actor: &Actor,
    ) -> Result<Vec<AuthorizationGroup>, WorkflowError> {
        let groups = self.groups(actor).await?;
        if groups.is_empty() {
            return Err(WorkflowError::Unauthorized {
                email: actor.email.clone(),
            });
        }
        Ok(groups)
    }

    /// Resolve exactly one group for a grant.
    pub async fn resolve(
        &self,
        actor: &Actor,
        disambiguator: Option<&str>,
    ) -> Result<AuthorizationGroup, WorkflowError> {
        let groups = self.groups(actor).await?;
        let group = select_group(groups, disambiguator, &actor.email)?;
        tracing::info!(email = %actor.email, group = %group.display_name, "authorization group resolved");
        Ok(group)
    }
}

/// Apply the selection policy to an already fetched group list.
pub fn select_group(
    mut groups: Vec<AuthorizationGroup>,
    disambiguator: Option<&str>,
    email: &str,
) -> Result<AuthorizationGroup, WorkflowError> {
    match groups.len() {
        0 => Err(WorkflowError::Unauthorized {
            email: email.to_string(),
        }),
        1 => Ok(groups.remove(0)),
        _ => {
            let selected = disambiguator.and_then(|wanted| {
                let wanted: HashSet<&str> = wanted.split(TOKEN_DELIMITER).collect();
                groups
                    .iter()
                    .position(|g| g.name.split(TOKEN_DELIMITER).any(|t| wanted.contains(t)))
            });
            match selected {
                Some(idx) => Ok(groups.swap_remove(idx)),
                None => Err(WorkflowError::AmbiguousAuthorization {
                    candidates: groups.into_iter().map(|g| g.name).collect(),
                }),
            }
        }
    }
}
