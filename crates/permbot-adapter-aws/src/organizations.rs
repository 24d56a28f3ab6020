//! AWS Organizations as the account directory.

use anyhow::Context;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_organizations::Client;
use aws_sdk_organizations::types::AccountStatus;
use permbot_runtime::AccountDirectory;
use std::collections::VecDeque;

const ACCOUNTS_PAGE_SIZE: i32 = 20;

pub struct OrganizationsDirectory {
    client: Client,
}

impl OrganizationsDirectory {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl AccountDirectory for OrganizationsDirectory {
    async fn resolve_account_id(&self, name: &str) -> anyhow::Result<Option<String>> {
        let mut next_token = None;
        loop {
            let page = self
                .client
                .list_accounts()
                .max_results(ACCOUNTS_PAGE_SIZE)
                .set_next_token(next_token.take())
                .send()
                .await
                .context("organizations:ListAccounts failed")?;

            let found = page.accounts().iter().find(|account| {
                account.status() == Some(&AccountStatus::Active) && account.name() == Some(name)
            });
            if let Some(id) = found.and_then(|account| account.id()) {
                return Ok(Some(id.to_string()));
            }

            match page.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => return Ok(None),
            }
        }
    }

    async fn resolve_org_unit(&self, account_id: &str) -> anyhow::Result<Option<String>> {
        find_org_unit(&self.client, account_id).await
    }
}

/// One level of the organization tree.
#[async_trait]
pub(crate) trait OrgTree: Send + Sync {
    async fn root_id(&self) -> anyhow::Result<String>;

    /// `(id, name)` of the organizational units directly under `parent_id`.
    async fn child_units(&self, parent_id: &str) -> anyhow::Result<Vec<(String, String)>>;

    /// Ids of the accounts directly under `parent_id`.
    async fn child_accounts(&self, parent_id: &str) -> anyhow::Result<Vec<String>>;
}

/// Breadth-first search from the root for the unit directly holding the account.
pub(crate) async fn find_org_unit(
    tree: &dyn OrgTree,
    account_id: &str,
) -> anyhow::Result<Option<String>> {
    let mut queue = VecDeque::from([tree.root_id().await?]);
    while let Some(parent_id) = queue.pop_front() {
        for (id, name) in tree.child_units(&parent_id).await? {
            if tree.child_accounts(&id).await?.iter().any(|a| a == account_id) {
                return Ok(Some(name));
            }
            queue.push_back(id);
        }
    }
    Ok(None)
}

#[async_trait]
impl OrgTree for Client {
    async fn root_id(&self) -> anyhow::Result<String> {
        let roots = self
            .list_roots()
            .send()
            .await
            .context("organizations:ListRoots failed")?;
        roots
            .roots()
            .first()
            .and_then(|root| root.id())
            .map(str::to_string)
            .context("organization has no root")
    }

    async fn child_units(&self, parent_id: &str) -> anyhow::Result<Vec<(String, String)>> {
        let mut units = Vec::new();
        let mut next_token = None;
        loop {
            let page = self
                .list_organizational_units_for_parent()
                .parent_id(parent_id)
                .set_next_token(next_token.take())
                .send()
                .await
                .context("organizations:ListOrganizationalUnitsForParent failed")?;
            units.extend(page.organizational_units().iter().filter_map(|ou| {
                Some((ou.id()?.to_string(), ou.name().unwrap_or_default().to_string()))
            }));
            match page.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => return Ok(units),
            }
        }
    }

    async fn child_accounts(&self, parent_id: &str) -> anyhow::Result<Vec<String>> {
        let mut accounts = Vec::new();
        let mut next_token = None;
        loop {
            let page = self
                .list_accounts_for_parent()
                .parent_id(parent_id)
                .set_next_token(next_token.take())
                .send()
                .await
                .context("organizations:ListAccountsForParent failed")?;
            accounts.extend(
                page.accounts()
                    .iter()
                    .filter_map(|account| account.id().map(str::to_string)),
            );
            match page.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => return Ok(accounts),
            }
        }
    }
}
