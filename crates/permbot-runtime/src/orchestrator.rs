use crate::adapter::{AccountDirectory, ChatCallback, ConnectorFactory, Connectors, ResourceLister};
use crate::approval::{ApprovalRouter, ApprovalSubject};
use crate::audit::{AuditSink, Stage, WorkflowAuditEvent};
use crate::catalog::{ResourceCatalog, require_member};
use crate::composer::{ChangeComposer, ComposeInput};
use crate::identity::IdentityResolver;
use crate::messages;
use crate::submitter::ChangeSubmitter;
use chrono::Utc;
use permbot_core::config::GithubConfig;
use permbot_core::{
    Actor, ChangeSubject, Command, GrantRequest, ListRequest, PermbotConfig, SlashCommandEvent,
    Verb, WorkflowError,
};
use std::future::Future;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Static inputs of every run, taken from configuration.
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    pub bot_name: String,
    pub email_domain: String,
    pub group_prefix: String,
    pub github: GithubConfig,
    pub schedule_id: String,
    pub project_key: String,
    pub issue_type: String,
}

impl WorkflowSettings {
    pub fn from_config(config: &PermbotConfig) -> Self {
        Self {
            bot_name: config.chat.bot_name.clone(),
            email_domain: config.directory.domain.clone(),
            group_prefix: config.directory.group_prefix.clone(),
            github: config.github.clone(),
            schedule_id: config.pagerduty.schedule_id.clone(),
            project_key: config.jira.project_key.clone(),
            issue_type: config.jira.issue_type.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowSuccess {
    Help,
    Listed {
        resources: Vec<String>,
    },
    Granted {
        ticket_key: String,
        pull_request_url: String,
        branch_name: String,
    },
}

/// Terminal result of one run together with the message that was posted.
#[derive(Debug, Clone)]
pub struct WorkflowOutcome {
    pub request_id: Uuid,
    pub result: Result<WorkflowSuccess, WorkflowError>,
    pub message: String,
}

struct RunContext<'a> {
    request_id: Uuid,
    user_name: &'a str,
    verb: Option<Verb>,
}

/// Account id plus the credentialed collaborators for one run.
struct Session {
    account_id: String,
    connectors: Connectors,
}

pub struct Orchestrator {
    settings: WorkflowSettings,
    accounts: Arc<dyn AccountDirectory>,
    catalog: ResourceCatalog,
    connectors: Arc<dyn ConnectorFactory>,
    chat: Arc<dyn ChatCallback>,
    audit: Arc<dyn AuditSink>,
}

impl Orchestrator {
    pub fn new(
        settings: WorkflowSettings,
        accounts: Arc<dyn AccountDirectory>,
        lister: Arc<dyn ResourceLister>,
        connectors: Arc<dyn ConnectorFactory>,
        chat: Arc<dyn ChatCallback>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            settings,
            accounts,
            catalog: ResourceCatalog::new(lister),
            connectors,
            chat,
            audit,
        }
    }

    /// Run one slash command to completion and post exactly one message.
    ///
    /// Never fails: every outcome, including errors, is reported through the
    /// chat callback and returned for inspection.
    pub async fn handle(&self, event: &SlashCommandEvent) -> WorkflowOutcome {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("workflow", request_id = %request_id, user = %event.user_name);
        self.respond(event, request_id).instrument(span).await
    }

    async fn respond(&self, event: &SlashCommandEvent, request_id: Uuid) -> WorkflowOutcome {
        let mut ctx = RunContext {
            request_id,
            user_name: &event.user_name,
            verb: None,
        };
        let result = self.run(event, &mut ctx).await;

        let bot = self.settings.bot_name.as_str();
        let message = match &result {
            Ok(WorkflowSuccess::Help) => messages::usage(bot),
            Ok(WorkflowSuccess::Listed { resources }) => messages::resources(bot, resources),
            Ok(WorkflowSuccess::Granted {
                ticket_key,
                pull_request_url,
                ..
            }) => messages::granted(bot, ticket_key, pull_request_url),
            Err(e) => messages::error(bot, e),
        };

        match &result {
            Ok(_) => tracing::info!("workflow completed"),
            Err(e) => tracing::warn!(failure = e.kind(), "workflow failed"),
        }
        if let Err(e) = self.chat.post(&event.response_url, &message).await {
            tracing::error!(error = %e, "failed to post chat response");
        }

        WorkflowOutcome {
            request_id,
            result,
            message,
        }
    }

    async fn run(
        &self,
        event: &SlashCommandEvent,
        ctx: &mut RunContext<'_>,
    ) -> Result<WorkflowSuccess, WorkflowError> {
        let command = self
            .stage(ctx, Stage::ParseCommand, async {
                Command::parse(&event.text).map_err(|e| WorkflowError::Usage(e.message))
            })
            .await?;
        ctx.verb = Some(command.verb());

        match command {
            Command::Help => Ok(WorkflowSuccess::Help),
            Command::List(req) => self.list(ctx, event, &req).await,
            Command::Grant(req) => self.grant(ctx, event, &req).await,
        }
    }

    async fn list(
        &self,
        ctx: &RunContext<'_>,
        event: &SlashCommandEvent,
        req: &ListRequest,
    ) -> Result<WorkflowSuccess, WorkflowError> {
        let session = self.open_session(ctx, &req.account).await?;

        let actor = Actor::new(event.user_name.as_str(), &self.settings.email_domain);
        let identity = self.identity(&session.connectors);
        self.stage(ctx, Stage::ResolveIdentity, identity.require_any(&actor))
            .await?;

        let resources = self
            .stage(
                ctx,
                Stage::ListResources,
                self.catalog.list(&req.service, &session.account_id),
            )
            .await?;
        Ok(WorkflowSuccess::Listed { resources })
    }

    async fn grant(
        &self,
        ctx: &RunContext<'_>,
        event: &SlashCommandEvent,
        req: &GrantRequest,
    ) -> Result<WorkflowSuccess, WorkflowError> {
        let session = self.open_session(ctx, &req.account).await?;
        let connectors = &session.connectors;

        let actor = Actor::for_request(
            &event.user_name,
            req.on_behalf.as_deref(),
            &self.settings.email_domain,
        );
        let identity = self.identity(connectors);
        let group = self
            .stage(
                ctx,
                Stage::ResolveIdentity,
                identity.resolve(&actor, req.permission_set_name.as_deref()),
            )
            .await?;

        let resources = self
            .stage(
                ctx,
                Stage::ListResources,
                self.catalog.list(&req.service, &session.account_id),
            )
            .await?;
        self.stage(ctx, Stage::CheckResource, async {
            require_member(&resources, &req.resource)
        })
        .await?;

        let composer = ChangeComposer::new(
            Arc::clone(&connectors.repository),
            Arc::clone(&connectors.generator),
            self.settings.github.clone(),
        );
        let change = self
            .stage(ctx, Stage::ComposeChange, async {
                let org_unit = self.org_unit(&session.account_id).await;
                composer
                    .compose(ComposeInput {
                        group: &group.display_name,
                        account: &req.account,
                        org_unit: &org_unit,
                        service: &req.service,
                        resource: &req.resource,
                        permission: &req.permission,
                    })
                    .await
            })
            .await?;

        let submitter = ChangeSubmitter::new(
            Arc::clone(&connectors.repository),
            self.settings.github.environment_repository.as_str(),
            self.settings.github.main_branch.as_str(),
            self.settings.bot_name.as_str(),
        );
        let subject = ChangeSubject {
            service: &req.service,
            permission: &req.permission,
            resource: &req.resource,
            account: &req.account,
            user_name: &actor.user_name,
        };
        let mut change_request = submitter.prepare(&subject, &group.display_name, change, Utc::now());
        let pull_request_url = self
            .stage(ctx, Stage::SubmitChange, submitter.submit(&mut change_request))
            .await?;

        let router = ApprovalRouter::new(
            Arc::clone(&connectors.on_call),
            Arc::clone(&connectors.ticketing),
            self.settings.schedule_id.as_str(),
            self.settings.project_key.as_str(),
            self.settings.issue_type.as_str(),
        );
        let ticket_key = self
            .stage(
                ctx,
                Stage::RouteApproval,
                router.route(ApprovalSubject {
                    requester_email: &actor.email,
                    service: &req.service,
                    resource: &req.resource,
                    permission: &req.permission,
                    account: &req.account,
                    pull_request_url: &pull_request_url,
                }),
            )
            .await?;

        Ok(WorkflowSuccess::Granted {
            ticket_key,
            pull_request_url,
            branch_name: change_request.branch_name,
        })
    }

    /// Account resolution followed by the credentialed collaborators.
    async fn open_session(
        &self,
        ctx: &RunContext<'_>,
        account: &str,
    ) -> Result<Session, WorkflowError> {
        let account_id = self
            .stage(ctx, Stage::ResolveAccount, async {
                match self.accounts.resolve_account_id(account).await {
                    Ok(Some(id)) => Ok(id),
                    Ok(None) => Err(WorkflowError::AccountNotFound {
                        account: account.to_string(),
                    }),
                    Err(e) => {
                        tracing::error!(account, error = %e, "account lookup failed");
                        Err(WorkflowError::AccountNotFound {
                            account: account.to_string(),
                        })
                    }
                }
            })
            .await?;

        let connectors = self
            .stage(ctx, Stage::OpenConnectors, async {
                self.connectors.connect().await.map_err(|e| {
                    tracing::error!(error = %e, "failed to build connectors from secrets");
                    WorkflowError::SecretRetrievalFailed
                })
            })
            .await?;

        Ok(Session {
            account_id,
            connectors,
        })
    }

    fn identity(&self, connectors: &Connectors) -> IdentityResolver {
        IdentityResolver::new(
            Arc::clone(&connectors.directory),
            self.settings.group_prefix.as_str(),
        )
    }

    // A missing organizational unit does not stop the grant.
    async fn org_unit(&self, account_id: &str) -> String {
        match self.accounts.resolve_org_unit(account_id).await {
            Ok(Some(name)) => name,
            Ok(None) => {
                tracing::warn!(account_id, "account has no organizational unit");
                String::new()
            }
            Err(e) => {
                tracing::warn!(account_id, error = %e, "organizational unit lookup failed");
                String::new()
            }
        }
    }

    async fn stage<T, F>(
        &self,
        ctx: &RunContext<'_>,
        stage: Stage,
        fut: F,
    ) -> Result<T, WorkflowError>
    where
        F: Future<Output = Result<T, WorkflowError>>,
    {
        let result = fut.await;
        self.audit.record(WorkflowAuditEvent {
            request_id: ctx.request_id,
            user_name: ctx.user_name.to_string(),
            verb: ctx.verb,
            stage,
            failure: result.as_ref().err().map(WorkflowError::kind),
        });
        result
    }
}
