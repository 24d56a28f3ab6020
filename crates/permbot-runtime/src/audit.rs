use permbot_core::Verb;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ParseCommand,
    ResolveAccount,
    OpenConnectors,
    ResolveIdentity,
    ListResources,
    CheckResource,
    ComposeChange,
    SubmitChange,
    RouteApproval,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ParseCommand => "parse_command",
            Stage::ResolveAccount => "resolve_account",
            Stage::OpenConnectors => "open_connectors",
            Stage::ResolveIdentity => "resolve_identity",
            Stage::ListResources => "list_resources",
            Stage::CheckResource => "check_resource",
            Stage::ComposeChange => "compose_change",
            Stage::SubmitChange => "submit_change",
            Stage::RouteApproval => "route_approval",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowAuditEvent {
    pub request_id: Uuid,
    pub user_name: String,
    pub verb: Option<Verb>,
    pub stage: Stage,
    /// `None` on success, otherwise the failure kind.
    pub failure: Option<&'static str>,
}

/// Receives one record per executed stage.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: WorkflowAuditEvent);
}

/// Emits audit records as structured tracing events.
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: WorkflowAuditEvent) {
        let verb = event.verb.map(|v| v.to_string()).unwrap_or_default();
        match event.failure {
            None => tracing::info!(
                target: "permbot::audit",
                request_id = %event.request_id,
                user = %event.user_name,
                verb = %verb,
                stage = %event.stage,
                "stage completed"
            ),
            Some(kind) => tracing::warn!(
                target: "permbot::audit",
                request_id = %event.request_id,
                user = %event.user_name,
                verb = %verb,
                stage = %event.stage,
                failure = kind,
                "stage failed"
            ),
        }
    }
}
