pub mod adapter;
pub mod approval;
pub mod audit;
pub mod catalog;
pub mod composer;
pub mod identity;
pub mod messages;
pub mod orchestrator;
pub mod submitter;

pub use adapter::{
    AccountDirectory, AsyncDispatch, ChatCallback, CodeGenerator, ConnectorFactory, Connectors,
    DirectoryService, FileUpdate, OnCallDirectory, PullRequestDraft, ResourceLister, SecretStore,
    SourceRepository, Ticketing,
};
pub use audit::{AuditSink, Stage, TracingAuditSink, WorkflowAuditEvent};
pub use orchestrator::{Orchestrator, WorkflowOutcome, WorkflowSettings, WorkflowSuccess};
