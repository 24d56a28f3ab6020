use serde::{Deserialize, Serialize};

pub mod change;
pub mod command;
// Configuration types shared across all permbot crates
pub mod config;
pub mod error;
pub mod ticket;

pub use change::{ChangeRequest, ChangeSubject, FileContent};
pub use command::{Command, CommandParseError, GrantRequest, ListRequest, Verb, USAGE};
pub use config::{ConfigError, PermbotConfig};
pub use error::{SubmissionStep, WorkflowError};
pub use ticket::Ticket;

/// Raw slash-command invocation as delivered by the chat platform.
///
/// This is the payload handed from the receiver to the worker through the
/// async dispatch channel, so it must stay serializable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashCommandEvent {
    /// Command text following the slash command itself.
    #[serde(default)]
    pub text: String,
    /// Chat user name of the caller.
    pub user_name: String,
    /// Callback URL that accepts the single outcome message.
    pub response_url: String,
}

/// The identity a request is made for.
///
/// Built once per invocation, either from the caller or from the `-o`
/// on-behalf target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_name: String,
    pub email: String,
}

impl Actor {
    pub fn new(user_name: impl Into<String>, domain: &str) -> Self {
        let user_name = user_name.into();
        let email = format!("{}@{}", user_name, domain);
        Self { user_name, email }
    }

    /// Resolve the effective actor: the on-behalf target wins over the caller.
    pub fn for_request(caller: &str, on_behalf: Option<&str>, domain: &str) -> Self {
        match on_behalf {
            Some(target) if !target.is_empty() => Self::new(target, domain),
            _ => Self::new(caller, domain),
        }
    }
}

/// A directory group granting access to one AWS permission set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationGroup {
    /// Full directory group name, marker prefix included (e.g. `aws_platform_rw`).
    pub name: String,
    /// Name with the marker prefix stripped; used in repository paths and messages.
    pub display_name: String,
}

impl AuthorizationGroup {
    pub fn from_directory(name: impl Into<String>, prefix: &str) -> Self {
        let name = name.into();
        let display_name = name.strip_prefix(prefix).unwrap_or(&name).to_string();
        Self { name, display_name }
    }
}
