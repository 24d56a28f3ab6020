//! Slash-command model and parser.
//!
//! Grammar (text after the slash command):
//!
//! ```text
//! help
//! list  -s <s3|sqs> -a <account>
//! grant -s <s3|sqs> -p <permission> -a <account> -r <resource> [-o <user>] [-ps <permission-set>]
//! ```
//!
//! The service value is kept as free text here; unsupported services are
//! rejected by the resource catalog, not by the parser.

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Static usage text returned for `help` and appended to usage errors.
pub const USAGE: &str = "```
/aws_permissions list -s s3|sqs -a <account>
/aws_permissions grant -s s3|sqs -p <permission> -a <account> -r <resource> -o <on-behalf> -ps <permission-set-name>
-s, --service: AWS Service
-p, --permission: Permission
-a, --account: AWS Account
-r, --resource: Resource Name
-o, --on-behalf: On Behalf
-ps, --permission-set-name: Permission Set Name
examples:
    /aws_permissions list -s s3|sqs -a account_name
    /aws_permissions grant -s s3|sqs -p write -a <account_name> -r <bucket_name>
    /aws_permissions grant -s s3|sqs -p write -a <account_name> -r <bucket_name> -o <on-behalf-user-name> -ps <permission-set-name>
```";

/// Verb tag of a parsed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Help,
    List,
    Grant,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verb::Help => write!(f, "help"),
            Verb::List => write!(f, "list"),
            Verb::Grant => write!(f, "grant"),
        }
    }
}

/// Structured representation of one chat command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verb", rename_all = "lowercase")]
pub enum Command {
    Help,
    List(ListRequest),
    Grant(GrantRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequest {
    pub service: String,
    pub account: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRequest {
    pub service: String,
    pub account: String,
    pub resource: String,
    pub permission: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_behalf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_set_name: Option<String>,
}

impl Command {
    /// Parse the text that followed the slash command.
    pub fn parse(text: &str) -> Result<Self, CommandParseError> {
        let tokens = text.split_whitespace().map(normalize_flag);
        let line = CommandLine::try_parse_from(tokens)
            .map_err(|e| CommandParseError::new(e.render().to_string()))?;
        Ok(line.verb.into())
    }

    pub fn verb(&self) -> Verb {
        match self {
            Command::Help => Verb::Help,
            Command::List(_) => Verb::List,
            Command::Grant(_) => Verb::Grant,
        }
    }
}

/// Failure to turn command text into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CommandParseError {
    pub message: String,
}

impl CommandParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into().trim().to_string(),
        }
    }
}

// `-ps` is a two-letter short flag, which clap cannot express directly.
fn normalize_flag(token: &str) -> String {
    match token {
        "-ps" => "--permission-set-name".to_string(),
        other => other.to_string(),
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "/aws_permissions",
    no_binary_name = true,
    disable_help_subcommand = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct CommandLine {
    #[command(subcommand)]
    verb: VerbArgs,
}

#[derive(Subcommand, Debug)]
enum VerbArgs {
    /// Show usage
    Help,

    /// List resources of a service in an account
    List {
        #[arg(short = 's', long)]
        service: String,
        #[arg(short = 'a', long)]
        account: String,
    },

    /// Request a permission on a resource
    Grant {
        #[arg(short = 's', long)]
        service: String,
        #[arg(short = 'p', long)]
        permission: String,
        #[arg(short = 'a', long)]
        account: String,
        #[arg(short = 'r', long)]
        resource: String,
        #[arg(short = 'o', long = "on-behalf")]
        on_behalf: Option<String>,
        #[arg(long = "permission-set-name")]
        permission_set_name: Option<String>,
    },
}

impl From<VerbArgs> for Command {
    fn from(args: VerbArgs) -> Self {
        match args {
            VerbArgs::Help => Command::Help,
            VerbArgs::List { service, account } => Command::List(ListRequest { service, account }),
            VerbArgs::Grant {
                service,
                permission,
                account,
                resource,
                on_behalf,
                permission_set_name,
            } => Command::Grant(GrantRequest {
                service,
                account,
                resource,
                permission,
                on_behalf,
                permission_set_name,
            }),
        }
    }
}
