//! User-facing chat messages.

use permbot_core::{USAGE, WorkflowError};

pub fn usage(bot: &str) -> String {
    format!("{} - usage:\n{}", bot, USAGE)
}

/// Resource names one per line inside a code block.
pub fn resources(bot: &str, names: &[String]) -> String {
    let mut text = format!("{} - Resources:\n```", bot);
    for name in names {
        text.push_str(name);
        text.push('\n');
    }
    text.push_str("```");
    text
}

pub fn granted(bot: &str, ticket_key: &str, pull_request_url: &str) -> String {
    format!(
        "{} - Jira ticket {} was created, pull request was generated {}",
        bot, ticket_key, pull_request_url
    )
}

pub fn error(bot: &str, error: &WorkflowError) -> String {
    let mut text = format!("{} Error - {}", bot, error);
    if matches!(error, WorkflowError::Usage(_)) {
        text.push('\n');
        text.push_str(USAGE);
    }
    text
}
