//! Worker entry point on the Lambda runtime.
//!
//! The receiver's `LambdaDispatch` invokes this function with the
//! slash-command event as its JSON payload. The run reports to chat itself;
//! the returned summary only shows up in the invocation log.

use crate::worker::{Worker, summarize};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use permbot_core::{PermbotConfig, SlashCommandEvent};
use serde_json::Value;

pub async fn handle_event(
    worker: &Worker,
    event: LambdaEvent<SlashCommandEvent>,
) -> Result<Value, Error> {
    let LambdaEvent { payload, context } = event;
    tracing::info!(
        invocation = %context.request_id,
        user = %payload.user_name,
        "dispatched event received"
    );
    let outcome = worker.handle(&payload).await;
    Ok(summarize(&outcome))
}

/// Serve invocations until the runtime shuts the process down.
pub async fn run(cfg: &PermbotConfig) -> Result<(), Error> {
    let worker = Worker::from_config(cfg).await;
    let worker = &worker;
    lambda_runtime::run(service_fn(move |event| handle_event(worker, event))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingChat, help_worker};
    use lambda_runtime::Context;
    use serde_json::json;
    use std::sync::Arc;

    fn invocation(payload: Value) -> LambdaEvent<SlashCommandEvent> {
        LambdaEvent::new(serde_json::from_value(payload).unwrap(), Context::default())
    }

    #[tokio::test]
    async fn dispatched_event_runs_and_posts_once() {
        let chat = Arc::new(RecordingChat::default());
        let worker = help_worker(chat.clone());

        let summary = handle_event(
            &worker,
            invocation(json!({
                "text": "help",
                "user_name": "alice",
                "response_url": "https://hooks.slack.com/commands/1"
            })),
        )
        .await
        .unwrap();

        assert_eq!(summary["result"]["status"], "ok");
        assert_eq!(summary["result"]["verb"], "help");
        let posts = chat.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].0, "https://hooks.slack.com/commands/1");
    }

    #[tokio::test]
    async fn workflow_failure_is_reported_not_raised() {
        let chat = Arc::new(RecordingChat::default());
        let worker = help_worker(chat.clone());

        let summary = handle_event(
            &worker,
            invocation(json!({
                "text": "list -s s3 -a acct1",
                "user_name": "alice",
                "response_url": "https://hooks.slack.com/commands/1"
            })),
        )
        .await
        .unwrap();

        assert_eq!(summary["result"]["status"], "error");
        assert_eq!(summary["result"]["kind"], "account_not_found");
        assert_eq!(chat.posts().len(), 1);
    }
}
