use crate::state::AppState;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use permbot_core::SlashCommandEvent;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/slack/commands", post(slash_command))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "service": "permbot-server" }))
}

/// Fields of the slash-command form body; the rest are ignored.
#[derive(Debug, Deserialize)]
struct SlashCommandForm {
    #[serde(default)]
    text: String,
    user_name: String,
    response_url: String,
}

/// Hand the command off and acknowledge at once. The outcome, errors
/// included, arrives later through the response URL.
async fn slash_command(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SlashCommandForm>,
) -> StatusCode {
    let event = SlashCommandEvent {
        text: form.text,
        user_name: form.user_name,
        response_url: form.response_url,
    };
    tracing::info!(user = %event.user_name, "slash command received");

    if let Err(e) = state.dispatch.dispatch(&event).await {
        tracing::error!(user = %event.user_name, error = %e, "dispatch failed");
    }
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use permbot_core::PermbotConfig;
    use permbot_runtime::AsyncDispatch;
    use std::sync::Mutex;
    use tokio_util::task::TaskTracker;
    use tower::ServiceExt;

    #[derive(Default)]
    struct RecordingDispatch {
        fail: bool,
        events: Mutex<Vec<SlashCommandEvent>>,
    }

    #[async_trait]
    impl AsyncDispatch for RecordingDispatch {
        async fn dispatch(&self, event: &SlashCommandEvent) -> anyhow::Result<()> {
            self.events.lock().unwrap().push(event.clone());
            if self.fail {
                anyhow::bail!("lambda throttled");
            }
            Ok(())
        }
    }

    fn app(dispatch: Arc<RecordingDispatch>) -> Router {
        router(Arc::new(AppState {
            cfg: PermbotConfig::default(),
            dispatch,
            in_flight: TaskTracker::new(),
        }))
    }

    fn command(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/slack/commands")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn command_is_dispatched_and_acknowledged() {
        let dispatch = Arc::new(RecordingDispatch::default());
        let response = app(dispatch.clone())
            .oneshot(command(
                "command=%2Faws_permissions&text=list+-s+s3+-a+acct1&user_name=alice&response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2F1&team_id=T1",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(body.is_empty());
        assert_eq!(
            *dispatch.events.lock().unwrap(),
            vec![SlashCommandEvent {
                text: "list -s s3 -a acct1".to_string(),
                user_name: "alice".to_string(),
                response_url: "https://hooks.slack.com/commands/1".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn dispatch_failure_is_still_acknowledged() {
        let dispatch = Arc::new(RecordingDispatch {
            fail: true,
            ..Default::default()
        });
        let response = app(dispatch.clone())
            .oneshot(command("text=help&user_name=alice&response_url=https%3A%2F%2Fh%2F1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(dispatch.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn healthz_reports_service() {
        let response = app(Arc::new(RecordingDispatch::default()))
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "ok": true, "service": "permbot-server" }));
    }
}
