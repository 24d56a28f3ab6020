//! `permbot handle` - run one dispatched slash-command event.
//!
//! The event is the JSON document the receiver dispatches
//! (`{"text": ..., "user_name": ..., "response_url": ...}`). The outcome is
//! posted to the response URL like any other run; a summary is also
//! printed to stdout. `permbot-lambda-worker` is the same step on the
//! Lambda runtime.

use anyhow::Context;
use permbot_core::{PermbotConfig, SlashCommandEvent};
use permbot_server::{Worker, summarize};
use std::io::Read;
use std::path::Path;

pub async fn run(cfg: &PermbotConfig, file: Option<&Path>) -> anyhow::Result<()> {
    let raw = read_event(file)?;
    let event: SlashCommandEvent =
        serde_json::from_str(&raw).context("event is not a slash-command JSON document")?;

    let worker = Worker::from_config(cfg).await;
    let outcome = worker.handle(&event).await;

    println!("{}", serde_json::to_string_pretty(&summarize(&outcome))?);
    Ok(())
}

fn read_event(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read event file {}", path.display())),
        _ => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read event from stdin")?;
            Ok(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_event_file() {
        let path = std::env::temp_dir().join(format!("permbot-event-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"text":"help","user_name":"alice","response_url":"https://h/1"}"#,
        )
        .unwrap();

        let raw = read_event(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();
        let event: SlashCommandEvent = serde_json::from_str(&raw).unwrap();
        assert_eq!(event.user_name, "alice");
    }

    #[test]
    fn missing_event_file_names_the_path() {
        let err = read_event(Some(Path::new("/nonexistent/permbot-event.json"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/permbot-event.json"));
    }
}
