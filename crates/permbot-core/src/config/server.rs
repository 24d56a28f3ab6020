//! Receiver, dispatch and chat settings.

use serde::{Deserialize, Serialize};

/// HTTP receiver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address, e.g. "0.0.0.0:8080"
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// How the receiver hands a command off to the worker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Spawn the workflow on the receiver's own runtime.
    #[default]
    InProcess,
    /// Invoke a separately deployed worker function asynchronously.
    Lambda,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default)]
    pub mode: DispatchMode,

    /// Worker function name (lambda mode only).
    #[serde(default)]
    pub function_name: Option<String>,
}

/// Chat-facing presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Prefix identifying the bot in every callback message.
    #[serde(default = "default_bot_name")]
    pub bot_name: String,
}

fn default_bot_name() -> String {
    "AWS Permissions bot".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            bot_name: default_bot_name(),
        }
    }
}
