use clap::{Parser, Subcommand, ValueEnum};
use permbot_core::PermbotConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "permbot", version, about = "AWS permissions chat bot")]
struct Cli {
    /// Config file (defaults to $PERMBOT_CONFIG, then ./permbot.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the slash-command receiver.
    Serve,

    /// Run one dispatched event to completion (the worker side of async dispatch).
    Handle {
        /// JSON event file; reads stdin when omitted or "-"
        file: Option<PathBuf>,
    },

    /// Parse command text and print the structured command.
    Parse {
        /// Command text, e.g. "grant -s s3 -p write -a acct1 -r bucket"
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Load and validate the config file.
    CheckConfig,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn load_config(explicit: Option<&std::path::Path>) -> anyhow::Result<PermbotConfig> {
    let path = PermbotConfig::resolve_path(explicit);
    let cfg = PermbotConfig::from_file(&path)?;
    tracing::debug!(config = %path.display(), "configuration loaded");
    Ok(cfg)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.cmd {
        Command::Serve => {
            let cfg = load_config(cli.config.as_deref())?;
            permbot_server::serve(cfg).await?
        }
        Command::Handle { file } => {
            let cfg = load_config(cli.config.as_deref())?;
            commands::handle::run(&cfg, file.as_deref()).await?
        }
        Command::Parse { text } => commands::parse::run(&text.join(" "))?,
        Command::CheckConfig => {
            let path = PermbotConfig::resolve_path(cli.config.as_deref());
            commands::check::run(&path)?
        }
    }

    Ok(())
}
