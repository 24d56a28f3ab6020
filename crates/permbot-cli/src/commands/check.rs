//! `permbot check-config` - load and validate the config file.

use permbot_core::PermbotConfig;
use permbot_core::config::DispatchMode;
use std::path::Path;

pub fn run(path: &Path) -> anyhow::Result<()> {
    let cfg = PermbotConfig::from_file(path)?;

    println!("config ok: {}", path.display());
    println!("  bind:        {}", cfg.server.bind);
    println!(
        "  dispatch:    {}",
        match cfg.dispatch.mode {
            DispatchMode::InProcess => "in_process".to_string(),
            DispatchMode::Lambda => format!(
                "lambda ({})",
                cfg.dispatch.function_name.as_deref().unwrap_or_default()
            ),
        }
    );
    println!(
        "  repositories: {}/{}, {}/{}",
        cfg.github.owner,
        cfg.github.environment_repository,
        cfg.github.owner,
        cfg.github.module_repository
    );
    println!("  jira project: {}", cfg.jira.project_key);
    println!(
        "  generator:   {:?} ({})",
        cfg.generator.provider,
        cfg.generator.model_id()
    );
    Ok(())
}
