//! `permbot parse` - show how command text is understood.

use permbot_core::Command;

pub fn run(text: &str) -> anyhow::Result<()> {
    println!("{}", render(text)?);
    Ok(())
}

fn render(text: &str) -> anyhow::Result<String> {
    let command = Command::parse(text)?;
    Ok(serde_json::to_string_pretty(&command)?)
}
