use std::process::Command;

use anyhow::{anyhow, Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub fn run_command(command: &mut Command, context_message: &str) -> Result<()> {
    let output = capture_command(command, context_message)?;
    if output.success() {
        return Ok(());
    }
    Err(command_failure(context_message, &output))
}

pub fn capture_command(command: &mut Command, context_message: &str) -> Result<CommandOutput> {
    let output = command
        .output()
        .with_context(|| format!("{context_message}: command failed to start"))?;
    Ok(CommandOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

pub(crate) fn command_failure(context_message: &str, output: &CommandOutput) -> anyhow::Error {
    let status = output
        .code
        .map_or_else(|| "signal".to_string(), |code| code.to_string());
    anyhow!(
        "{context_message}: status={} stdout='{}' stderr='{}'",
        status,
        output.stdout.trim(),
        first_line(&output.stderr)
    )
}

pub fn render_command(command: &Command) -> String {
    let mut rendered = command.get_program().to_string_lossy().into_owned();
    for arg in command.get_args() {
        rendered.push(' ');
        rendered.push_str(arg.to_string_lossy().as_ref());
    }
    rendered
}

fn first_line(text: &str) -> &str {
    text.trim().lines().next().unwrap_or("")
}
