use std::collections::BTreeSet;
use std::process::Command;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use crate::command::{capture_command, command_failure, render_command, run_command};

const QUIT_POLL_INTERVAL: Duration = Duration::from_millis(500);

pub trait ProcessControl {
    fn find_pids(&mut self, process_name: &str) -> Result<Vec<u32>>;
    fn process_owners(&mut self, pids: &[u32]) -> Result<Vec<String>>;
    fn quit_app_as(&mut self, app_name: &str, user: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuitReport {
    pub pids: Vec<u32>,
    pub owners: Vec<String>,
}

impl QuitReport {
    pub fn nothing_running(&self) -> bool {
        self.pids.is_empty()
    }
}

pub fn quit_all<C: ProcessControl>(
    control: &mut C,
    process_name: &str,
    app_name: &str,
    grace: Duration,
) -> Result<QuitReport> {
    let pids = control.find_pids(process_name)?;
    if pids.is_empty() {
        debug!(process_name, "no running instances");
        return Ok(QuitReport {
            pids,
            owners: Vec::new(),
        });
    }

    let owners = unique_owners(&control.process_owners(&pids)?);
    info!(process_name, ?pids, ?owners, "quitting running instances");
    for owner in &owners {
        control
            .quit_app_as(app_name, owner)
            .with_context(|| format!("failed to quit {app_name} for user '{owner}'"))?;
    }

    let deadline = Instant::now()
        .checked_add(grace)
        .ok_or_else(|| anyhow!("quit grace period out of range: {}s", grace.as_secs()))?;
    loop {
        let remaining = control.find_pids(process_name)?;
        if remaining.is_empty() {
            break;
        }
        let now = Instant::now();
        if now >= deadline {
            return Err(anyhow!(
                "unable to quit {process_name}: still running as pid(s) {}",
                join_pids(&remaining)
            ));
        }
        thread::sleep(QUIT_POLL_INTERVAL.min(deadline - now));
    }

    Ok(QuitReport { pids, owners })
}

pub fn unique_owners(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|owner| owner.trim())
        .filter(|owner| !owner.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn parse_pids(stdout: &str) -> Result<Vec<u32>> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.parse::<u32>()
                .with_context(|| format!("invalid pid in process listing: '{line}'"))
        })
        .collect()
}

fn join_pids(pids: &[u32]) -> String {
    pids.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn build_pgrep_command(process_name: &str) -> Command {
    let mut command = Command::new("pgrep");
    command.arg("-x").arg(process_name);
    command
}

pub fn build_process_owner_command(pids: &[u32]) -> Command {
    let mut command = Command::new("ps");
    command.arg("-p").arg(join_pids(pids)).arg("-o").arg("user=");
    command
}

// `osascript` must run inside the owner's session.
pub fn build_quit_app_command(app_name: &str, user: &str, current_user: Option<&str>) -> Command {
    let script = format!("quit app \"{}\"", app_name.replace('"', "\\\""));
    if current_user == Some(user) {
        let mut command = Command::new("osascript");
        command.arg("-e").arg(script);
        return command;
    }

    let mut command = Command::new("sudo");
    command
        .arg("--non-interactive")
        .arg("--user")
        .arg(user)
        .arg("osascript")
        .arg("-e")
        .arg(script);
    command
}

#[derive(Debug, Clone, Default)]
pub struct SystemProcessControl {
    current_user: Option<String>,
}

impl SystemProcessControl {
    pub fn new() -> Self {
        let current_user = std::env::var("USER")
            .or_else(|_| std::env::var("LOGNAME"))
            .ok()
            .filter(|user| !user.is_empty());
        Self { current_user }
    }
}

impl ProcessControl for SystemProcessControl {
    fn find_pids(&mut self, process_name: &str) -> Result<Vec<u32>> {
        let mut command = build_pgrep_command(process_name);
        let output = capture_command(&mut command, "failed to list processes")?;
        match output.code {
            Some(0) => parse_pids(&output.stdout),
            // pgrep exits with 1 when nothing matched.
            Some(1) => Ok(Vec::new()),
            _ => Err(command_failure("failed to list processes", &output)),
        }
    }

    fn process_owners(&mut self, pids: &[u32]) -> Result<Vec<String>> {
        let mut command = build_process_owner_command(pids);
        let output = capture_command(&mut command, "failed to look up process owners")?;
        // ps exits with 1 when some of the pids exited since they were listed.
        match output.code {
            Some(0) | Some(1) => Ok(output.stdout.lines().map(str::to_string).collect()),
            _ => Err(command_failure("failed to look up process owners", &output)),
        }
    }

    fn quit_app_as(&mut self, app_name: &str, user: &str) -> Result<()> {
        let mut command = build_quit_app_command(app_name, user, self.current_user.as_deref());
        info!(command = %render_command(&command), "requesting quit");
        run_command(&mut command, "quit request failed")
    }
}
