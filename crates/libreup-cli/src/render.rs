use std::io::IsTerminal;
use std::time::{Duration, Instant};

use anstyle::{AnsiColor, Effects, Style};
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};

use crate::orchestrator::InstallOutcome;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputStyle {
    Plain,
    Rich,
}

pub fn resolve_output_style(stdout_is_tty: bool, force_plain: bool) -> OutputStyle {
    if stdout_is_tty && !force_plain {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

pub fn current_output_style(force_plain: bool) -> OutputStyle {
    resolve_output_style(std::io::stdout().is_terminal(), force_plain)
}

pub fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => {
            let badge = match status {
                "ok" => "[OK]",
                "warn" => "[WARN]",
                "err" => "[ERR]",
                "skip" => "[SKIP]",
                _ => "[..]",
            };
            format!("{badge} {message}")
        }
    }
}

pub fn render_section_header(style: OutputStyle, title: &str) -> Option<String> {
    match style {
        OutputStyle::Plain => None,
        OutputStyle::Rich => Some(colorize(section_style(), &format!("== {title} =="))),
    }
}

pub fn format_outcome_lines(outcome: &InstallOutcome, style: OutputStyle) -> Vec<String> {
    match outcome {
        InstallOutcome::UpToDate { installed, latest } => vec![render_status_line(
            style,
            "skip",
            &format!(
                "LibreOffice {} is up to date (latest {latest}); nothing to do",
                installed.as_deref().unwrap_or("unknown")
            ),
        )],
        InstallOutcome::WouldInstall {
            installed,
            latest,
            reason,
        } => vec![render_status_line(
            style,
            "step",
            &format!(
                "would install LibreOffice {latest} over {} (reason={reason})",
                installed.as_deref().unwrap_or("nothing")
            ),
        )],
        InstallOutcome::Installed {
            previous,
            version,
            reason,
            quit,
        } => {
            let mut lines = Vec::new();
            if !quit.nothing_running() {
                lines.push(render_status_line(
                    style,
                    "step",
                    &format!("quit running instances for {}", quit.owners.join(", ")),
                ));
            }
            lines.push(render_status_line(
                style,
                "ok",
                &format!(
                    "installed LibreOffice {version} (previous={}, reason={reason})",
                    previous.as_deref().unwrap_or("none")
                ),
            ));
            lines
        }
    }
}

pub fn format_error_line(style: OutputStyle, err: &anyhow::Error) -> String {
    render_status_line(style, "err", &format!("error: {err:#}"))
}

pub fn print_outcome(outcome: &InstallOutcome, style: OutputStyle) {
    if let Some(header) = render_section_header(style, "libreup") {
        println!("{header}");
    }
    for line in format_outcome_lines(outcome, style) {
        println!("{line}");
    }
}

pub struct DownloadProgress {
    label: String,
    downloaded: u64,
    progress_bar: Option<ProgressBar>,
    started_at: Instant,
}

impl DownloadProgress {
    pub fn start(style: OutputStyle, label: &str) -> Self {
        let progress_bar = if style == OutputStyle::Rich {
            let progress_bar = ProgressBar::new_spinner();
            progress_bar.set_message(label.to_string());
            progress_bar.enable_steady_tick(Duration::from_millis(80));
            Some(progress_bar)
        } else {
            None
        };

        Self {
            label: label.to_string(),
            downloaded: 0,
            progress_bar,
            started_at: Instant::now(),
        }
    }

    pub fn set(&mut self, downloaded: u64, total: Option<u64>) {
        self.downloaded = downloaded;
        let Some(progress_bar) = &self.progress_bar else {
            return;
        };

        if let Some(total) = total {
            if progress_bar.length() != Some(total) {
                progress_bar.set_length(total);
                if let Ok(style) = ProgressStyle::with_template(
                    "{msg:<10} [{bar:24.cyan/blue}] {bytes:>10}/{total_bytes:10} {bytes_per_sec}",
                ) {
                    progress_bar.set_style(style.progress_chars("=>-"));
                }
            }
        }
        progress_bar.set_position(downloaded);
    }

    pub fn finish_success(mut self) {
        let Some(progress_bar) = self.progress_bar.take() else {
            return;
        };
        progress_bar.finish_and_clear();
        println!(
            "{} {} in {}",
            colorize(progress_label_style(), &self.label),
            HumanBytes(self.downloaded),
            format_elapsed(self.started_at.elapsed())
        );
    }

    pub fn finish_abandon(mut self) {
        if let Some(progress_bar) = self.progress_bar.take() {
            progress_bar.finish_and_clear();
        }
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let millis = elapsed.subsec_millis();
    format!("{secs}.{millis:03}s")
}

fn section_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightBlue.into()))
        .effects(Effects::BOLD)
}

fn progress_label_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightCyan.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
