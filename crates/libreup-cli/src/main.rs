use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use libreup_core::{bundle_path, Arch, InstallError, InstallerConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod environment;
mod orchestrator;
mod render;

use environment::SystemEnvironment;
use orchestrator::{run_install, InstallOutcome, InstallRequest};
use render::{current_output_style, format_error_line, print_outcome, OutputStyle};

// Management agents pass `<mount point> <computer name> <target volume>`.
#[derive(Parser, Debug)]
#[command(name = "libreup")]
#[command(about = "Installs or upgrades LibreOffice on macOS", long_about = None)]
struct Cli {
    #[arg(value_name = "MOUNT_POINT")]
    caller_mount_point: Option<String>,
    #[arg(value_name = "COMPUTER_NAME")]
    computer_name: Option<String>,
    #[arg(value_name = "TARGET_VOLUME")]
    target_volume: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    arch: Option<String>,
    #[arg(long)]
    dry_run: bool,
    #[arg(long)]
    plain: bool,
}

impl Cli {
    fn volume_root(&self) -> PathBuf {
        self.target_volume
            .as_deref()
            .map(str::trim)
            .filter(|volume| !volume.is_empty())
            .map_or_else(|| PathBuf::from("/"), PathBuf::from)
    }
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    let style = current_output_style(cli.plain);

    match run(&cli, style) {
        Ok(outcome) => {
            print_outcome(&outcome, style);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", format_error_line(style, &err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, style: OutputStyle) -> Result<InstallOutcome> {
    let config = load_config(cli)?;
    let arch = resolve_arch(cli.arch.as_deref())?;
    let request = InstallRequest {
        bundle_path: bundle_path(&cli.volume_root(), &config.install_root, &config.app_name),
        process_name: config.process_name.clone(),
        dry_run: cli.dry_run,
    };

    let mut env = SystemEnvironment::new(config, arch, style)
        .context("failed to initialise installer")?;
    let outcome = run_install(&mut env, &request, |phase| {
        debug!(phase = %phase, "phase reached");
    })?;
    Ok(outcome)
}

fn load_config(cli: &Cli) -> Result<InstallerConfig, InstallError> {
    match &cli.config {
        Some(path) => InstallerConfig::load(path)
            .map_err(|err| InstallError::Config(libreup_core::chain_message(&err))),
        None => Ok(InstallerConfig::default()),
    }
}

fn resolve_arch(requested: Option<&str>) -> Result<Arch, InstallError> {
    let arch = match requested {
        Some(value) => Arch::parse(value),
        None => Arch::host(),
    };
    arch.map_err(|err| InstallError::Unsupported(err.to_string()))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
