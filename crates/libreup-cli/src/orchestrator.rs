use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use libreup_core::{
    chain_message, needs_installation, InstallError, InstalledApp, UpgradeReason,
    UpgradeRequirement,
};
use libreup_fetch::{ChecksumCheck, DownloadedDiskImage};
use libreup_installer::QuitReport;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallPhase {
    Start,
    VersionFetched,
    DecisionMade,
    Downloaded,
    ChecksumVerified,
    InstancesQuit,
    Mounted,
    Replaced,
    Unmounted,
    Done,
}

impl InstallPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::VersionFetched => "version-fetched",
            Self::DecisionMade => "decision-made",
            Self::Downloaded => "downloaded",
            Self::ChecksumVerified => "checksum-verified",
            Self::InstancesQuit => "instances-quit",
            Self::Mounted => "mounted",
            Self::Replaced => "replaced",
            Self::Unmounted => "unmounted",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for InstallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait InstallEnvironment {
    fn latest_version(&mut self) -> Result<String>;
    fn probe(&mut self, bundle_path: &Path) -> Result<InstalledApp>;
    fn download(&mut self, version: &str) -> Result<DownloadedDiskImage>;
    fn verify(&mut self, image: &DownloadedDiskImage) -> Result<ChecksumCheck>;
    fn quit_running(&mut self) -> Result<QuitReport>;
    fn attach(&mut self, image_path: &Path) -> Result<PathBuf>;
    fn replace(&mut self, mount_point: &Path, bundle_path: &Path) -> Result<()>;
    fn detach(&mut self, mount_point: &Path) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub bundle_path: PathBuf,
    pub process_name: String,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    UpToDate {
        installed: Option<String>,
        latest: String,
    },
    WouldInstall {
        installed: Option<String>,
        latest: String,
        reason: UpgradeReason,
    },
    Installed {
        previous: Option<String>,
        version: String,
        reason: UpgradeReason,
        quit: QuitReport,
    },
}

// Once the image is mounted it is always detached.
pub fn run_install<E, F>(
    env: &mut E,
    request: &InstallRequest,
    mut on_phase: F,
) -> Result<InstallOutcome, InstallError>
where
    E: InstallEnvironment,
    F: FnMut(InstallPhase),
{
    on_phase(InstallPhase::Start);

    let latest = env
        .latest_version()
        .map_err(|err| InstallError::Network(chain_message(&err)))?;
    info!(latest = %latest, "latest version");
    on_phase(InstallPhase::VersionFetched);

    let app = env
        .probe(&request.bundle_path)
        .map_err(|err| InstallError::Probe(chain_message(&err)))?;
    let requirement = needs_installation(&app, &latest);
    on_phase(InstallPhase::DecisionMade);

    let reason = match requirement {
        UpgradeRequirement::Skip => {
            info!(
                installed = app.version.as_deref().unwrap_or("unknown"),
                latest = %latest,
                "application is up to date"
            );
            return Ok(InstallOutcome::UpToDate {
                installed: app.version,
                latest,
            });
        }
        UpgradeRequirement::Required(reason) => reason,
    };
    info!(reason = %reason, "installation required: {}", reason.describe());

    if request.dry_run {
        return Ok(InstallOutcome::WouldInstall {
            installed: app.version,
            latest,
            reason,
        });
    }

    let image = env
        .download(&latest)
        .map_err(|err| InstallError::Network(chain_message(&err)))?;
    on_phase(InstallPhase::Downloaded);

    let check = env
        .verify(&image)
        .map_err(|err| InstallError::Network(chain_message(&err)))?;
    if !check.is_match() {
        return Err(InstallError::ChecksumMismatch {
            path: image.image_path,
            expected: check.expected,
            actual: check.actual,
        });
    }
    on_phase(InstallPhase::ChecksumVerified);

    let quit = env.quit_running().map_err(|err| InstallError::QuitFailure {
        process: request.process_name.clone(),
        detail: chain_message(&err),
    })?;
    on_phase(InstallPhase::InstancesQuit);

    let mount_point = env
        .attach(&image.image_path)
        .map_err(|err| InstallError::Mount(chain_message(&err)))?;
    on_phase(InstallPhase::Mounted);

    let replace_result = env.replace(&mount_point, &request.bundle_path);
    if replace_result.is_ok() {
        on_phase(InstallPhase::Replaced);
    }
    let detach_result = env.detach(&mount_point);

    match (replace_result, detach_result) {
        (Ok(()), Ok(())) => {}
        (Err(replace_err), Ok(())) => {
            return Err(InstallError::Copy(chain_message(&replace_err)));
        }
        (Ok(()), Err(detach_err)) => {
            return Err(InstallError::Mount(chain_message(&detach_err)));
        }
        (Err(replace_err), Err(detach_err)) => {
            warn!(mount_point = %mount_point.display(), "detach after failed replace also failed");
            return Err(InstallError::Copy(format!(
                "{}; additionally failed to detach {}: {}",
                chain_message(&replace_err),
                mount_point.display(),
                chain_message(&detach_err)
            )));
        }
    }
    on_phase(InstallPhase::Unmounted);

    on_phase(InstallPhase::Done);
    Ok(InstallOutcome::Installed {
        previous: app.version,
        version: latest,
        reason,
        quit,
    })
}
