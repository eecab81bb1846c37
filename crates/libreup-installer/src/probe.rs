use std::fs;
use std::io;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use libreup_core::{
    InstallChannel, InstalledApp, InstalledAppProbe, BUNDLE_INFO_PLIST, BUNDLE_VERSION_KEY,
    LOCKED_STORE_RECEIPT,
};
use plist::Value;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct FsAppProbe;

impl InstalledAppProbe for FsAppProbe {
    fn probe(&self, bundle_path: &Path) -> Result<InstalledApp> {
        match fs::metadata(bundle_path) {
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %bundle_path.display(), "application bundle not found");
                return Ok(InstalledApp::missing(bundle_path));
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to inspect bundle: {}", bundle_path.display())
                });
            }
        }

        let channel = detect_install_channel(bundle_path)?;

        // An unreadable version is not fatal; the decision treats it as unknown.
        let version = match read_bundle_version(bundle_path) {
            Ok(version) => Some(version),
            Err(err) => {
                warn!(path = %bundle_path.display(), "could not read bundle version: {err:#}");
                None
            }
        };

        debug!(
            path = %bundle_path.display(),
            version = version.as_deref().unwrap_or("unknown"),
            channel = channel.as_str(),
            "probed application bundle"
        );
        Ok(InstalledApp::installed(bundle_path, version, channel))
    }
}

pub fn detect_install_channel(bundle_path: &Path) -> Result<InstallChannel> {
    let receipt = bundle_path.join(LOCKED_STORE_RECEIPT);
    match fs::symlink_metadata(&receipt) {
        Ok(_) => Ok(InstallChannel::LockedStore),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(InstallChannel::Direct),
        Err(err) => Err(err)
            .with_context(|| format!("failed to inspect store receipt: {}", receipt.display())),
    }
}

pub fn read_bundle_version(bundle_path: &Path) -> Result<String> {
    let info = bundle_path.join(BUNDLE_INFO_PLIST);
    let value = Value::from_file(&info)
        .with_context(|| format!("failed to read {}", info.display()))?;
    let version = value
        .as_dictionary()
        .and_then(|dict| dict.get(BUNDLE_VERSION_KEY))
        .and_then(Value::as_string)
        .map(str::trim)
        .filter(|version| !version.is_empty())
        .ok_or_else(|| anyhow!("{BUNDLE_VERSION_KEY} missing from {}", info.display()))?;
    Ok(version.to_string())
}
