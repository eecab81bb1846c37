use std::path::{Path, PathBuf};

use anyhow::Result;

pub const LOCKED_STORE_RECEIPT: &str = "Contents/_MASReceipt/receipt";
pub const BUNDLE_INFO_PLIST: &str = "Contents/Info.plist";
pub const BUNDLE_VERSION_KEY: &str = "CFBundleShortVersionString";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallChannel {
    Direct,
    LockedStore,
}

impl InstallChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::LockedStore => "locked-store",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledApp {
    pub path: PathBuf,
    pub present: bool,
    pub version: Option<String>,
    pub channel: InstallChannel,
}

impl InstalledApp {
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            present: false,
            version: None,
            channel: InstallChannel::Direct,
        }
    }

    pub fn installed(
        path: impl Into<PathBuf>,
        version: Option<String>,
        channel: InstallChannel,
    ) -> Self {
        Self {
            path: path.into(),
            present: true,
            version,
            channel,
        }
    }
}

pub trait InstalledAppProbe {
    fn probe(&self, bundle_path: &Path) -> Result<InstalledApp>;
}

pub fn bundle_path(volume_root: &Path, install_root: &str, app_name: &str) -> PathBuf {
    volume_root
        .join(install_root)
        .join(format!("{app_name}.app"))
}
