mod app;
mod config;
mod decision;
mod disk_image;
mod error;
mod version;

pub use app::{
    bundle_path, InstallChannel, InstalledApp, InstalledAppProbe, BUNDLE_INFO_PLIST,
    BUNDLE_VERSION_KEY, LOCKED_STORE_RECEIPT,
};
pub use config::{
    InstallerConfig, DEFAULT_APP_NAME, DEFAULT_INSTALL_ROOT, DEFAULT_PROCESS_NAME,
    DEFAULT_QUIT_GRACE_SECS, DEFAULT_VERSION_URL, MAX_QUIT_GRACE_SECS,
};
pub use decision::{needs_installation, UpgradeReason, UpgradeRequirement};
pub use disk_image::{
    checksum_url, disk_image_file_name, disk_image_url, disk_image_url_with_base, Arch,
    CHECKSUM_SUFFIX, DEFAULT_DOWNLOAD_BASE_URL,
};
pub use error::{chain_message, InstallError};
pub use version::{compare, Version, VersionError, VersionOrdering};

#[cfg(test)]
mod tests;
