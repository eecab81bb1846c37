use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::disk_image::DEFAULT_DOWNLOAD_BASE_URL;

pub const DEFAULT_VERSION_URL: &str = "https://www.libreoffice.org/download/download-libreoffice/";
pub const DEFAULT_APP_NAME: &str = "LibreOffice";
pub const DEFAULT_PROCESS_NAME: &str = "soffice";
pub const DEFAULT_INSTALL_ROOT: &str = "Applications";
pub const DEFAULT_QUIT_GRACE_SECS: u64 = 10;
pub const MAX_QUIT_GRACE_SECS: u64 = 600;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerConfig {
    pub app_name: String,
    pub process_name: String,
    pub install_root: String,
    pub version_url: String,
    pub download_base_url: String,
    pub download_dir: Option<PathBuf>,
    pub quit_grace_secs: u64,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            process_name: DEFAULT_PROCESS_NAME.to_string(),
            install_root: DEFAULT_INSTALL_ROOT.to_string(),
            version_url: DEFAULT_VERSION_URL.to_string(),
            download_base_url: DEFAULT_DOWNLOAD_BASE_URL.to_string(),
            download_dir: None,
            quit_grace_secs: DEFAULT_QUIT_GRACE_SECS,
        }
    }
}

impl InstallerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("failed to parse config: {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("app_name", &self.app_name),
            ("process_name", &self.process_name),
            ("install_root", &self.install_root),
            ("version_url", &self.version_url),
            ("download_base_url", &self.download_base_url),
        ] {
            if value.trim().is_empty() {
                return Err(anyhow!("{field} must not be empty"));
            }
        }
        if Path::new(&self.install_root).is_absolute() {
            return Err(anyhow!(
                "install_root must be relative to the target volume: {}",
                self.install_root
            ));
        }
        if self.quit_grace_secs > MAX_QUIT_GRACE_SECS {
            return Err(anyhow!(
                "quit_grace_secs must be at most {MAX_QUIT_GRACE_SECS}, got {}",
                self.quit_grace_secs
            ));
        }
        Ok(())
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn quit_grace(&self) -> Duration {
        Duration::from_secs(self.quit_grace_secs)
    }
}
