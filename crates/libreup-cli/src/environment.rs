use std::path::{Path, PathBuf};

use anyhow::Result;
use libreup_core::{Arch, InstalledApp, InstalledAppProbe, InstallerConfig};
use libreup_fetch::{
    download_disk_image, latest_version, verify_disk_image, ChecksumCheck, DownloadedDiskImage,
    HttpClient,
};
use libreup_installer::{
    attach_disk_image, detach_disk_image, locate_bundle, quit_all, replace_bundle, FsAppProbe,
    QuitReport, SystemProcessControl,
};

use crate::orchestrator::InstallEnvironment;
use crate::render::{DownloadProgress, OutputStyle};

pub struct SystemEnvironment {
    config: InstallerConfig,
    arch: Arch,
    style: OutputStyle,
    client: HttpClient,
    processes: SystemProcessControl,
}

impl SystemEnvironment {
    pub fn new(config: InstallerConfig, arch: Arch, style: OutputStyle) -> Result<Self> {
        Ok(Self {
            config,
            arch,
            style,
            client: HttpClient::new()?,
            processes: SystemProcessControl::new(),
        })
    }

    fn mount_base(&self) -> PathBuf {
        self.config.download_dir()
    }
}

impl InstallEnvironment for SystemEnvironment {
    fn latest_version(&mut self) -> Result<String> {
        latest_version(&self.client, &self.config.version_url)
    }

    fn probe(&mut self, bundle_path: &Path) -> Result<InstalledApp> {
        FsAppProbe.probe(bundle_path)
    }

    fn download(&mut self, version: &str) -> Result<DownloadedDiskImage> {
        let mut progress = DownloadProgress::start(self.style, "download");
        let result = download_disk_image(
            &self.client,
            &self.config.download_base_url,
            version,
            self.arch,
            &self.config.download_dir(),
            |downloaded, total| progress.set(downloaded, total),
        );
        match &result {
            Ok(_) => progress.finish_success(),
            Err(_) => progress.finish_abandon(),
        }
        result
    }

    fn verify(&mut self, image: &DownloadedDiskImage) -> Result<ChecksumCheck> {
        verify_disk_image(image)
    }

    fn quit_running(&mut self) -> Result<QuitReport> {
        quit_all(
            &mut self.processes,
            &self.config.process_name,
            &self.config.app_name,
            self.config.quit_grace(),
        )
    }

    fn attach(&mut self, image_path: &Path) -> Result<PathBuf> {
        attach_disk_image(image_path, &self.mount_base())
    }

    fn replace(&mut self, mount_point: &Path, bundle_path: &Path) -> Result<()> {
        let source = locate_bundle(mount_point, &self.config.app_name)?;
        replace_bundle(&source, bundle_path)
    }

    fn detach(&mut self, mount_point: &Path) -> Result<()> {
        detach_disk_image(mount_point)
    }
}
