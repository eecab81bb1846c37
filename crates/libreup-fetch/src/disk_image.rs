use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use libreup_core::{
    checksum_url, disk_image_file_name, disk_image_url_with_base, Arch, CHECKSUM_SUFFIX,
};
use libreup_security::{parse_checksum_file, verify_sha256_file};
use tracing::info;

use crate::http::HttpClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedDiskImage {
    pub url: String,
    pub image_path: PathBuf,
    pub checksum_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumCheck {
    pub expected: String,
    pub actual: String,
}

impl ChecksumCheck {
    pub fn is_match(&self) -> bool {
        self.expected.eq_ignore_ascii_case(&self.actual)
    }
}

pub fn download_disk_image<F>(
    client: &HttpClient,
    base_url: &str,
    version: &str,
    arch: Arch,
    download_dir: &Path,
    on_progress: F,
) -> Result<DownloadedDiskImage>
where
    F: FnMut(u64, Option<u64>),
{
    let url = disk_image_url_with_base(base_url, version, arch)?;
    let file_name = disk_image_file_name(version, arch);
    let image_path = download_dir.join(&file_name);
    let checksum_path = download_dir.join(format!("{file_name}{CHECKSUM_SUFFIX}"));

    info!(url = %url, path = %image_path.display(), "downloading disk image");
    client
        .download_to_file(&url, &image_path, on_progress)
        .with_context(|| format!("failed to download disk image: {url}"))?;

    let sha_url = checksum_url(&url);
    client
        .download_to_file(&sha_url, &checksum_path, |_, _| {})
        .with_context(|| format!("failed to download checksum: {sha_url}"))?;

    Ok(DownloadedDiskImage {
        url,
        image_path,
        checksum_path,
    })
}

pub fn verify_disk_image(image: &DownloadedDiskImage) -> Result<ChecksumCheck> {
    let content = fs::read_to_string(&image.checksum_path).with_context(|| {
        format!(
            "failed to read checksum file: {}",
            image.checksum_path.display()
        )
    })?;
    let expected = parse_checksum_file(&content)
        .with_context(|| format!("invalid checksum file: {}", image.checksum_path.display()))?;
    let (_, actual) = verify_sha256_file(&image.image_path, &expected)?;
    Ok(ChecksumCheck { expected, actual })
}
