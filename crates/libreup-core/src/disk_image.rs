use anyhow::{anyhow, Result};

pub const DEFAULT_DOWNLOAD_BASE_URL: &str =
    "https://download.documentfoundation.org/libreoffice/stable";

pub const CHECKSUM_SUFFIX: &str = ".sha256";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Aarch64,
    X86_64,
}

impl Arch {
    pub fn parse(input: &str) -> Result<Self> {
        match input.trim() {
            "arm64" | "aarch64" => Ok(Self::Aarch64),
            "amd64" | "x86_64" => Ok(Self::X86_64),
            other => Err(anyhow!("unsupported architecture: '{other}'")),
        }
    }

    pub fn host() -> Result<Self> {
        Self::parse(std::env::consts::ARCH)
    }

    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Aarch64 => "aarch64",
            Self::X86_64 => "x86_64",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Aarch64 => "aarch64",
            Self::X86_64 => "x86-64",
        }
    }
}

pub fn disk_image_file_name(version: &str, arch: Arch) -> String {
    format!("LibreOffice_{version}_MacOS_{}.dmg", arch.file_name())
}

pub fn disk_image_url(version: &str, arch: &str) -> Result<String> {
    disk_image_url_with_base(DEFAULT_DOWNLOAD_BASE_URL, version, Arch::parse(arch)?)
}

pub fn disk_image_url_with_base(base_url: &str, version: &str, arch: Arch) -> Result<String> {
    if version.trim().is_empty() {
        return Err(anyhow!("disk image version must not be empty"));
    }
    Ok(format!(
        "{}/{version}/mac/{}/{}",
        base_url.trim_end_matches('/'),
        arch.dir_name(),
        disk_image_file_name(version, arch)
    ))
}

pub fn checksum_url(disk_image_url: &str) -> String {
    format!("{disk_image_url}{CHECKSUM_SUFFIX}")
}
