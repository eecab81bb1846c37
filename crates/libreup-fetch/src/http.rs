use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use tracing::debug;

pub const DOWNLOAD_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
pub const PAGE_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const USER_AGENT: &str = concat!("libreup/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(DOWNLOAD_CONNECT_TIMEOUT)
            // Disk images are large; only page fetches get an overall deadline.
            .timeout(None::<Duration>)
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }

    pub fn get_text(&self, url: &str) -> Result<String> {
        debug!(url, "fetching page");
        let response = self
            .client
            .get(url)
            .timeout(PAGE_REQUEST_TIMEOUT)
            .send()
            .with_context(|| format!("request failed: {url}"))?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("unexpected HTTP status for {url}: {status}"));
        }
        response
            .text()
            .with_context(|| format!("failed to read response body: {url}"))
    }

    pub fn download_to_file<F>(&self, url: &str, out_path: &Path, mut on_progress: F) -> Result<u64>
    where
        F: FnMut(u64, Option<u64>),
    {
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create download dir: {}", parent.display()))?;
        }

        let part_path = out_path.with_file_name(format!(
            "{}.part",
            out_path
                .file_name()
                .and_then(|v| v.to_str())
                .unwrap_or("download")
        ));

        let result = self.download_to_part(url, &part_path, &mut on_progress);
        let downloaded = match result {
            Ok(downloaded) => downloaded,
            Err(err) => {
                let _ = fs::remove_file(&part_path);
                return Err(err);
            }
        };

        if out_path.exists() {
            fs::remove_file(out_path)
                .with_context(|| format!("failed to replace {}", out_path.display()))?;
        }
        fs::rename(&part_path, out_path).with_context(|| {
            format!(
                "failed to move download into place: {}",
                out_path.display()
            )
        })?;

        Ok(downloaded)
    }

    fn download_to_part(
        &self,
        url: &str,
        part_path: &Path,
        on_progress: &mut dyn FnMut(u64, Option<u64>),
    ) -> Result<u64> {
        debug!(url, path = %part_path.display(), "downloading");
        let mut response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("request failed: {url}"))?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("failed to download {url}: HTTP {status}"));
        }

        let total = response.content_length();
        let file = File::create(part_path)
            .with_context(|| format!("failed to create {}", part_path.display()))?;
        let mut writer = BufWriter::new(file);
        let mut buffer = [0_u8; 64 * 1024];
        let mut downloaded = 0_u64;
        on_progress(downloaded, total);

        loop {
            let read = response
                .read(&mut buffer)
                .with_context(|| format!("failed reading response body: {url}"))?;
            if read == 0 {
                break;
            }
            writer
                .write_all(&buffer[..read])
                .with_context(|| format!("failed writing {}", part_path.display()))?;
            downloaded += read as u64;
            on_progress(downloaded, total);
        }

        writer
            .flush()
            .with_context(|| format!("failed flushing {}", part_path.display()))?;

        if let Some(expected) = total {
            if downloaded != expected {
                return Err(anyhow!(
                    "truncated download from {url}: got {downloaded} of {expected} bytes"
                ));
            }
        }

        Ok(downloaded)
    }
}
