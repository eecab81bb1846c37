mod disk_image;
mod http;
mod version_page;

pub use disk_image::{download_disk_image, verify_disk_image, ChecksumCheck, DownloadedDiskImage};
pub use http::{HttpClient, DOWNLOAD_CONNECT_TIMEOUT, PAGE_REQUEST_TIMEOUT};
pub use version_page::{downloadable_versions, latest_version, select_stable_version};
