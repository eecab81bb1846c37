use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use sha2::{Digest, Sha256};

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

pub fn sha256_reader_hex<R: Read>(mut reader: R) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0_u8; 64 * 1024];
    loop {
        let read = reader
            .read(&mut buffer)
            .context("failed to read input while hashing")?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn sha256_file_hex(path: &Path) -> Result<String> {
    let file = File::open(path)
        .with_context(|| format!("failed to open {} for hashing", path.display()))?;
    sha256_reader_hex(BufReader::new(file))
        .with_context(|| format!("failed to calculate checksum of {}", path.display()))
}

pub fn verify_sha256_file(path: &Path, expected_hex: &str) -> Result<(bool, String)> {
    let actual = sha256_file_hex(path)?;
    let matches = actual.eq_ignore_ascii_case(expected_hex.trim());
    Ok((matches, actual))
}

pub fn parse_checksum_file(content: &str) -> Result<String> {
    let digest = content
        .split_whitespace()
        .next()
        .ok_or_else(|| anyhow!("checksum file is empty"))?;

    if digest.len() != 64 || !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(anyhow!(
            "checksum file does not start with a SHA-256 digest: '{digest}'"
        ));
    }

    Ok(digest.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    fn fixture_path(name: &str) -> std::path::PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time")
            .as_nanos();
        std::env::temp_dir().join(format!("libreup-security-{name}-{nanos}"))
    }

    #[test]
    fn sha256_hex_matches_known_digests() {
        assert_eq!(sha256_hex(b""), EMPTY_SHA256);
        assert_eq!(sha256_hex(b"abc"), ABC_SHA256);
    }

    #[test]
    fn verify_sha256_file_reports_actual_digest() {
        let path = fixture_path("verify");
        std::fs::write(&path, b"abc").expect("must write fixture");

        let (matches, actual) = verify_sha256_file(&path, ABC_SHA256).expect("must hash");
        assert!(matches);
        assert_eq!(actual, ABC_SHA256);

        let upper = format!("{}\n", ABC_SHA256.to_ascii_uppercase());
        let (matches, _) = verify_sha256_file(&path, &upper).expect("must hash");
        assert!(matches, "digest comparison ignores case and whitespace");

        let (matches, actual) = verify_sha256_file(&path, EMPTY_SHA256).expect("must hash");
        assert!(!matches);
        assert_eq!(actual, ABC_SHA256);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn sha256_file_hex_errors_for_missing_file() {
        let err = sha256_file_hex(&fixture_path("missing")).expect_err("missing file must fail");
        assert!(err.to_string().contains("failed to open"), "unexpected error: {err}");
    }

    #[test]
    fn parse_checksum_file_takes_first_token() {
        let content = format!(
            "{}  LibreOffice_7.5.3_MacOS_aarch64.dmg\n",
            ABC_SHA256.to_ascii_uppercase()
        );
        assert_eq!(parse_checksum_file(&content).expect("must parse"), ABC_SHA256);
        assert_eq!(parse_checksum_file(ABC_SHA256).expect("bare digest"), ABC_SHA256);
    }

    #[test]
    fn parse_checksum_file_rejects_empty_or_malformed() {
        assert!(parse_checksum_file("").is_err());
        assert!(parse_checksum_file("  \n").is_err());
        let err = parse_checksum_file("<html>not found</html>").expect_err("html must fail");
        assert!(err.to_string().contains("does not start with a SHA-256 digest"));
    }
}
