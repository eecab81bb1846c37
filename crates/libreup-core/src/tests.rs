use std::path::{Path, PathBuf};

use super::*;

fn direct_app(version: Option<&str>) -> InstalledApp {
    InstalledApp::installed(
        "/Applications/LibreOffice.app",
        version.map(str::to_string),
        InstallChannel::Direct,
    )
}

#[test]
fn compare_orders_plain_versions() {
    assert_eq!(compare("1.1.1", "1.1.2"), VersionOrdering::Less);
    assert_eq!(compare("2.1.1", "1.1.1"), VersionOrdering::Greater);
    assert_eq!(compare("1.1.1", "1.1.1"), VersionOrdering::Equal);
    assert_eq!(compare("7.10.0", "7.9.9"), VersionOrdering::Greater);
}

#[test]
fn compare_treats_missing_components_as_zero() {
    assert_eq!(compare("7.5", "7.5.0"), VersionOrdering::Equal);
    assert_eq!(compare("7", "7.0.1"), VersionOrdering::Less);
    assert_eq!(compare(" 7.5.3\n", "7.5.3"), VersionOrdering::Equal);
}

#[test]
fn compare_accepts_bundle_style_four_component_versions() {
    assert_eq!(compare("7.5.3.2", "7.5.3"), VersionOrdering::Greater);
    assert_eq!(compare("7.5.3.0", "7.5.3"), VersionOrdering::Equal);
    assert_eq!(compare("7.5.2.9", "7.5.3"), VersionOrdering::Less);
    assert_eq!(compare("7.5.3", "7.5.3.2"), VersionOrdering::Less);
}

#[test]
fn compare_is_incomparable_when_either_side_is_malformed() {
    for malformed in ["", "invalid", "7..1", "7.5.x", "-1.0.0", "7.5.3-beta", "."] {
        assert_eq!(
            compare(malformed, "7.5.3"),
            VersionOrdering::Incomparable,
            "left side {malformed:?}"
        );
        assert_eq!(
            compare("7.5.3", malformed),
            VersionOrdering::Incomparable,
            "right side {malformed:?}"
        );
    }
}

#[test]
fn version_parse_reports_input_in_error() {
    let err = Version::parse("seven").expect_err("must reject non-numeric version");
    assert!(err.to_string().contains("'seven'"), "unexpected error: {err}");
}

#[test]
fn version_display_is_normalized() {
    let version: Version = "7.5".parse().expect("must parse");
    assert_eq!(version, Version::from_segments(vec![7, 5, 0]));
    assert_eq!(version.to_string(), "7.5.0");

    let bundle: Version = "7.5.3.2".parse().expect("must parse");
    assert_eq!(bundle.segments(), &[7, 5, 3, 2]);
    assert_eq!(bundle.to_string(), "7.5.3.2");
}

#[test]
fn needs_installation_when_missing_regardless_of_target() {
    let app = InstalledApp::missing("/Applications/LibreOffice.app");
    for target in ["7.5.3", "0.0.1", "garbage", ""] {
        assert_eq!(
            needs_installation(&app, target),
            UpgradeRequirement::Required(UpgradeReason::Missing)
        );
    }
}

#[test]
fn needs_installation_for_locked_channel_even_when_current() {
    let app = InstalledApp::installed(
        "/Applications/LibreOffice.app",
        Some("9.9.9".to_string()),
        InstallChannel::LockedStore,
    );
    assert_eq!(
        needs_installation(&app, "7.5.3"),
        UpgradeRequirement::Required(UpgradeReason::LockedChannel)
    );
}

#[test]
fn needs_installation_when_outdated() {
    let requirement = needs_installation(&direct_app(Some("7.4.7")), "7.5.3");
    assert_eq!(requirement, UpgradeRequirement::Required(UpgradeReason::Outdated));
    assert!(requirement.is_required());
    assert_eq!(requirement.reason(), Some(UpgradeReason::Outdated));
}

#[test]
fn needs_installation_skips_current_or_newer() {
    for installed in ["7.5.3", "7.5.4", "7.6", "8.0.0"] {
        let requirement = needs_installation(&direct_app(Some(installed)), "7.5.3");
        assert_eq!(requirement, UpgradeRequirement::Skip, "installed {installed}");
        assert!(!requirement.is_required());
        assert_eq!(requirement.reason(), None);
    }
}

#[test]
fn needs_installation_skips_four_component_bundle_version_at_target() {
    assert_eq!(
        needs_installation(&direct_app(Some("7.5.3.2")), "7.5.3"),
        UpgradeRequirement::Skip
    );
    assert_eq!(
        needs_installation(&direct_app(Some("7.5.2.2")), "7.5.3"),
        UpgradeRequirement::Required(UpgradeReason::Outdated)
    );
}

#[test]
fn needs_installation_fails_closed_on_malformed_versions() {
    for (installed, target) in [
        (Some("garbage"), "7.5.3"),
        (Some("7.5.3"), "garbage"),
        (Some(""), "7.5.3"),
        (None, "7.5.3"),
        (Some("8.0.0"), "7.5.x"),
    ] {
        assert_eq!(
            needs_installation(&direct_app(installed), target),
            UpgradeRequirement::Required(UpgradeReason::VersionUnknown),
            "installed {installed:?} target {target:?}"
        );
    }
}

#[test]
fn disk_image_url_for_supported_architectures() {
    assert_eq!(
        disk_image_url("7.4.6", "amd64").expect("amd64 must be supported"),
        "https://download.documentfoundation.org/libreoffice/stable/7.4.6/mac/x86_64/LibreOffice_7.4.6_MacOS_x86-64.dmg"
    );
    assert_eq!(
        disk_image_url("7.4.6", "arm64").expect("arm64 must be supported"),
        "https://download.documentfoundation.org/libreoffice/stable/7.4.6/mac/aarch64/LibreOffice_7.4.6_MacOS_aarch64.dmg"
    );
    assert_eq!(
        disk_image_url("7.5.2", "x86_64").expect("x86_64 alias must be supported"),
        "https://download.documentfoundation.org/libreoffice/stable/7.5.2/mac/x86_64/LibreOffice_7.5.2_MacOS_x86-64.dmg"
    );
}

#[test]
fn disk_image_url_rejects_unknown_architecture() {
    for arch in ["", "i386", "ppc"] {
        let err = disk_image_url("7.4.6", arch).expect_err("unknown arch must fail");
        assert!(
            err.to_string().contains("unsupported architecture"),
            "unexpected error: {err}"
        );
    }
}

#[test]
fn disk_image_url_with_custom_base_trims_trailing_slash() {
    let url = disk_image_url_with_base("http://mirror.test/lo/", "7.5.3", Arch::Aarch64)
        .expect("must build url");
    assert_eq!(
        url,
        "http://mirror.test/lo/7.5.3/mac/aarch64/LibreOffice_7.5.3_MacOS_aarch64.dmg"
    );
    assert_eq!(checksum_url(&url), format!("{url}.sha256"));
}

#[test]
fn bundle_path_joins_volume_root_and_install_root() {
    assert_eq!(
        bundle_path(Path::new("/Volumes/Target"), "Applications", "LibreOffice"),
        PathBuf::from("/Volumes/Target/Applications/LibreOffice.app")
    );
}

#[test]
fn config_defaults_when_file_is_empty() {
    let config = InstallerConfig::parse("").expect("empty config must parse");
    assert_eq!(config, InstallerConfig::default());
    assert_eq!(config.process_name, "soffice");
    assert_eq!(config.quit_grace().as_secs(), DEFAULT_QUIT_GRACE_SECS);
}

#[test]
fn config_overrides_selected_fields() {
    let config = InstallerConfig::parse(
        "version_url = \"http://127.0.0.1:8080/download\"\ndownload_dir = \"/var/tmp/libreup\"\nquit_grace_secs = 3\n",
    )
    .expect("must parse overrides");
    assert_eq!(config.version_url, "http://127.0.0.1:8080/download");
    assert_eq!(config.download_dir(), PathBuf::from("/var/tmp/libreup"));
    assert_eq!(config.quit_grace_secs, 3);
    assert_eq!(config.app_name, DEFAULT_APP_NAME);
}

#[test]
fn config_bounds_quit_grace_period() {
    let config = InstallerConfig::parse(&format!("quit_grace_secs = {MAX_QUIT_GRACE_SECS}\n"))
        .expect("maximum grace period must parse");
    assert_eq!(config.quit_grace().as_secs(), MAX_QUIT_GRACE_SECS);

    let err = InstallerConfig::parse("quit_grace_secs = 86400\n")
        .expect_err("oversized grace period must fail");
    assert!(
        err.to_string().contains("quit_grace_secs must be at most"),
        "unexpected error: {err}"
    );
}

#[test]
fn config_rejects_unknown_fields_and_empty_values() {
    assert!(InstallerConfig::parse("mirror = \"x\"\n").is_err());

    let err = InstallerConfig::parse("app_name = \"  \"\n").expect_err("blank app name must fail");
    assert!(
        err.to_string().contains("app_name must not be empty"),
        "unexpected error: {err}"
    );

    let err = InstallerConfig::parse("install_root = \"/Applications\"\n")
        .expect_err("absolute install root must fail");
    assert!(err.to_string().contains("install_root must be relative"));
}

#[test]
fn install_error_messages_name_their_subject() {
    let err = InstallError::QuitFailure {
        process: "soffice".to_string(),
        detail: "2 processes still running".to_string(),
    };
    assert_eq!(err.kind(), "quit-failure");
    assert_eq!(
        err.to_string(),
        "could not quit soffice: 2 processes still running"
    );

    let err = InstallError::ChecksumMismatch {
        path: PathBuf::from("/tmp/lo.dmg"),
        expected: "aa".to_string(),
        actual: "bb".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "checksum mismatch for /tmp/lo.dmg: expected aa, got bb"
    );
}

#[test]
fn chain_message_flattens_context() {
    let err = anyhow::anyhow!("connection refused").context("failed to fetch download page");
    assert_eq!(
        chain_message(&err),
        "failed to fetch download page: connection refused"
    );
}
