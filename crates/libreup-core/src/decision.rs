use std::fmt;

use crate::app::{InstallChannel, InstalledApp};
use crate::version::{compare, VersionOrdering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeReason {
    Missing,
    LockedChannel,
    Outdated,
    VersionUnknown,
}

impl UpgradeReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::LockedChannel => "locked-channel",
            Self::Outdated => "outdated",
            Self::VersionUnknown => "version-unknown",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Missing => "application is not installed",
            Self::LockedChannel => "application was installed from the app store",
            Self::Outdated => "installed version is older than the latest release",
            Self::VersionUnknown => "installed version could not be determined",
        }
    }
}

impl fmt::Display for UpgradeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeRequirement {
    Skip,
    Required(UpgradeReason),
}

impl UpgradeRequirement {
    pub fn is_required(self) -> bool {
        matches!(self, Self::Required(_))
    }

    pub fn reason(self) -> Option<UpgradeReason> {
        match self {
            Self::Skip => None,
            Self::Required(reason) => Some(reason),
        }
    }
}

// First hit wins: presence, store channel, then version.
pub fn needs_installation(app: &InstalledApp, target_version: &str) -> UpgradeRequirement {
    if !app.present {
        return UpgradeRequirement::Required(UpgradeReason::Missing);
    }

    if app.channel == InstallChannel::LockedStore {
        return UpgradeRequirement::Required(UpgradeReason::LockedChannel);
    }

    let Some(installed) = app.version.as_deref() else {
        return UpgradeRequirement::Required(UpgradeReason::VersionUnknown);
    };

    match compare(installed, target_version) {
        VersionOrdering::Incomparable => {
            UpgradeRequirement::Required(UpgradeReason::VersionUnknown)
        }
        VersionOrdering::Less => UpgradeRequirement::Required(UpgradeReason::Outdated),
        VersionOrdering::Equal | VersionOrdering::Greater => UpgradeRequirement::Skip,
    }
}
