use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// Vendor versions carry any number of numeric segments (bundles report
// `7.5.3.2`, the download page `7.5.3`). Missing trailing segments are zero.
#[derive(Debug, Clone)]
pub struct Version {
    segments: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version '{input}': {reason}")]
pub struct VersionError {
    pub input: String,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionOrdering {
    Less,
    Equal,
    Greater,
    Incomparable,
}

impl Version {
    pub fn from_segments(segments: Vec<u64>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let invalid = |reason| VersionError {
            input: input.to_string(),
            reason,
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty version"));
        }

        let mut segments = Vec::new();
        for component in trimmed.split('.') {
            if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("components must be non-negative integers"));
            }
            segments.push(
                component
                    .parse()
                    .map_err(|_| invalid("component out of range"))?,
            );
        }

        Ok(Self { segments })
    }

    fn segment(&self, index: usize) -> u64 {
        self.segments.get(index).copied().unwrap_or(0)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let width = self.segments.len().max(other.segments.len());
        (0..width)
            .map(|index| self.segment(index).cmp(&other.segment(index)))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.segments.len().max(3);
        for index in 0..width {
            if index > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", self.segment(index))?;
        }
        Ok(())
    }
}

pub fn compare(a: &str, b: &str) -> VersionOrdering {
    let (Ok(a), Ok(b)) = (Version::parse(a), Version::parse(b)) else {
        return VersionOrdering::Incomparable;
    };

    match a.cmp(&b) {
        Ordering::Less => VersionOrdering::Less,
        Ordering::Equal => VersionOrdering::Equal,
        Ordering::Greater => VersionOrdering::Greater,
    }
}
