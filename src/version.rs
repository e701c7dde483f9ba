//! Model versioning utilities

use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Version of a domain model. Descriptors are derived once per version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModelVersion {
    /// Semantic version (e.g., "1.2.3")
    pub version: Version,
}

impl ModelVersion {
    pub fn new(version: Version) -> Self {
        Self { version }
    }

    /// Create from a version string, accepting a leading `v`
    pub fn parse(version_str: &str) -> Result<Self, semver::Error> {
        let version_str = version_str.strip_prefix('v').unwrap_or(version_str);
        let version = Version::parse(version_str)?;
        Ok(Self::new(version))
    }

    /// Get the version string (e.g., "1.2.3")
    pub fn version_string(&self) -> String {
        self.version.to_string()
    }

    /// Get the tag string (e.g., "v1.2.3")
    pub fn tag_string(&self) -> String {
        format!("v{}", self.version)
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        let v = ModelVersion::parse("1.2.3").unwrap();
        assert_eq!(v.version_string(), "1.2.3");
        assert_eq!(v.tag_string(), "v1.2.3");

        let v = ModelVersion::parse("v2.0.0").unwrap();
        assert_eq!(v.version_string(), "2.0.0");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(ModelVersion::parse("not-a-version").is_err());
    }
}
