use serde::{Deserialize, Serialize};

/// Kernel version reported by builds whose kernel could not be determined.
pub const UNKNOWN_KERNEL_VERSION: &str = "0.0";

/// A Portage build target: an overlay and an optional profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortageBuildTarget {
    /// Name of the Portage overlay, e.g. `octopus`.
    #[serde(default)]
    pub overlay_name: String,
    /// Name of the Portage profile, empty for the base profile.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub profile_name: String,
}

impl PortageBuildTarget {
    /// Creates a build target for `overlay_name` with the base profile.
    #[must_use]
    pub fn new(overlay_name: impl Into<String>) -> Self {
        Self {
            overlay_name: overlay_name.into(),
            profile_name: String::new(),
        }
    }
}

/// Summary of packages installed in a build.
///
/// Every field is empty when the package is absent from the build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSummary {
    /// Kernel version, e.g. `4.14`.
    #[serde(default)]
    pub kernel_version: String,
    /// Chipset overlay, identifying the SoC family.
    #[serde(default)]
    pub chipset_overlay: String,
    /// ARC (Android runtime) version, e.g. `R`.
    #[serde(default)]
    pub arc_version: String,
}

/// Metadata describing a single build target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMetadata {
    /// The build target this metadata was produced for.
    pub build_target: PortageBuildTarget,
    /// Packages installed in the build.
    #[serde(default)]
    pub package_summary: PackageSummary,
}

impl BuildMetadata {
    /// The overlay name of the build target.
    #[must_use]
    pub fn overlay_name(&self) -> &str {
        &self.build_target.overlay_name
    }

    /// The kernel version, or `None` if it is absent or unknown.
    #[must_use]
    pub fn kernel_version(&self) -> Option<&str> {
        match self.package_summary.kernel_version.as_str() {
            "" => None,
            UNKNOWN_KERNEL_VERSION => {
                tracing::debug!(
                    overlay = self.overlay_name(),
                    "BuildMetadata with kernel version \"{UNKNOWN_KERNEL_VERSION}\", skipping"
                );
                None
            }
            version => Some(version),
        }
    }

    /// The chipset overlay, or `None` if absent.
    #[must_use]
    pub fn chipset_overlay(&self) -> Option<&str> {
        Some(self.package_summary.chipset_overlay.as_str()).filter(|s| !s.is_empty())
    }

    /// The ARC version, or `None` if absent.
    #[must_use]
    pub fn arc_version(&self) -> Option<&str> {
        Some(self.package_summary.arc_version.as_str()).filter(|s| !s.is_empty())
    }
}

/// A list of [`BuildMetadata`], one per build target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMetadataList {
    /// The build metadata entries.
    #[serde(default)]
    pub values: Vec<BuildMetadata>,
}

impl FromIterator<BuildMetadata> for BuildMetadataList {
    fn from_iter<T: IntoIterator<Item = BuildMetadata>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
