use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::PortageBuildTarget;

/// A firmware version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FirmwareVersion {
    /// Major version (the firmware branch).
    #[serde(default)]
    pub major: u32,
    /// Minor version.
    #[serde(default)]
    pub minor: u32,
    /// Patch version.
    #[serde(default)]
    pub patch: u32,
}

impl FirmwareVersion {
    /// Creates a new version.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

static FIRMWARE_IMAGE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://[^.]+\.(\d+)\.(\d+)\.(\d+)\.[A-Za-z0-9]+$")
        .expect("firmware image name pattern is valid")
});

/// Parses a firmware version out of an image name of the form
/// `scheme://name.<major>.<minor>.<patch>.ext`, e.g.
/// `bcs://Octopus.10212.4.0.tbz2`.
///
/// Returns `None` if the name doesn't match, or if a component doesn't fit
/// in a `u32`.
#[must_use]
pub fn parse_firmware_image_name(name: &str) -> Option<FirmwareVersion> {
    let captures = FIRMWARE_IMAGE_NAME.captures(name)?;
    let component = |i: usize| captures.get(i)?.as_str().parse::<u32>().ok();

    Some(FirmwareVersion::new(
        component(1)?,
        component(2)?,
        component(3)?,
    ))
}

/// The main read-only firmware payload of a configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwarePayload {
    /// Explicit version of the payload, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<FirmwareVersion>,
    /// Name of the firmware image, which usually encodes the version.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub firmware_image_name: String,
}

impl FirmwarePayload {
    /// Resolves the version of the payload.
    ///
    /// The explicit version wins; otherwise the version is parsed from the
    /// image name.
    #[must_use]
    pub fn resolve_version(&self) -> Option<FirmwareVersion> {
        if let Some(version) = self.version {
            return Some(version);
        }

        tracing::debug!(
            image = %self.firmware_image_name,
            "no explicit RO firmware version, parsing firmware image name"
        );

        let version = parse_firmware_image_name(&self.firmware_image_name);
        if version.is_none() {
            tracing::debug!(
                "could not parse firmware version info from image name {:?}, skipping",
                self.firmware_image_name
            );
        }
        version
    }
}

/// One (program, design, design config) combination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatConfig {
    /// Program identifier, e.g. `Octopus`.
    pub program: String,
    /// Hardware design identifier.
    pub hw_design: String,
    /// Hardware design config identifier.
    #[serde(default)]
    pub hw_design_config: String,
    /// Build target of the configuration's system image.
    ///
    /// Frequently left empty, in which case the program name stands in for
    /// the overlay.
    #[serde(default)]
    pub build_target: PortageBuildTarget,
    /// The main RO firmware payload.
    #[serde(default)]
    pub main_ro_payload: FirmwarePayload,
}

/// A list of [`FlatConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatConfigList {
    /// The configurations.
    #[serde(default)]
    pub values: Vec<FlatConfig>,
}

impl FromIterator<FlatConfig> for FlatConfigList {
    fn from_iter<T: IntoIterator<Item = FlatConfig>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
