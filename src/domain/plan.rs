use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Environments a test plan may run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestEnvironment {
    /// Not specified.
    TestEnvironmentUnspecified,
    /// Physical devices.
    Hardware,
    /// Virtual machines.
    Virtual,
}

/// Cover every kernel version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelVersions {}

/// Cover every SoC family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocFamilies {}

/// Cover every ARC version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcVersions {}

/// Cover devices with a fingerprint sensor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {}

/// Cover the RO firmware of every design of the listed programs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareRoVersions {
    /// Maps program name to the milestone its firmware is qualified on.
    #[serde(default)]
    pub program_to_milestone: BTreeMap<String, i32>,
}

/// The requirements section of a [`SourceTestPlan`].
///
/// Each field is one kind of requirement. A requirement is "set" when its
/// field is present, even if the payload is empty. Fields are visited in
/// declaration order, which determines how rule names are composed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    /// See [`KernelVersions`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel_versions: Option<KernelVersions>,
    /// See [`SocFamilies`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soc_families: Option<SocFamilies>,
    /// See [`ArcVersions`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arc_versions: Option<ArcVersions>,
    /// See [`Fingerprint`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<Fingerprint>,
    /// See [`FirmwareRoVersions`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_ro_versions: Option<FirmwareRoVersions>,
    /// Requirement kinds this crate doesn't know about, keyed by field name.
    ///
    /// These are kept so that generation can refuse them rather than
    /// silently ignoring them.
    #[serde(flatten)]
    pub unrecognized: BTreeMap<String, serde_json::Value>,
}

/// A single set requirement, with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// See [`KernelVersions`].
    KernelVersions,
    /// See [`SocFamilies`].
    SocFamilies,
    /// See [`ArcVersions`].
    ArcVersions,
    /// See [`Fingerprint`].
    Fingerprint,
    /// See [`FirmwareRoVersions`].
    FirmwareRoVersions {
        /// Maps program name to milestone.
        program_to_milestone: BTreeMap<String, i32>,
    },
    /// A requirement kind that is not implemented.
    Unrecognized(String),
}

impl Requirement {
    /// The field name of this kind of requirement.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::KernelVersions => "kernel_versions",
            Self::SocFamilies => "soc_families",
            Self::ArcVersions => "arc_versions",
            Self::Fingerprint => "fingerprint",
            Self::FirmwareRoVersions { .. } => "firmware_ro_versions",
            Self::Unrecognized(kind) => kind,
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.kind())
    }
}

impl Requirements {
    /// The set requirements, in declaration order.
    ///
    /// Unrecognized requirements come last, ordered by field name. Fields
    /// that are explicitly `null` are not set.
    #[must_use]
    pub fn set_requirements(&self) -> Vec<Requirement> {
        let mut set = Vec::new();

        if self.kernel_versions.is_some() {
            set.push(Requirement::KernelVersions);
        }
        if self.soc_families.is_some() {
            set.push(Requirement::SocFamilies);
        }
        if self.arc_versions.is_some() {
            set.push(Requirement::ArcVersions);
        }
        if self.fingerprint.is_some() {
            set.push(Requirement::Fingerprint);
        }
        if let Some(firmware) = &self.firmware_ro_versions {
            set.push(Requirement::FirmwareRoVersions {
                program_to_milestone: firmware.program_to_milestone.clone(),
            });
        }

        set.extend(
            self.unrecognized
                .iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(kind, _)| Requirement::Unrecognized(kind.clone())),
        );

        set
    }
}

/// A declarative plan of what a project needs tested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTestPlan {
    /// Environments the plan applies to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enabled_test_environments: Vec<TestEnvironment>,
    /// Source paths the plan is relevant for.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_regexps: Vec<String>,
    /// Source paths excluded from `path_regexps`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_regexp_excludes: Vec<String>,
    /// The coverage requirements.
    #[serde(default)]
    pub requirements: Requirements,
    /// Tags selecting the tests to run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_tags: Vec<String>,
    /// Tags of tests that must not run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_tag_excludes: Vec<String>,
}
