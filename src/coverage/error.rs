use thiserror::Error;

use crate::domain::FirmwareVersion;

/// Broad classes of generation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The inputs are malformed or incomplete.
    InvalidInput,
    /// Something the inputs refer to doesn't exist.
    NotFound,
    /// The inputs contradict each other.
    Conflict,
    /// A rule references an attribute missing from the schema.
    SchemaViolation,
    /// A requirement kind is not supported.
    Unimplemented,
}

/// Errors that abort coverage rule generation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The source test plan sets no requirement.
    #[error("at least one requirement must be set in SourceTestPlan")]
    NoRequirements,

    /// Firmware RO versions were requested without any program.
    #[error("programToMilestone must be set in SourceTestPlan")]
    EmptyProgramToMilestone,

    /// A build metadata entry has no overlay to join on.
    #[error("no overlay found in BuildMetadata")]
    MissingOverlay,

    /// A flat config has neither an overlay nor a program to join on.
    #[error("no overlay or program found in FlatConfig for design {design:?}")]
    MissingJoinKey {
        /// Design of the offending config.
        design: String,
    },

    /// No flat config exists for a program.
    #[error("configs for program {0:?} not found")]
    ProgramNotFound(String),

    /// None of a program's configs carries a usable RO firmware version.
    #[error("no RO firmware version info found for program {0:?}")]
    NoFirmwareVersion(String),

    /// Two configs of the same design disagree on the RO firmware version.
    #[error("conflicting firmware RO versions found for design {design:?}: {found}, {stored}")]
    ConflictingFirmwareVersions {
        /// The design both configs belong to.
        design: String,
        /// The version seen most recently.
        found: FirmwareVersion,
        /// The version seen first.
        stored: FirmwareVersion,
    },

    /// Two build metadata entries share an overlay and profile.
    #[error("multiple BuildMetadatas for key (overlay {overlay:?}, profile {profile:?})")]
    DuplicateBuildMetadata {
        /// Lowercased overlay.
        overlay: String,
        /// Lowercased profile.
        profile: String,
    },

    /// Two generated rules share a name.
    #[error("multiple CoverageRules named {0:?}")]
    DuplicateRuleName(String),

    /// Rules reference attributes absent from the schema.
    #[error("CoverageRule contains invalid DutAttributes: {0:?}")]
    InvalidDutAttributes(Vec<String>),

    /// A requirement kind has no generator.
    #[error("unimplemented requirement {0:?}")]
    Unimplemented(String),
}

impl Error {
    /// The class of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoRequirements
            | Self::EmptyProgramToMilestone
            | Self::MissingOverlay
            | Self::MissingJoinKey { .. } => ErrorKind::InvalidInput,
            Self::ProgramNotFound(_) | Self::NoFirmwareVersion(_) => ErrorKind::NotFound,
            Self::ConflictingFirmwareVersions { .. }
            | Self::DuplicateBuildMetadata { .. }
            | Self::DuplicateRuleName(_) => ErrorKind::Conflict,
            Self::InvalidDutAttributes(_) => ErrorKind::SchemaViolation,
            Self::Unimplemented(_) => ErrorKind::Unimplemented,
        }
    }
}
