//! Domain models for coverage rule generation.
//!
//! This module contains the documents consumed and produced by the coverage
//! engine: source test plans, build metadata, flat device configurations, DUT
//! attribute schemas and the generated coverage rules.

/// DUT attribute identifiers, criteria and schemas.
pub mod attribute;
pub use attribute::{AttributeId, DutAttribute, DutAttributeList, DutCriterion};

/// Build target metadata.
pub mod build_metadata;
pub use build_metadata::{BuildMetadata, BuildMetadataList, PackageSummary, PortageBuildTarget};

mod config;
pub use config::Config;

/// Coverage rules and the test suites they select.
pub mod coverage_rule;
pub use coverage_rule::{CoverageRule, TagCriteria, TestSuite};

/// Flattened hardware and software configurations.
pub mod flat_config;
pub use flat_config::{FirmwarePayload, FirmwareVersion, FlatConfig, FlatConfigList};

mod fingerprint;
pub use fingerprint::FingerprintLocation;

/// Source test plans and their coverage requirements.
pub mod plan;
pub use plan::{Requirement, Requirements, SourceTestPlan, TestEnvironment};
