//! Coverage rule generation for hardware test plans
//!
//! A source test plan lists coverage requirements ("every kernel version",
//! "every SoC family", ...). Combined with inventories of build targets and
//! device configurations, these are turned into [`CoverageRule`]s, each
//! pairing a device-under-test selection with the test suites to run on it.

pub mod domain;
pub use domain::{
    AttributeId, BuildMetadata, Config, CoverageRule, DutAttributeList, DutCriterion, FlatConfig,
    Requirement, SourceTestPlan,
};

/// Coverage rule generation engine.
pub mod coverage;
pub use coverage::{Error, ErrorKind, generate, write_text_summary};

/// Merging of multiple source test plans.
pub mod merge;

/// Loading and saving of the structured input and output documents.
pub mod storage;
