//! Conversion of source test plans into coverage rules.
//!
//! Each set requirement of a plan produces an independent list of rules,
//! which are folded together with [`expand_coverage_rules`] so that the
//! result covers every combination of requirements that some device can
//! satisfy.

mod error;
pub use error::{Error, ErrorKind};

mod expand;
pub use expand::expand_coverage_rules;

mod firmware;
pub use firmware::firmware_ro_coverage_rules;

/// Joining of flat configs with build metadata.
pub mod flat_config_index;
pub use flat_config_index::{FlatConfigIndex, JoinKey, JoinedConfig};

mod generate;
pub use generate::generate;

mod generators;
pub use generators::{
    arc_coverage_rules, fingerprint_coverage_rule, kernel_coverage_rules, soc_coverage_rules,
};

mod summary;
pub use summary::{TextSummary, write_text_summary};

mod validate;
pub use validate::check_dut_attributes_valid;
