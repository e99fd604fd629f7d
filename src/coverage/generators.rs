use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{
    AttributeId, BuildMetadata, CoverageRule, DutCriterion, FingerprintLocation, SourceTestPlan,
    TestSuite,
};

/// The test suite attached to every rule generated from build metadata: the
/// plan's own tag criteria.
fn plan_test_suites(plan: &SourceTestPlan) -> Vec<TestSuite> {
    vec![TestSuite::from_tags(
        plan.test_tags.clone(),
        plan.test_tag_excludes.clone(),
    )]
}

/// Groups build targets and returns one rule per group.
///
/// `key_fn` maps each build metadata entry to a group key; entries for which
/// it returns `None` are skipped. Each group becomes a rule named
/// `name_fn(key)`, selecting the overlays of all build targets in the group.
///
/// Rules are returned ordered by key.
fn build_target_coverage_rules<K, N>(
    key_fn: K,
    name_fn: N,
    build_metadata_list: &[BuildMetadata],
    plan: &SourceTestPlan,
) -> Vec<CoverageRule>
where
    K: Fn(&BuildMetadata) -> Option<&str>,
    N: Fn(&str) -> String,
{
    let mut key_to_build_targets: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();

    for metadata in build_metadata_list {
        let Some(key) = key_fn(metadata) else {
            continue;
        };

        key_to_build_targets
            .entry(key)
            .or_default()
            .insert(metadata.overlay_name().to_string());
    }

    key_to_build_targets
        .into_iter()
        .map(|(key, build_targets)| CoverageRule {
            name: name_fn(key),
            dut_criteria: vec![DutCriterion {
                attribute_id: AttributeId::new(AttributeId::SYSTEM_BUILD_TARGET),
                values: build_targets,
            }],
            test_suites: plan_test_suites(plan),
        })
        .collect()
}

/// Returns one rule per kernel version, named `kernel:<version>`.
///
/// Build targets with an unknown kernel version ("0.0") are skipped.
#[must_use]
pub fn kernel_coverage_rules(
    plan: &SourceTestPlan,
    build_metadata_list: &[BuildMetadata],
) -> Vec<CoverageRule> {
    build_target_coverage_rules(
        BuildMetadata::kernel_version,
        |version| format!("kernel:{version}"),
        build_metadata_list,
        plan,
    )
}

/// Returns one rule per SoC family, named `soc:<chipset overlay>`.
#[must_use]
pub fn soc_coverage_rules(
    plan: &SourceTestPlan,
    build_metadata_list: &[BuildMetadata],
) -> Vec<CoverageRule> {
    build_target_coverage_rules(
        BuildMetadata::chipset_overlay,
        |chipset| format!("soc:{chipset}"),
        build_metadata_list,
        plan,
    )
}

/// Returns one rule per ARC version, named `arc:<version>`.
#[must_use]
pub fn arc_coverage_rules(
    plan: &SourceTestPlan,
    build_metadata_list: &[BuildMetadata],
) -> Vec<CoverageRule> {
    build_target_coverage_rules(
        BuildMetadata::arc_version,
        |version| format!("arc:{version}"),
        build_metadata_list,
        plan,
    )
}

/// Returns a rule requiring a fingerprint sensor.
#[must_use]
pub fn fingerprint_coverage_rule(plan: &SourceTestPlan) -> CoverageRule {
    CoverageRule {
        name: "fp:present".to_string(),
        dut_criteria: vec![DutCriterion::new(
            AttributeId::FINGERPRINT_LOCATION,
            FingerprintLocation::present().map(FingerprintLocation::as_str),
        )],
        test_suites: plan_test_suites(plan),
    }
}
