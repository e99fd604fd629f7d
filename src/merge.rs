//! Merging of source test plans.
//!
//! Several projects may each contribute a plan for the same change. These
//! are merged into a single plan before generating coverage rules.

use std::collections::BTreeSet;

use nonempty::NonEmpty;

use crate::domain::{Requirements, SourceTestPlan};

/// Merges `other` into `into`, setting every requirement that is set in
/// either.
///
/// Firmware program maps are merged, with `other` winning for programs
/// present in both.
fn merge_requirements(into: &mut Requirements, other: Requirements) {
    let Requirements {
        kernel_versions,
        soc_families,
        arc_versions,
        fingerprint,
        firmware_ro_versions,
        unrecognized,
    } = other;

    into.kernel_versions = into.kernel_versions.take().or(kernel_versions);
    into.soc_families = into.soc_families.take().or(soc_families);
    into.arc_versions = into.arc_versions.take().or(arc_versions);
    into.fingerprint = into.fingerprint.take().or(fingerprint);

    if let Some(other_firmware) = firmware_ro_versions {
        into.firmware_ro_versions
            .get_or_insert_with(Default::default)
            .program_to_milestone
            .extend(other_firmware.program_to_milestone);
    }

    for (kind, value) in unrecognized {
        if !value.is_null() {
            into.unrecognized.insert(kind, value);
        }
    }
}

/// Merges several source test plans into one.
///
/// - enabled test environments are the union of all inputs
/// - path regexps and their excludes are cleared; the plans may come from
///   different projects, so relevance must be decided before merging
/// - test tags are the union of all inputs
/// - test tag excludes are the union of all inputs, minus any tag that is
///   also a test tag
/// - requirements are the union of all inputs
///
/// Lists in the output are deduplicated and sorted.
#[must_use]
pub fn source_test_plans(plans: NonEmpty<SourceTestPlan>) -> SourceTestPlan {
    let mut environments = BTreeSet::new();
    let mut test_tags = BTreeSet::new();
    let mut test_tag_excludes = BTreeSet::new();
    let mut requirements = Requirements::default();

    for plan in plans {
        environments.extend(plan.enabled_test_environments);
        test_tags.extend(plan.test_tags);
        test_tag_excludes.extend(plan.test_tag_excludes);
        merge_requirements(&mut requirements, plan.requirements);
    }

    let test_tag_excludes = test_tag_excludes.difference(&test_tags).cloned().collect();

    SourceTestPlan {
        enabled_test_environments: environments.into_iter().collect(),
        path_regexps: Vec::new(),
        path_regexp_excludes: Vec::new(),
        requirements,
        test_tags: test_tags.into_iter().collect(),
        test_tag_excludes,
    }
}
