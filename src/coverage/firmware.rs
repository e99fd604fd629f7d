use std::collections::{BTreeMap, btree_map::Entry};

use crate::{
    coverage::{Error, FlatConfigIndex},
    domain::{AttributeId, CoverageRule, DutCriterion, FirmwareVersion, TestSuite},
};

/// The FAFT suites run against every design's RO firmware.
fn faft_test_suites() -> Vec<TestSuite> {
    vec![
        TestSuite::named("faft_smoke", "suite:faft_smoke"),
        TestSuite::named("faft_bios", "suite:faft_bios"),
    ]
}

fn faft_rule(design: &str, version: FirmwareVersion) -> CoverageRule {
    CoverageRule {
        name: format!("{design}_faft"),
        dut_criteria: vec![
            DutCriterion::new(AttributeId::DESIGN_ID, [design]),
            DutCriterion::new(
                AttributeId::FIRMWARE_RO_MAJOR_VERSION,
                [version.major.to_string()],
            ),
            DutCriterion::new(
                AttributeId::FIRMWARE_RO_MINOR_VERSION,
                [version.minor.to_string()],
            ),
            DutCriterion::new(
                AttributeId::FIRMWARE_RO_PATCH_VERSION,
                [version.patch.to_string()],
            ),
        ],
        test_suites: faft_test_suites(),
    }
}

/// Returns rules requiring firmware tests on every design of every program in
/// `program_to_milestone`, pinned to the design's RO firmware version.
///
/// A config's version is taken from its RO payload, falling back to parsing
/// the firmware image name. Configs with neither are skipped.
///
/// # Errors
///
/// - [`Error::EmptyProgramToMilestone`] if no program is listed
/// - [`Error::ProgramNotFound`] if a program has no configs
/// - [`Error::ConflictingFirmwareVersions`] if two configs of one design
///   resolve to different versions
/// - [`Error::NoFirmwareVersion`] if no config of a program has a version
#[tracing::instrument(level = "debug", skip(flat_configs))]
pub fn firmware_ro_coverage_rules(
    program_to_milestone: &BTreeMap<String, i32>,
    flat_configs: &FlatConfigIndex<'_>,
) -> Result<Vec<CoverageRule>, Error> {
    if program_to_milestone.is_empty() {
        return Err(Error::EmptyProgramToMilestone);
    }

    let mut coverage_rules = Vec::new();

    for program in program_to_milestone.keys() {
        let configs = flat_configs
            .program_configs(program)
            .ok_or_else(|| Error::ProgramNotFound(program.clone()))?;

        let mut design_to_version: BTreeMap<&str, FirmwareVersion> = BTreeMap::new();

        for config in configs {
            let Some(version) = config.main_ro_payload.resolve_version() else {
                tracing::debug!(
                    design = %config.hw_design,
                    config = %config.hw_design_config,
                    "no RO firmware version info found, skipping config"
                );
                continue;
            };

            match design_to_version.entry(&config.hw_design) {
                Entry::Vacant(entry) => {
                    entry.insert(version);
                }
                Entry::Occupied(entry) if *entry.get() != version => {
                    return Err(Error::ConflictingFirmwareVersions {
                        design: config.hw_design.clone(),
                        found: version,
                        stored: *entry.get(),
                    });
                }
                Entry::Occupied(_) => {}
            }
        }

        if design_to_version.is_empty() {
            return Err(Error::NoFirmwareVersion(program.clone()));
        }

        coverage_rules.extend(
            design_to_version
                .into_iter()
                .map(|(design, version)| faft_rule(design, version)),
        );
    }

    Ok(coverage_rules)
}
