use crate::{
    coverage::{
        Error, FlatConfigIndex, arc_coverage_rules, check_dut_attributes_valid,
        expand_coverage_rules, fingerprint_coverage_rule, firmware_ro_coverage_rules,
        kernel_coverage_rules, soc_coverage_rules,
    },
    domain::{
        BuildMetadataList, CoverageRule, DutAttributeList, FlatConfigList, Requirement,
        SourceTestPlan,
    },
};

/// Generates the rules of a single requirement.
fn requirement_coverage_rules(
    requirement: &Requirement,
    plan: &SourceTestPlan,
    build_metadata_list: &BuildMetadataList,
    flat_configs: &FlatConfigIndex<'_>,
) -> Result<Vec<CoverageRule>, Error> {
    let build_metadata = build_metadata_list.values.as_slice();

    Ok(match requirement {
        Requirement::KernelVersions => kernel_coverage_rules(plan, build_metadata),
        Requirement::SocFamilies => soc_coverage_rules(plan, build_metadata),
        Requirement::ArcVersions => arc_coverage_rules(plan, build_metadata),
        Requirement::Fingerprint => vec![fingerprint_coverage_rule(plan)],
        Requirement::FirmwareRoVersions {
            program_to_milestone,
        } => firmware_ro_coverage_rules(program_to_milestone, flat_configs)?,
        Requirement::Unrecognized(kind) => return Err(Error::Unimplemented(kind.clone())),
    })
}

/// Computes the coverage rules of `plan`.
///
/// Every set requirement produces its own rules, which are joined onto the
/// rules of the requirements before it (see [`expand_coverage_rules`]). The
/// result is validated against `dut_attribute_list` and sorted by name.
///
/// # Errors
///
/// Fails without returning any rules if:
///
/// - the plan sets no requirement
/// - a requirement kind is not implemented
/// - generating the rules of a requirement fails
/// - a rule references an attribute missing from `dut_attribute_list`
/// - two rules end up with the same name
#[tracing::instrument(level = "debug", skip_all)]
pub fn generate(
    plan: &SourceTestPlan,
    build_metadata_list: &BuildMetadataList,
    dut_attribute_list: &DutAttributeList,
    flat_config_list: &FlatConfigList,
) -> Result<Vec<CoverageRule>, Error> {
    let flat_configs = FlatConfigIndex::new(flat_config_list);

    let requirements = plan.requirements.set_requirements();
    if requirements.is_empty() {
        return Err(Error::NoRequirements);
    }

    let mut coverage_rules = Vec::new();

    for requirement in &requirements {
        let new_rules =
            requirement_coverage_rules(requirement, plan, build_metadata_list, &flat_configs)?;
        coverage_rules = expand_coverage_rules(coverage_rules, new_rules);

        tracing::info!(
            "added CoverageRules for {requirement}, now have {} CoverageRules",
            coverage_rules.len()
        );
    }

    check_dut_attributes_valid(&coverage_rules, dut_attribute_list)?;

    coverage_rules.sort_by(|a, b| a.name.cmp(&b.name));

    if let Some(pair) = coverage_rules.windows(2).find(|pair| pair[0].name == pair[1].name) {
        return Err(Error::DuplicateRuleName(pair[0].name.clone()));
    }

    Ok(coverage_rules)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{
        coverage::ErrorKind,
        domain::{
            AttributeId, BuildMetadata, DutCriterion, FirmwarePayload, FirmwareVersion, FlatConfig,
            PackageSummary, PortageBuildTarget, Requirements, TestSuite,
            plan::{ArcVersions, Fingerprint, FirmwareRoVersions, KernelVersions, SocFamilies},
        },
    };

    fn build_metadata(overlay: &str, kernel: &str, chipset: &str, arc: &str) -> BuildMetadata {
        BuildMetadata {
            build_target: PortageBuildTarget::new(overlay),
            package_summary: PackageSummary {
                kernel_version: kernel.to_string(),
                chipset_overlay: chipset.to_string(),
                arc_version: arc.to_string(),
            },
        }
    }

    fn flat_config(
        program: &str,
        design: &str,
        design_config: &str,
        version: Option<FirmwareVersion>,
        image_name: &str,
    ) -> FlatConfig {
        FlatConfig {
            program: program.to_string(),
            hw_design: design.to_string(),
            hw_design_config: design_config.to_string(),
            main_ro_payload: FirmwarePayload {
                version,
                firmware_image_name: image_name.to_string(),
            },
            ..FlatConfig::default()
        }
    }

    fn build_metadata_list() -> BuildMetadataList {
        [
            build_metadata("project1", "4.14", "chipsetA", ""),
            build_metadata("project2", "4.14", "chipsetB", ""),
            build_metadata("project3", "5.4", "chipsetA", ""),
            build_metadata("project4", "3.18", "chipsetC", "R"),
            build_metadata("project5", "4.14", "chipsetA", ""),
            build_metadata("project6", "4.14", "chipsetB", "P"),
            build_metadata("missingkernelversionproject", "0.0", "", ""),
        ]
        .into_iter()
        .collect()
    }

    fn dut_attribute_list() -> DutAttributeList {
        DutAttributeList::from_ids([
            AttributeId::FINGERPRINT_LOCATION,
            AttributeId::SYSTEM_BUILD_TARGET,
            AttributeId::DESIGN_ID,
            AttributeId::FIRMWARE_RO_MAJOR_VERSION,
            AttributeId::FIRMWARE_RO_MINOR_VERSION,
            AttributeId::FIRMWARE_RO_PATCH_VERSION,
        ])
    }

    fn flat_config_list() -> FlatConfigList {
        [
            flat_config("ProgA", "Design1", "Config1", Some(FirmwareVersion::new(123, 4, 5)), ""),
            flat_config("ProgA", "Design1", "Config2", None, "bcs://ProgA.123.4.5.tbz2"),
            flat_config("ProgA", "Design1", "Config3", Some(FirmwareVersion::new(123, 4, 5)), ""),
            flat_config("ProgA", "Design2", "Config1", Some(FirmwareVersion::new(123, 0, 0)), ""),
            flat_config("ProgB", "Design20", "Config1", Some(FirmwareVersion::new(123, 4, 0)), ""),
        ]
        .into_iter()
        .collect()
    }

    fn plan(requirements: Requirements, tags: &[&str], excludes: &[&str]) -> SourceTestPlan {
        SourceTestPlan {
            requirements,
            test_tags: tags.iter().map(ToString::to_string).collect(),
            test_tag_excludes: excludes.iter().map(ToString::to_string).collect(),
            ..SourceTestPlan::default()
        }
    }

    fn run(plan: &SourceTestPlan) -> Result<Vec<CoverageRule>, Error> {
        generate(
            plan,
            &build_metadata_list(),
            &dut_attribute_list(),
            &flat_config_list(),
        )
    }

    fn build_target_rule(name: &str, targets: &[&str], suite: &TestSuite) -> CoverageRule {
        CoverageRule {
            name: name.to_string(),
            dut_criteria: vec![DutCriterion::new(
                AttributeId::SYSTEM_BUILD_TARGET,
                targets.iter().copied(),
            )],
            test_suites: vec![suite.clone()],
        }
    }

    #[test]
    fn kernel_versions() {
        let plan = plan(
            Requirements {
                kernel_versions: Some(KernelVersions {}),
                ..Requirements::default()
            },
            &["kernel"],
            &["flaky"],
        );
        let suite = TestSuite::from_tags(vec!["kernel".to_string()], vec!["flaky".to_string()]);

        assert_eq!(
            run(&plan).unwrap(),
            vec![
                build_target_rule("kernel:3.18", &["project4"], &suite),
                build_target_rule(
                    "kernel:4.14",
                    &["project1", "project2", "project5", "project6"],
                    &suite
                ),
                build_target_rule("kernel:5.4", &["project3"], &suite),
            ]
        );
    }

    #[test]
    fn kernel_versions_skip_unknown_version() {
        let build_metadata_list: BuildMetadataList = [
            build_metadata("p1", "4.14", "", ""),
            build_metadata("p2", "4.14", "", ""),
            build_metadata("p3", "5.4", "", ""),
            build_metadata("p4", "0.0", "", ""),
        ]
        .into_iter()
        .collect();
        let plan = plan(
            Requirements {
                kernel_versions: Some(KernelVersions {}),
                ..Requirements::default()
            },
            &[],
            &[],
        );
        let suite = TestSuite::default();

        let rules = generate(
            &plan,
            &build_metadata_list,
            &dut_attribute_list(),
            &flat_config_list(),
        )
        .unwrap();

        assert_eq!(
            rules,
            vec![
                build_target_rule("kernel:4.14", &["p1", "p2"], &suite),
                build_target_rule("kernel:5.4", &["p3"], &suite),
            ]
        );
    }

    #[test]
    fn soc_families() {
        let plan = plan(
            Requirements {
                soc_families: Some(SocFamilies {}),
                ..Requirements::default()
            },
            &[],
            &["flaky"],
        );
        let suite = TestSuite::from_tags(Vec::new(), vec!["flaky".to_string()]);

        assert_eq!(
            run(&plan).unwrap(),
            vec![
                build_target_rule("soc:chipsetA", &["project1", "project3", "project5"], &suite),
                build_target_rule("soc:chipsetB", &["project2", "project6"], &suite),
                build_target_rule("soc:chipsetC", &["project4"], &suite),
            ]
        );
    }

    #[test]
    fn fingerprint() {
        let plan = plan(
            Requirements {
                fingerprint: Some(Fingerprint {}),
                ..Requirements::default()
            },
            &["kernel", "fingerprint"],
            &[],
        );

        let rules = run(&plan).unwrap();

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "fp:present");
        assert_eq!(
            rules[0].dut_criteria,
            vec![DutCriterion::new(
                AttributeId::FINGERPRINT_LOCATION,
                [
                    "POWER_BUTTON_TOP_LEFT",
                    "KEYBOARD_BOTTOM_LEFT",
                    "KEYBOARD_BOTTOM_RIGHT",
                    "KEYBOARD_TOP_RIGHT",
                    "RIGHT_SIDE",
                    "LEFT_SIDE",
                    "PRESENT",
                ]
            )]
        );
    }

    #[test]
    fn firmware_ro_versions() {
        let plan = plan(
            Requirements {
                firmware_ro_versions: Some(FirmwareRoVersions {
                    program_to_milestone: BTreeMap::from([
                        ("ProgA".to_string(), 90),
                        ("ProgB".to_string(), 91),
                    ]),
                }),
                ..Requirements::default()
            },
            &[],
            &[],
        );

        let rules = run(&plan).unwrap();

        let names: Vec<_> = rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Design1_faft", "Design20_faft", "Design2_faft"]);
        assert_eq!(
            rules[2].dut_criteria,
            vec![
                DutCriterion::new(AttributeId::DESIGN_ID, ["Design2"]),
                DutCriterion::new(AttributeId::FIRMWARE_RO_MAJOR_VERSION, ["123"]),
                DutCriterion::new(AttributeId::FIRMWARE_RO_MINOR_VERSION, ["0"]),
                DutCriterion::new(AttributeId::FIRMWARE_RO_PATCH_VERSION, ["0"]),
            ]
        );
        assert_eq!(
            rules[2].test_suites,
            vec![
                TestSuite::named("faft_smoke", "suite:faft_smoke"),
                TestSuite::named("faft_bios", "suite:faft_bios"),
            ]
        );
    }

    #[test]
    fn multiple_requirements() {
        let plan = plan(
            Requirements {
                kernel_versions: Some(KernelVersions {}),
                soc_families: Some(SocFamilies {}),
                arc_versions: Some(ArcVersions {}),
                ..Requirements::default()
            },
            &["kernel", "arc"],
            &[],
        );
        let suite = TestSuite::from_tags(vec!["kernel".to_string(), "arc".to_string()], Vec::new());

        // kernel:4.14 joins chipsetA first, so chipsetB never meets a kernel
        // rule, and kernel:5.4 finds chipsetA already taken.
        assert_eq!(
            run(&plan).unwrap(),
            vec![
                build_target_rule("kernel:3.18_soc:chipsetC_arc:R", &["project4"], &suite),
                build_target_rule("kernel:4.14_soc:chipsetA", &["project1", "project5"], &suite),
                build_target_rule("kernel:5.4", &["project3"], &suite),
                build_target_rule("soc:chipsetB_arc:P", &["project6"], &suite),
            ]
        );
    }

    #[test]
    fn firmware_rules_pass_through_build_target_rules() {
        let plan = plan(
            Requirements {
                kernel_versions: Some(KernelVersions {}),
                firmware_ro_versions: Some(FirmwareRoVersions {
                    program_to_milestone: BTreeMap::from([("ProgB".to_string(), 91)]),
                }),
                ..Requirements::default()
            },
            &[],
            &[],
        );

        let names: Vec<_> = run(&plan)
            .unwrap()
            .into_iter()
            .map(|rule| rule.name)
            .collect();
        assert_eq!(
            names,
            vec!["Design20_faft", "kernel:3.18", "kernel:4.14", "kernel:5.4"]
        );
    }

    #[test]
    fn output_is_deterministic() {
        let plan = plan(
            Requirements {
                kernel_versions: Some(KernelVersions {}),
                soc_families: Some(SocFamilies {}),
                fingerprint: Some(Fingerprint {}),
                ..Requirements::default()
            },
            &["kernel"],
            &[],
        );

        let first = serde_json::to_string(&run(&plan).unwrap()).unwrap();
        let mut reversed = build_metadata_list();
        reversed.values.reverse();
        let second = serde_json::to_string(
            &generate(&plan, &reversed, &dut_attribute_list(), &flat_config_list()).unwrap(),
        )
        .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn no_requirements() {
        let plan = SourceTestPlan {
            enabled_test_environments: vec![crate::domain::TestEnvironment::Hardware],
            ..SourceTestPlan::default()
        };

        let error = run(&plan).unwrap_err();
        assert_eq!(error, Error::NoRequirements);
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert!(
            error
                .to_string()
                .contains("at least one requirement must be set")
        );
    }

    #[test]
    fn unimplemented_requirement() {
        let plan: SourceTestPlan =
            serde_json::from_str(r#"{"requirements": {"chromeos_config": {}}}"#).unwrap();

        let error = run(&plan).unwrap_err();
        assert_eq!(error.to_string(), r#"unimplemented requirement "chromeos_config""#);
        assert_eq!(error.kind(), ErrorKind::Unimplemented);
    }

    #[test]
    fn invalid_dut_attributes() {
        let plan = plan(
            Requirements {
                kernel_versions: Some(KernelVersions {}),
                ..Requirements::default()
            },
            &[],
            &[],
        );

        let error = generate(
            &plan,
            &build_metadata_list(),
            &DutAttributeList::from_ids(["miscdutattr"]),
            &flat_config_list(),
        )
        .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::SchemaViolation);
        assert!(error.to_string().contains("system_build_target"));
    }

    #[test]
    fn firmware_errors_abort_generation() {
        let plan = plan(
            Requirements {
                kernel_versions: Some(KernelVersions {}),
                firmware_ro_versions: Some(FirmwareRoVersions::default()),
                ..Requirements::default()
            },
            &[],
            &[],
        );
        assert_eq!(run(&plan).unwrap_err(), Error::EmptyProgramToMilestone);

        let plan = plan_with_programs(&["otherProg"]);
        assert_eq!(
            run(&plan).unwrap_err(),
            Error::ProgramNotFound("otherProg".to_string())
        );
    }

    #[test]
    fn conflicting_firmware_versions() {
        let flat_config_list: FlatConfigList = [
            flat_config("progA", "designA", "config1", Some(FirmwareVersion::new(1, 0, 0)), ""),
            flat_config("progA", "designA", "config2", Some(FirmwareVersion::new(2, 0, 0)), ""),
        ]
        .into_iter()
        .collect();

        let error = generate(
            &plan_with_programs(&["progA"]),
            &build_metadata_list(),
            &dut_attribute_list(),
            &flat_config_list,
        )
        .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Conflict);
        let message = error.to_string();
        assert!(message.contains("designA"));
        assert!(message.contains("1.0.0"));
        assert!(message.contains("2.0.0"));
    }

    #[test]
    fn design_shared_by_two_programs_is_a_name_conflict() {
        let flat_config_list: FlatConfigList = [
            flat_config("ProgA", "D1", "config1", Some(FirmwareVersion::new(1, 2, 3)), ""),
            flat_config("ProgB", "D1", "config1", Some(FirmwareVersion::new(1, 2, 3)), ""),
        ]
        .into_iter()
        .collect();

        let error = generate(
            &plan_with_programs(&["ProgA", "ProgB"]),
            &build_metadata_list(),
            &dut_attribute_list(),
            &flat_config_list,
        )
        .unwrap_err();

        assert_eq!(error, Error::DuplicateRuleName("D1_faft".to_string()));
        assert_eq!(error.kind(), ErrorKind::Conflict);
    }

    fn plan_with_programs(programs: &[&str]) -> SourceTestPlan {
        plan(
            Requirements {
                firmware_ro_versions: Some(FirmwareRoVersions {
                    program_to_milestone: programs.iter().map(|p| ((*p).to_string(), 91)).collect(),
                }),
                ..Requirements::default()
            },
            &[],
            &[],
        )
    }
}
