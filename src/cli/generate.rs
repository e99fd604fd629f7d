use std::{
    fs,
    io::{BufWriter, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use nonempty::NonEmpty;
use testplan::{
    Config, DutAttributeList, SourceTestPlan,
    coverage::TextSummary,
    domain::{BuildMetadataList, FlatConfigList},
    storage,
};
use tracing::instrument;

use super::{input_path, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Generate {
    /// Source test plan (JSON or YAML); may be repeated
    #[arg(long, required = true, value_name = "PATH")]
    plan: Vec<PathBuf>,

    /// Build metadata list of every build target
    #[arg(long, value_name = "PATH")]
    build_metadata_list: Option<PathBuf>,

    /// Flat config list of every device configuration
    #[arg(long, value_name = "PATH")]
    flat_config_list: Option<PathBuf>,

    /// DUT attribute list the generated rules are checked against
    #[arg(long, value_name = "PATH")]
    dut_attribute_list: Option<PathBuf>,

    /// Where to write the generated coverage rules
    #[arg(long, value_name = "PATH")]
    out: PathBuf,

    /// Where to write a human-readable summary of the rules
    #[arg(long, value_name = "PATH")]
    text_summary_out: Option<PathBuf>,
}

impl Generate {
    #[instrument]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let build_metadata_path = input_path(
            self.build_metadata_list,
            config.build_metadata_list.as_ref(),
            "build-metadata-list",
        )?;
        let flat_config_path = input_path(
            self.flat_config_list,
            config.flat_config_list.as_ref(),
            "flat-config-list",
        )?;
        let dut_attribute_path = input_path(
            self.dut_attribute_list,
            config.dut_attribute_list.as_ref(),
            "dut-attribute-list",
        )?;

        let plan = load_plans(&self.plan)?;
        let build_metadata: BuildMetadataList = storage::load(&build_metadata_path)
            .with_context(|| format!("failed to load {}", build_metadata_path.display()))?;
        let flat_configs: FlatConfigList = storage::load(&flat_config_path)
            .with_context(|| format!("failed to load {}", flat_config_path.display()))?;
        let dut_attributes: DutAttributeList = storage::load(&dut_attribute_path)
            .with_context(|| format!("failed to load {}", dut_attribute_path.display()))?;

        tracing::info!(
            "read {} BuildMetadata and {} FlatConfigs",
            build_metadata.values.len(),
            flat_configs.values.len()
        );

        let rules = testplan::generate(&plan, &build_metadata, &dut_attributes, &flat_configs)
            .context("failed to generate coverage rules")?;

        storage::save(&self.out, &rules)
            .with_context(|| format!("failed to write {}", self.out.display()))?;

        if let Some(path) = &self.text_summary_out {
            let file = fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            TextSummary::with_padding(config.summary_padding())
                .write(&mut writer, &rules)
                .and_then(|()| writer.flush())
                .with_context(|| format!("failed to write {}", path.display()))?;
        }

        let message = format!(
            "Generated {} coverage rules in {}",
            rules.len(),
            self.out.display()
        );
        if rules.is_empty() {
            println!("{}", message.warning());
        } else {
            println!("{}", message.success());
        }

        Ok(())
    }
}

/// Loads every plan and merges them into one.
pub(super) fn load_plans(paths: &[PathBuf]) -> anyhow::Result<SourceTestPlan> {
    let plans = paths
        .iter()
        .map(|path| {
            storage::load(path).with_context(|| format!("failed to load {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<SourceTestPlan>>>()?;

    let plans = NonEmpty::from_vec(plans).context("at least one plan is required")?;
    tracing::info!("merging {} SourceTestPlans", plans.len());

    Ok(testplan::merge::source_test_plans(plans))
}
