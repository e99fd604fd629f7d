use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use testplan::{
    Config,
    coverage::{FlatConfigIndex, JoinedConfig},
    domain::{BuildMetadataList, FlatConfigList},
    storage,
};
use tracing::instrument;

use super::{input_path, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Join {
    /// Build metadata list of every build target
    #[arg(long, value_name = "PATH")]
    build_metadata_list: Option<PathBuf>,

    /// Flat config list of every device configuration
    #[arg(long, value_name = "PATH")]
    flat_config_list: Option<PathBuf>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

const HEADERS: [&str; 6] = [
    "Program",
    "Design",
    "Design config",
    "Overlay",
    "Profile",
    "Kernel",
];

#[derive(Debug, Serialize)]
struct Row<'a> {
    program: &'a str,
    design: &'a str,
    design_config: &'a str,
    overlay: &'a str,
    profile: &'a str,
    kernel: Option<&'a str>,
}

impl<'a> From<&JoinedConfig<'a>> for Row<'a> {
    fn from(joined: &JoinedConfig<'a>) -> Self {
        let JoinedConfig {
            flat_config,
            build_metadata,
        } = *joined;
        Self {
            program: &flat_config.program,
            design: &flat_config.hw_design,
            design_config: &flat_config.hw_design_config,
            overlay: build_metadata.overlay_name(),
            profile: &build_metadata.build_target.profile_name,
            kernel: build_metadata.kernel_version(),
        }
    }
}

impl Row<'_> {
    fn cells(&self) -> [&str; 6] {
        [
            self.program,
            self.design,
            self.design_config,
            self.overlay,
            self.profile,
            self.kernel.unwrap_or("-"),
        ]
    }
}

impl Join {
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

        let build_metadata: BuildMetadataList = storage::load(&build_metadata_path)
            .with_context(|| format!("failed to load {}", build_metadata_path.display()))?;
        let flat_configs: FlatConfigList = storage::load(&flat_config_path)
            .with_context(|| format!("failed to load {}", flat_config_path.display()))?;

        let index = FlatConfigIndex::new(&flat_configs);
        let joined = index
            .join_with_build_metadata(&build_metadata.values)
            .context("failed to join flat configs with build metadata")?;
        let rows: Vec<Row<'_>> = joined.iter().map(Row::from).collect();

        let mut stdout = io::stdout().lock();
        match self.output {
            OutputFormat::Table => {
                render_table(&mut stdout, &rows).context("failed to render table")?;
                let unmatched = flat_configs.values.len() - rows.len();
                let footer = format!(
                    "{} of {} configs joined",
                    rows.len(),
                    flat_configs.values.len()
                );
                if unmatched == 0 {
                    writeln!(stdout, "\n{}", footer.dim())?;
                } else {
                    writeln!(stdout, "\n{}", footer.warning())?;
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut stdout, &rows)
                    .context("failed to render json output")?;
                writeln!(stdout)?;
            }
        }

        Ok(())
    }
}

fn render_table<W: Write>(writer: &mut W, rows: &[Row<'_>]) -> io::Result<()> {
    let cells: Vec<[&str; 6]> = rows.iter().map(Row::cells).collect();

    let widths = HEADERS.map(|header| header.len());
    let widths: Vec<usize> = widths
        .iter()
        .enumerate()
        .map(|(idx, header_width)| {
            cells
                .iter()
                .map(|row| row[idx].len())
                .max()
                .unwrap_or(0)
                .max(*header_width)
        })
        .collect();

    let mut header = String::new();
    let mut rule = String::new();
    for (name, width) in HEADERS.iter().zip(&widths) {
        header.push_str(&format!("{name:<width$}  "));
        rule.push_str(&format!("{:-<width$}  ", ""));
    }
    writeln!(writer, "{}", header.trim_end().info())?;
    writeln!(writer, "{}", rule.trim_end())?;

    for row in &cells {
        let mut line = String::new();
        for (value, width) in row.iter().zip(&widths) {
            line.push_str(&format!("{value:<width$}  "));
        }
        writeln!(writer, "{}", line.trim_end())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use testplan::domain::{BuildMetadata, FlatConfig, PackageSummary, PortageBuildTarget};

    use super::*;

    #[test]
    fn table_columns_are_aligned() {
        let flat_config = FlatConfig {
            program: "ProgA".to_string(),
            hw_design: "DesignA".to_string(),
            hw_design_config: "cfg1".to_string(),
            ..FlatConfig::default()
        };
        let build_metadata = BuildMetadata {
            build_target: PortageBuildTarget::new("proga"),
            package_summary: PackageSummary {
                kernel_version: "5.4".to_string(),
                ..PackageSummary::default()
            },
        };
        let joined = JoinedConfig {
            flat_config: &flat_config,
            build_metadata: &build_metadata,
        };

        let mut out = Vec::new();
        render_table(&mut out, &[Row::from(&joined)]).unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        // Colour is only applied when stdout is a terminal.
        if !crate::cli::terminal::supports_color() {
            assert_eq!(
                lines[0],
                "Program  Design   Design config  Overlay  Profile  Kernel"
            );
        }
        assert_eq!(
            lines[2],
            "ProgA    DesignA  cfg1           proga             5.4"
        );
    }

    #[test]
    fn missing_kernel_renders_as_dash() {
        let flat_config = FlatConfig::default();
        let build_metadata = BuildMetadata {
            build_target: PortageBuildTarget::new("proga"),
            package_summary: PackageSummary::default(),
        };
        let joined = JoinedConfig {
            flat_config: &flat_config,
            build_metadata: &build_metadata,
        };

        assert_eq!(Row::from(&joined).cells()[5], "-");
    }
}
