use std::{
    fs,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use testplan::{Config, CoverageRule, coverage::TextSummary, storage};
use tracing::instrument;

#[derive(Debug, Parser)]
pub struct Summary {
    /// Coverage rule document (JSON or YAML)
    #[arg(long, value_name = "PATH")]
    rules: PathBuf,

    /// Write the summary to a file instead of stdout
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

impl Summary {
    #[instrument]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let rules: Vec<CoverageRule> = storage::load(&self.rules)
            .with_context(|| format!("failed to load {}", self.rules.display()))?;
        let summary = TextSummary::with_padding(config.summary_padding());

        match &self.out {
            Some(path) => {
                let file = fs::File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                let mut writer = BufWriter::new(file);
                summary
                    .write(&mut writer, &rules)
                    .and_then(|()| writer.flush())
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
            None => {
                summary
                    .write(io::stdout().lock(), &rules)
                    .context("failed to write summary")?;
            }
        }

        Ok(())
    }
}
