use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use testplan::storage;
use tracing::instrument;

use super::{generate::load_plans, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Merge {
    /// Source test plan (JSON or YAML); may be repeated
    #[arg(long, required = true, value_name = "PATH")]
    plan: Vec<PathBuf>,

    /// Where to write the merged plan
    #[arg(long, value_name = "PATH")]
    out: PathBuf,
}

impl Merge {
    #[instrument]
    pub fn run(self) -> anyhow::Result<()> {
        let merged = load_plans(&self.plan)?;

        storage::save(&self.out, &merged)
            .with_context(|| format!("failed to write {}", self.out.display()))?;

        println!(
            "{}",
            format!("Merged {} plans into {}", self.plan.len(), self.out.display()).success()
        );
        Ok(())
    }
}
