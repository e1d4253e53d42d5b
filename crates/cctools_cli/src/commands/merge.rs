use anyhow::ensure;
use cctools_ccl::Levelset;
use cctools_utils::{ok, AnyResult, AnyhowResultExt};
use clap::Args;
use log::warn;
use std::{
    fs,
    io::{BufWriter, Write},
    path::PathBuf,
};

#[derive(Args)]
pub struct MergeCommand {
    /// Output file
    #[clap(long, short = 'o')]
    pub output: PathBuf,
    /// Individual levelsets to merge, in order
    pub files: Vec<PathBuf>,
}

impl crate::Command for MergeCommand {
    fn run(self) -> AnyResult {
        ensure!(!self.files.is_empty(), "no levelsets to merge");
        println!("Merging files into {}...", self.output.display());

        let mut merged: Option<Levelset> = None;
        for input_path in &self.files {
            println!("  Merging {}...", input_path.display());
            let levelset = Levelset::open(input_path)?;

            // The first levelset decides the ruleset
            let merged = merged.get_or_insert_with(|| Levelset {
                ruleset: levelset.ruleset,
                levels: Vec::new(),
            });
            if merged.ruleset != levelset.ruleset {
                warn!(
                    "{} uses a different ruleset, its levels are merged anyway",
                    input_path.display()
                );
            }
            merged.levels.extend(levelset.levels);
        }

        let mut merged = merged.unwrap_or_default();
        let file = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&self.output)
            .otherwise(format!("couldn't create {}", self.output.display()))?;
        let mut writer = BufWriter::new(file);
        merged.write(&mut writer)?;
        writer.flush()?;

        println!("Wrote {} levels", merged.level_count());
        ok()
    }
}
