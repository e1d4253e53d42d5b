use cctools_ccl::Levelset;
use cctools_utils::{ok, AnyResult};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct RenumberCommand {
    /// Levelset to renumber
    pub levelset: PathBuf,
    /// Output file, the input is overwritten if not given
    #[clap(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl crate::Command for RenumberCommand {
    fn run(self) -> AnyResult {
        let mut levelset = Levelset::read_file(&self.levelset)?;
        let output = self.output.unwrap_or(self.levelset);

        let misplaced = levelset
            .levels
            .iter()
            .zip(1..)
            .filter(|(level, number)| level.number != *number)
            .count();

        println!(" : Renumbering {} levels into {}...", levelset.level_count(), output.display());
        levelset.write_file(&output)?;
        println!(" : {misplaced} level(s) got a new number");

        ok()
    }
}
