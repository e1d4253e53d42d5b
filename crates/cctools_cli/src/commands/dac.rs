use cctools_ccl::{DacFile, Levelset};
use cctools_utils::{ok, AnyResult, AnyhowResultExt};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct DacCommand {
    /// Levelset the descriptor points at
    pub levelset: PathBuf,
    /// Output file, defaults to the levelset path with a `.dac` extension
    #[clap(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl crate::Command for DacCommand {
    fn run(self) -> AnyResult {
        let levelset = Levelset::read_file(&self.levelset)?;
        let filename = self
            .levelset
            .file_name()
            .otherwise("the levelset path has no file name")?
            .to_string_lossy();

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| self.levelset.with_extension("dac"));
        DacFile::from_levelset(&levelset, filename).write_file(&output)?;

        println!("Wrote {}", output.display());
        ok()
    }
}
