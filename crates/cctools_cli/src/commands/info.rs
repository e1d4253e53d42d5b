use cctools_ccl::{CcxLevelset, Levelset, TileKind};
use cctools_utils::{ok, AnyResult};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct InfoCommand {
    /// Levelset or `.dac` descriptor to inspect
    pub levelset: PathBuf,
    /// CCX metadata to show along with the levels
    #[clap(long)]
    pub ccx: Option<PathBuf>,
}

impl crate::Command for InfoCommand {
    fn run(self) -> AnyResult {
        let levelset = Levelset::open(&self.levelset)?;
        let metadata = match &self.ccx {
            Some(path) => Some(CcxLevelset::read_file(path, levelset.level_count())?),
            None => None,
        };

        let ruleset: &'static str = levelset.ruleset.into();
        println!("{}", self.levelset.display());
        println!(" : Ruleset: {ruleset}");
        println!(" : Levels: {}", levelset.level_count());
        if let Some(metadata) = &metadata {
            if !metadata.description.is_empty() {
                println!(" : Description: {}", metadata.description);
            }
        }

        for (index, level) in levelset.levels.iter().enumerate() {
            let timer = match level.timer {
                0 => "untimed".to_string(),
                seconds => format!("{seconds}s"),
            };
            println!(
                "  {:>3}. {:<36} {:<4}  chips {:>3}/{:<3}  {timer}",
                index + 1,
                level.name,
                level.password,
                level.map.count(TileKind::Chip as u8),
                level.chips,
            );
            if let Some(author) = metadata
                .as_ref()
                .and_then(|metadata| metadata.levels.get(index))
                .map(|level| &level.author)
                .filter(|author| !author.is_empty())
            {
                println!("       by {author}");
            }
        }

        ok()
    }
}
