use cctools_c2g::MapList;
use cctools_utils::{ok, AnyResult};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct MapsCommand {
    /// Game script (`.c2g`) to evaluate
    pub script: PathBuf,
}

impl crate::Command for MapsCommand {
    fn run(self) -> AnyResult {
        let list = MapList::load(&self.script)?;

        match &list.title {
            Some(title) => println!("{title}"),
            None => println!("(untitled game)"),
        }
        for entry in &list.maps {
            println!("  {:>3}. {}", entry.level, entry.path.display());
        }

        ok()
    }
}
