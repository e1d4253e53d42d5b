use cctools_c2g::{GameScript, ParseOptions};
use cctools_utils::{ok, AnyResult};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ScriptCommand {
    /// Game script (`.c2g`) to parse
    pub script: PathBuf,
    /// Keeps identifiers and strings after `script` blocks as separate nodes
    #[clap(long)]
    pub no_script_lines: bool,
}

impl crate::Command for ScriptCommand {
    fn run(self) -> AnyResult {
        let options = ParseOptions {
            collect_script_lines: !self.no_script_lines,
        };
        let script = GameScript::read_with(&self.script, options)?;

        for node in &script.nodes {
            println!("{:>5}: {node}", node.line);
        }

        let junk = script.junk().count();
        if junk > 0 {
            eprintln!("{junk} line(s) couldn't be parsed");
        }

        ok()
    }
}
