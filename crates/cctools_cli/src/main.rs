use clap::Parser;
use cctools_utils::{ok, AnyResult};
use log::LevelFilter;

fn main() -> AnyResult {
    let cli = cctools_cli::Cli::parse_from(wild::args());

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    pretty_env_logger::formatted_builder()
        .format_indent(None)
        .format_timestamp(None)
        .filter_level(level)
        .init();

    cctools_cli::run(cli)?;
    ok()
}
