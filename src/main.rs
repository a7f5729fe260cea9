use anyhow::Context;
use clap::Parser;
use gcodevm::{init_logging, load_program, simulate, Config, TracingGenerator, BUILD_DATE};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    arg_required_else_help = true // Program is required, if none passed, show help.
)]
struct Cli {
    /// JSON program: an array of blocks, each an array of [letter, value] pairs
    program: PathBuf,
    /// Config file (.toml or .json), defaults to the platform config directory
    #[arg(long = "config", short = 'c')]
    config: Option<PathBuf>,
    #[arg(long = "json", short = 'j', help = "Print the report as JSON")]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging()?;
    tracing::debug!("gcodevm {} built {}", gcodevm::VERSION, BUILD_DATE);

    let config = Config::load_or_default(cli.config.as_deref()).context("Failed to load config")?;
    let program = load_program(&cli.program)?;

    let mut tracer = TracingGenerator::new();
    let report = simulate(&config, &program, &mut [&mut tracer])?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{json}");
    } else {
        println!("Blocks:    {}", report.blocks);
        println!("Positions: {}", report.positions.len());
        println!("Reactions: {}", report.events.len());
        println!("Moves:     {}", report.move_count());
        if let Some(end) = report.end() {
            println!("End:       {end}");
        }
    }

    Ok(())
}
