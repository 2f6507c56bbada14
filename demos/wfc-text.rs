use std::process::ExitCode;

use clap::Parser;
use glyph_wfc::{
    catalog::Pattern,
    generator::{
        node_heuristic::NodeSelectionHeuristic, Generator, RngMode, DEFAULT_RETRY_COUNT,
        DEFAULT_SEED,
    },
    grid::GridDefinition,
    render,
};
use tracing::{error, info};

const DEFAULT_SIZE: u32 = 20;

#[derive(Parser)]
#[command(name = "wfc-text")]
#[command(author, version, about = "Fill a text grid with Wave Function Collapse")]
/// Command-line arguments of the text demo
struct Cli {
    /// Tileset pattern: circuit, maze, gradient or mosaic
    #[arg(short, long, default_value_t = Pattern::Circuit)]
    pattern: Pattern,

    /// Width and height of a square grid
    #[arg(short, long, default_value_t = DEFAULT_SIZE)]
    size: u32,

    /// Grid width, overrides `size`
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Grid height, overrides `size`
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Random seed for reproducible generation
    #[arg(long, default_value_t = DEFAULT_SEED, conflicts_with = "random")]
    seed: u64,

    /// Use a random seed
    #[arg(long)]
    random: bool,

    /// Reseeded reruns allowed after a failure
    #[arg(short, long, default_value_t = DEFAULT_RETRY_COUNT)]
    retries: u32,

    /// Pick cells by remaining tiles count instead of entropy
    #[arg(long)]
    mrv: bool,

    /// Log the generation runs
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let grid = match GridDefinition::new(
        cli.width.unwrap_or(cli.size),
        cli.height.unwrap_or(cli.size),
    ) {
        Ok(grid) => grid,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut generator = Generator::builder()
        .with_tileset(cli.pattern.tileset())
        .with_grid(grid)
        .with_rng(if cli.random {
            RngMode::RandomSeed
        } else {
            RngMode::Seeded(cli.seed)
        })
        .with_node_heuristic(if cli.mrv {
            NodeSelectionHeuristic::MinimumRemainingValue
        } else {
            NodeSelectionHeuristic::MinimumEntropy
        })
        .build();

    match generator.generate_with_retries(cli.retries) {
        Ok((gen_info, grid_data)) => {
            info!(
                "Generated a {} {} grid with seed {} in {} tries",
                grid, cli.pattern, gen_info.seed, gen_info.try_count
            );
            println!("{}", render::to_text(&grid_data));
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
