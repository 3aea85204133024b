use std::io::Read;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use npuzzle::{input, solve, Puzzle};
use rand::thread_rng;
use tracing_subscriber::EnvFilter;

/// Optimal sliding-tile puzzle solver.
#[derive(Parser, Debug)]
#[command(name = "npuzzle", version)]
struct Cli {
    /// Solve a randomly scrambled board with this many tiles instead of
    /// reading one from stdin
    #[arg(long, value_name = "TILES")]
    random: Option<usize>,

    /// Goal cell of the blank as a row-major index; -1 is the last cell
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    zero_goal: isize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let puzzle = match cli.random {
        Some(tiles) => {
            let puzzle = Puzzle::shuffled(tiles, cli.zero_goal, &mut thread_rng())?;
            println!("{puzzle}");
            puzzle
        }
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            input::parse_puzzle(&text)?
        }
    };

    println!("Calculating...");
    let started = Instant::now();
    let moves = solve(puzzle)?;
    let elapsed = started.elapsed();

    println!("Solved!");
    println!("{}", moves.len());
    for step in &moves {
        println!("{step}");
    }
    println!("Time: {:.3} seconds", elapsed.as_secs_f64());

    Ok(())
}
