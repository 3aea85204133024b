//! Text-format puzzle parsing.

use std::fmt;
use std::str::{FromStr, SplitWhitespace};

use crate::error::{Result, SolverError};
use crate::puzzle::Puzzle;

/// Reads a puzzle description from whitespace-separated integers: the tile
/// count, the blank's goal position (`-1` for the last cell), then the tiles
/// in row-major order. Trailing tokens are ignored.
pub fn parse_puzzle(input: &str) -> Result<Puzzle> {
    let mut tokens = input.split_whitespace();

    let size: usize = next_token(&mut tokens, "tile count")?;
    let zero_goal: isize = next_token(&mut tokens, "blank goal position")?;
    let count = size
        .checked_add(1)
        .ok_or_else(|| SolverError::InvalidInput("tile count is out of range".into()))?;

    let values = (0..count)
        .map(|_| next_token(&mut tokens, "tile"))
        .collect::<Result<Vec<u32>>>()?;

    Puzzle::from_values(values, size, zero_goal)
}

fn next_token<T>(tokens: &mut SplitWhitespace<'_>, what: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let token = tokens
        .next()
        .ok_or_else(|| SolverError::InvalidInput(format!("missing {what}")))?;
    token
        .parse()
        .map_err(|err| SolverError::InvalidInput(format!("bad {what} {token:?}: {err}")))
}
