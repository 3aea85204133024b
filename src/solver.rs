//! Iterative-deepening A* over an explicit stack.
//!
//! Each pass is a bounded depth-first search; when the stack empties the
//! bound rises to the smallest pruned `f = cost + heuristic` and the pass
//! restarts from the root, so peak memory stays proportional to one pass's
//! frontier rather than to everything ever visited.

use std::rc::Rc;

use tracing::debug;

use crate::error::{Result, SolverError};
use crate::puzzle::{Move, Puzzle};

enum Iteration {
    Solved(Vec<Move>),
    Exceeded(Option<usize>),
}

/// Finds a shortest move sequence taking `puzzle` to its goal arrangement.
pub fn solve(puzzle: Puzzle) -> Result<Vec<Move>> {
    if !puzzle.is_solvable() {
        return Err(SolverError::Unsolvable);
    }

    let root = Rc::new(puzzle);
    let mut bound = root.heuristic();
    loop {
        debug!(bound, "starting bounded search");
        match bounded_search(&root, bound)? {
            Iteration::Solved(moves) => return Ok(moves),
            Iteration::Exceeded(next) => match next {
                Some(next) if next > bound => bound = next,
                // Nothing was pruned above the bound, so another pass could
                // never make progress.
                _ => return Err(SolverError::BoundStalled(bound)),
            },
        }
    }
}

fn bounded_search(root: &Rc<Puzzle>, bound: usize) -> Result<Iteration> {
    let mut stack = vec![Rc::clone(root)];
    let mut min_exceeding: Option<usize> = None;
    let mut expanded = 0usize;

    while let Some(cur) = stack.pop() {
        if cur.is_solved() {
            debug!(expanded, moves = cur.cost(), "goal reached");
            return Ok(Iteration::Solved(reconstruct(&cur)?));
        }

        let f = cur.cost() + cur.heuristic();
        if f <= bound {
            expanded += 1;
            for child in Puzzle::successors(&cur) {
                // Skip layouts already on the live stack. Entries that have
                // left the stack may legitimately come back later; this is
                // frontier dedup, not a closed set.
                if stack.iter().any(|entry| entry.same_layout(&child)) {
                    continue;
                }
                stack.push(child);
            }
        } else {
            min_exceeding = Some(min_exceeding.map_or(f, |min| min.min(f)));
        }
    }

    debug!(expanded, next_bound = ?min_exceeding, "search bound exhausted");
    Ok(Iteration::Exceeded(min_exceeding))
}

/// Walks parent links from the solved state back to the root and reverses
/// the collected moves into start-to-goal order.
fn reconstruct(goal: &Rc<Puzzle>) -> Result<Vec<Move>> {
    let mut moves = Vec::with_capacity(goal.cost());
    let mut cur = Rc::clone(goal);
    loop {
        match (cur.last_move(), cur.parent()) {
            (Some(step), Some(prev)) => {
                moves.push(step);
                cur = prev;
            }
            (None, None) => break,
            // A half-linked state means construction went wrong somewhere.
            _ => return Err(SolverError::BrokenParentChain),
        }
    }
    moves.reverse();
    Ok(moves)
}
