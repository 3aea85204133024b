use std::fmt;
use std::rc::Rc;

use rand::{seq::SliceRandom, Rng};

use crate::error::{Result, SolverError};

/// A blank move, named after the direction the blank travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Left,
    Right,
    Up,
    Down,
}

impl Move {
    /// Every direction, in generation order.
    pub const ALL: [Move; 4] = [Move::Left, Move::Right, Move::Up, Move::Down];

    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Left => (0, -1),
            Move::Right => (0, 1),
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Left => Move::Right,
            Move::Right => Move::Left,
            Move::Up => Move::Down,
            Move::Down => Move::Up,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Left => "left",
            Move::Right => "right",
            Move::Up => "up",
            Move::Down => "down",
        };
        write!(f, "{}", s)
    }
}

/// One board arrangement plus its search metadata. All fields are set at
/// construction; derived states keep their parent alive through an `Rc`
/// handle, so a whole search branch frees when its last child drops.
#[derive(Debug)]
pub struct Puzzle {
    tiles: Vec<Vec<u32>>,
    width: usize,
    blank_row: usize,
    blank_col: usize,
    /// Row-major cell the blank occupies in the goal arrangement.
    goal_blank: usize,
    heuristic: usize,
    cost: usize,
    last_move: Option<Move>,
    parent: Option<Rc<Puzzle>>,
}

impl Puzzle {
    /// Builds a root state from `size + 1` row-major values. `zero_goal` is
    /// the goal cell of the blank; `-1` is shorthand for the last cell.
    pub fn from_values(values: Vec<u32>, size: usize, zero_goal: isize) -> Result<Puzzle> {
        if size == 0 {
            return Err(SolverError::InvalidInput(
                "tile count must be positive".into(),
            ));
        }
        if zero_goal < -1 || zero_goal > size as isize {
            return Err(SolverError::InvalidInput(format!(
                "blank goal position {zero_goal} is out of range"
            )));
        }
        let width = ((size + 1) as f64).sqrt() as usize;
        if width * width != size + 1 {
            return Err(SolverError::InvalidInput(format!(
                "{size} tiles do not fill a square board"
            )));
        }
        if values.len() != size + 1 {
            return Err(SolverError::InvalidInput(format!(
                "expected {} values, got {}",
                size + 1,
                values.len()
            )));
        }
        let mut seen = vec![false; size + 1];
        for &value in &values {
            match seen.get_mut(value as usize) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(SolverError::InvalidInput(format!(
                        "board must contain each value in 0..={size} exactly once"
                    )))
                }
            }
        }

        let blank = values
            .iter()
            .position(|&value| value == 0)
            .ok_or_else(|| SolverError::InvalidInput("board has no blank cell".into()))?;
        let tiles: Vec<Vec<u32>> = values.chunks(width).map(|row| row.to_vec()).collect();
        let goal_blank = if zero_goal == -1 {
            size
        } else {
            zero_goal as usize
        };
        let heuristic = manhattan_sum(&tiles, width, goal_blank);

        Ok(Puzzle {
            tiles,
            width,
            blank_row: blank / width,
            blank_col: blank % width,
            goal_blank,
            heuristic,
            cost: 0,
            last_move: None,
            parent: None,
        })
    }

    /// Builds a uniformly random solvable board by reshuffling until the
    /// parity test accepts.
    pub fn shuffled<R: Rng>(size: usize, zero_goal: isize, rng: &mut R) -> Result<Puzzle> {
        let mut values: Vec<u32> = (0..=size as u32).collect();
        loop {
            values.shuffle(rng);
            let puzzle = Puzzle::from_values(values.clone(), size, zero_goal)?;
            if puzzle.is_solvable() {
                return Ok(puzzle);
            }
        }
    }

    pub fn is_solvable(&self) -> bool {
        let flat: Vec<u32> = self
            .tiles
            .iter()
            .flat_map(|row| row.iter().copied())
            .collect();
        let inversions = count_inversions(&flat);

        if self.width % 2 == 0 {
            // Even width: solvable when inversions plus the blank's row is odd.
            (inversions + self.blank_row) % 2 != 0
        } else {
            // Odd width: solvable when the inversion count is even.
            inversions % 2 == 0
        }
    }

    /// The legal children of `parent`, minus the move that would undo
    /// `last_move`, sorted by descending `cost + heuristic` so the cheapest
    /// child ends up on top of the caller's stack.
    pub fn successors(parent: &Rc<Puzzle>) -> Vec<Rc<Puzzle>> {
        let mut children: Vec<Puzzle> = Vec::with_capacity(4);
        for dir in Move::ALL {
            if let Some(last) = parent.last_move {
                if dir == last.opposite() {
                    continue;
                }
            }
            if let Some(child) = Puzzle::child(parent, dir) {
                children.push(child);
            }
        }
        children.sort_by(|a, b| (b.cost + b.heuristic).cmp(&(a.cost + a.heuristic)));
        children.into_iter().map(Rc::new).collect()
    }

    fn child(parent: &Rc<Puzzle>, dir: Move) -> Option<Puzzle> {
        let (dr, dc) = dir.as_offset();
        let row = parent.blank_row as isize + dr;
        let col = parent.blank_col as isize + dc;
        if row < 0 || row >= parent.width as isize || col < 0 || col >= parent.width as isize {
            return None;
        }
        let (row, col) = (row as usize, col as usize);

        let mut tiles = parent.tiles.clone();
        tiles[parent.blank_row][parent.blank_col] = tiles[row][col];
        tiles[row][col] = 0;
        let heuristic = manhattan_sum(&tiles, parent.width, parent.goal_blank);

        Some(Puzzle {
            tiles,
            width: parent.width,
            blank_row: row,
            blank_col: col,
            goal_blank: parent.goal_blank,
            heuristic,
            cost: parent.cost + 1,
            last_move: Some(dir),
            parent: Some(Rc::clone(parent)),
        })
    }

    pub fn is_solved(&self) -> bool {
        self.heuristic == 0
    }

    pub fn heuristic(&self) -> usize {
        self.heuristic
    }

    pub fn cost(&self) -> usize {
        self.cost
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn parent(&self) -> Option<Rc<Puzzle>> {
        self.parent.clone()
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.tiles
    }

    pub fn same_layout(&self, other: &Puzzle) -> bool {
        self.tiles == other.tiles
    }
}

/// Manhattan-distance sum over the non-blank tiles. Tiles whose value lands
/// at or past the blank's goal cell have their goal shifted one slot, since
/// the blank takes up a cell of the `1..=size` goal sequence.
fn manhattan_sum(tiles: &[Vec<u32>], width: usize, goal_blank: usize) -> usize {
    let mut sum = 0;
    for (row, line) in tiles.iter().enumerate() {
        for (col, &tile) in line.iter().enumerate() {
            if tile == 0 {
                continue;
            }
            let mut tile = tile as usize;
            if tile - 1 >= goal_blank {
                tile += 1;
            }
            let goal_row = (tile - 1) / width;
            let goal_col = (tile - 1) % width;
            sum += goal_row.abs_diff(row) + goal_col.abs_diff(col);
        }
    }
    sum
}

fn count_inversions(flattened: &[u32]) -> usize {
    flattened
        .iter()
        .enumerate()
        .filter(|&(_, &val)| val != 0)
        .map(|(i, &val)| {
            flattened[i + 1..]
                .iter()
                .filter(|&&next| next != 0 && next < val)
                .count()
        })
        .sum()
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.tiles {
            for &val in row {
                write!(f, "{:2} ", val)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    fn board(values: &[u32]) -> Puzzle {
        Puzzle::from_values(values.to_vec(), values.len() - 1, -1).unwrap()
    }

    #[test]
    fn solved_board_has_zero_heuristic() {
        let p = board(&[1, 2, 3, 4, 5, 6, 7, 8, 0]);
        assert_eq!(p.heuristic(), 0);
        assert!(p.is_solved());
    }

    #[test]
    fn heuristic_sums_tile_distances() {
        // 5 and 8 are each one cell from home.
        let p = board(&[1, 2, 3, 4, 0, 6, 7, 5, 8]);
        assert_eq!(p.heuristic(), 2);
        assert!(!p.is_solved());
    }

    #[test]
    fn blank_goal_shifts_tile_targets() {
        let p = Puzzle::from_values(vec![0, 1, 2, 3, 4, 5, 6, 7, 8], 8, 0).unwrap();
        assert_eq!(p.heuristic(), 0);
        assert!(p.is_solved());
    }

    #[test]
    fn negative_one_goal_means_last_cell() {
        let values = vec![7, 2, 3, 4, 5, 6, 1, 8, 0];
        let explicit = Puzzle::from_values(values.clone(), 8, 8).unwrap();
        let shorthand = Puzzle::from_values(values, 8, -1).unwrap();
        assert_eq!(explicit.heuristic(), shorthand.heuristic());
    }

    #[test]
    fn rejects_zero_tile_count() {
        assert!(Puzzle::from_values(vec![0], 0, -1).is_err());
    }

    #[test]
    fn rejects_goal_position_out_of_range() {
        let values = vec![1, 2, 3, 4, 5, 6, 7, 8, 0];
        assert!(Puzzle::from_values(values.clone(), 8, -2).is_err());
        assert!(Puzzle::from_values(values, 8, 9).is_err());
    }

    #[test]
    fn rejects_non_square_board() {
        assert!(Puzzle::from_values(vec![1, 2, 3, 4, 5, 0], 5, -1).is_err());
    }

    #[test]
    fn rejects_duplicate_values() {
        assert!(Puzzle::from_values(vec![1, 1, 3, 4, 5, 6, 7, 8, 0], 8, -1).is_err());
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(Puzzle::from_values(vec![1, 2, 3, 4, 5, 6, 7, 9, 0], 8, -1).is_err());
    }

    #[test]
    fn rejects_wrong_value_count() {
        assert!(Puzzle::from_values(vec![1, 2, 3], 8, -1).is_err());
    }

    #[test]
    fn goal_board_is_solvable() {
        assert!(board(&[1, 2, 3, 4, 5, 6, 7, 8, 0]).is_solvable());
    }

    #[test]
    fn swapped_pair_is_unsolvable() {
        assert!(!board(&[2, 1, 3, 4, 5, 6, 7, 8, 0]).is_solvable());
    }

    #[test]
    fn even_width_rule_counts_blank_row() {
        let solved: Vec<u32> = (1u32..16).chain([0]).collect();
        assert!(Puzzle::from_values(solved, 15, -1).unwrap().is_solvable());

        let swapped: Vec<u32> = [2u32, 1].into_iter().chain(3..16).chain([0]).collect();
        assert!(!Puzzle::from_values(swapped, 15, -1).unwrap().is_solvable());
    }

    #[test]
    fn successors_skip_the_reverse_move() {
        let root = Rc::new(board(&[1, 2, 3, 4, 0, 6, 7, 5, 8]));
        for child in Puzzle::successors(&root) {
            let back = child.last_move().unwrap().opposite();
            let grandchildren = Puzzle::successors(&child);
            assert!(grandchildren.iter().all(|gc| gc.last_move() != Some(back)));
        }
    }

    #[test]
    fn successor_count_follows_the_blank() {
        let center = Rc::new(board(&[1, 2, 3, 4, 0, 6, 7, 5, 8]));
        assert_eq!(Puzzle::successors(&center).len(), 4);

        let corner = Rc::new(board(&[1, 2, 3, 4, 5, 6, 7, 8, 0]));
        assert_eq!(Puzzle::successors(&corner).len(), 2);
    }

    #[test]
    fn successors_sorted_by_descending_cost_estimate() {
        let root = Rc::new(board(&[1, 2, 3, 4, 0, 6, 7, 5, 8]));
        let children = Puzzle::successors(&root);
        let f: Vec<usize> = children.iter().map(|c| c.cost() + c.heuristic()).collect();
        assert!(f.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn children_extend_the_parent_chain() {
        let root = Rc::new(board(&[1, 2, 3, 4, 0, 6, 7, 5, 8]));
        for child in Puzzle::successors(&root) {
            assert_eq!(child.cost(), 1);
            assert!(child.parent().unwrap().same_layout(&root));
        }
    }

    #[test]
    fn shuffled_boards_pass_the_parity_test() {
        let mut rng = thread_rng();
        for _ in 0..20 {
            let puzzle = Puzzle::shuffled(8, -1, &mut rng).unwrap();
            assert!(puzzle.is_solvable());
        }
    }
}
