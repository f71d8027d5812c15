use super::*;

/// Complete grids attempted before falling back to the pattern grid.
pub const GENERATION_ATTEMPTS: usize = 10;

/// Whether `digit` is absent from the row, column and box of `cell`, ignoring `cell` itself.
pub fn is_valid_placement(grid: &Digits, (row, col): Coord2, digit: u8) -> bool {
    let (row, col) = (usize::from(row), usize::from(col));
    let n = usize::from(SIZE);
    for i in 0..n {
        if i != col && grid[[row, i]] == digit {
            return false;
        }
        if i != row && grid[[i, col]] == digit {
            return false;
        }
    }
    let (box_row, box_col) = (row / 3 * 3, col / 3 * 3);
    for r in box_row..box_row + 3 {
        for c in box_col..box_col + 3 {
            if (r, c) != (row, col) && grid[[r, c]] == digit {
                return false;
            }
        }
    }
    true
}

/// Fills the empty cells of `grid` in place, trying digits in ascending order.
///
/// Returns `false` with `grid` restored when no completion exists.
fn fill(grid: &mut Digits) -> bool {
    let Some(((row, col), _)) = grid.indexed_iter().find(|(_, value)| **value == 0) else {
        return true;
    };
    let cell = (row as Coord, col as Coord);
    for digit in 1..=SIZE {
        if is_valid_placement(grid, cell, digit) {
            grid[[row, col]] = digit;
            if fill(grid) {
                return true;
            }
            grid[[row, col]] = 0;
        }
    }
    false
}

/// A completed copy of `grid`, or `None` when it cannot be completed.
pub fn solve(grid: &Digits) -> Option<Digits> {
    let consistent = grid
        .indexed_iter()
        .filter(|(_, value)| **value != 0)
        .all(|((r, c), &value)| is_valid_placement(grid, (r as Coord, c as Coord), value));
    if !consistent {
        return None;
    }
    let mut scratch = grid.clone();
    fill(&mut scratch).then_some(scratch)
}

/// Whether every row, column and box holds each digit exactly once.
pub fn is_solved(grid: &Digits) -> bool {
    grid.indexed_iter().all(|((r, c), &value)| {
        (1..=SIZE).contains(&value) && is_valid_placement(grid, (r as Coord, c as Coord), value)
    })
}

/// A full valid grid: random diagonal boxes completed by the solver.
pub fn complete_grid<R: Rng + ?Sized>(rng: &mut R) -> Digits {
    for attempt in 0..GENERATION_ATTEMPTS {
        let mut grid = empty_digits();
        for b in 0..3 {
            let mut digits: Vec<u8> = (1..=SIZE).collect();
            digits.shuffle(rng);
            for (i, digit) in digits.into_iter().enumerate() {
                grid[[b * 3 + i / 3, b * 3 + i % 3]] = digit;
            }
        }
        if fill(&mut grid) {
            return grid;
        }
        log::debug!("sudoku attempt {attempt} could not be completed");
    }
    log::warn!("sudoku generation exhausted, using the pattern grid");
    pattern_grid()
}

fn pattern_grid() -> Digits {
    Array2::from_shape_fn((usize::from(SIZE), usize::from(SIZE)), |(r, c)| {
        ((r * 3 + r / 3 + c) % 9 + 1) as u8
    })
}

/// Generates a puzzle by carving random cells out of a complete grid.
///
/// Cells are removed without checking that the solution stays unique.
pub fn generate_puzzle<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Puzzle {
    let solution = complete_grid(rng);
    let mut grid = solution.clone();
    let total = usize::from(SIZE) * usize::from(SIZE);
    for index in sample(rng, total, difficulty.cells_to_remove()) {
        grid[[index / usize::from(SIZE), index % usize::from(SIZE)]] = 0;
    }
    Puzzle { grid, solution }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn generated_solution_is_valid() {
        for seed in 0..5 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let grid = complete_grid(&mut rng);
            assert!(is_solved(&grid), "seed {seed}");
        }
        assert!(is_solved(&pattern_grid()));
    }

    #[test]
    fn puzzle_is_carved_from_the_solution() {
        let mut rng = SmallRng::seed_from_u64(42);
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let puzzle = generate_puzzle(difficulty, &mut rng);
            assert!(is_solved(&puzzle.solution));

            let zeros = puzzle.grid.iter().filter(|&&v| v == 0).count();
            assert_eq!(zeros, difficulty.cells_to_remove());
            for (given, solved) in puzzle.grid.iter().zip(puzzle.solution.iter()) {
                assert!(*given == 0 || given == solved);
            }
        }
    }

    #[test]
    fn solve_leaves_the_input_untouched() {
        let mut rng = SmallRng::seed_from_u64(7);
        let puzzle = generate_puzzle(Difficulty::Medium, &mut rng);
        let before = puzzle.grid.clone();

        let solved = solve(&puzzle.grid).unwrap();
        assert!(is_solved(&solved));
        assert_eq!(puzzle.grid, before);
    }

    #[test]
    fn inconsistent_grid_has_no_solution() {
        let mut grid = empty_digits();
        grid[[0, 0]] = 5;
        grid[[0, 8]] = 5;
        assert_eq!(solve(&grid), None);
    }

    #[test]
    fn placement_checks_row_column_and_box() {
        let mut grid = empty_digits();
        grid[[0, 0]] = 3;
        assert!(!is_valid_placement(&grid, (0, 7), 3));
        assert!(!is_valid_placement(&grid, (6, 0), 3));
        assert!(!is_valid_placement(&grid, (2, 2), 3));
        assert!(is_valid_placement(&grid, (4, 4), 3));
        assert!(is_valid_placement(&grid, (0, 0), 3));
    }
}
