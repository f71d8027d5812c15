use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board rows, columns and sizes.
pub type Coord = u8;

/// Count type used for cell totals.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Size of a board as `(rows, cols)`.
pub fn board_size<T>(board: &Array2<T>) -> Coord2 {
    let (rows, cols) = board.dim();
    (
        rows.try_into().unwrap_or(Coord::MAX),
        cols.try_into().unwrap_or(Coord::MAX),
    )
}

pub const fn in_bounds(coords: Coord2, bounds: Coord2) -> bool {
    coords.0 < bounds.0 && coords.1 < bounds.1
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        NeighborIter::new(index, board_size(self))
    }
}

/// Scan direction on a board, as a `(row, col)` step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
    DownRight,
    UpLeft,
    DownLeft,
    UpRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Right,
        Direction::Left,
        Direction::Down,
        Direction::Up,
        Direction::DownRight,
        Direction::UpLeft,
        Direction::DownLeft,
        Direction::UpRight,
    ];

    /// One representative per line orientation: horizontal, vertical and both diagonals.
    pub const AXES: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::DownRight,
        Direction::DownLeft,
    ];

    pub const fn delta(self) -> (isize, isize) {
        use Direction::*;
        match self {
            Right => (0, 1),
            Left => (0, -1),
            Down => (1, 0),
            Up => (-1, 0),
            DownRight => (1, 1),
            UpLeft => (-1, -1),
            DownLeft => (1, -1),
            UpRight => (-1, 1),
        }
    }

    pub const fn opposite(self) -> Self {
        use Direction::*;
        match self {
            Right => Left,
            Left => Right,
            Down => Up,
            Up => Down,
            DownRight => UpLeft,
            UpLeft => DownRight,
            DownLeft => UpRight,
            UpRight => DownLeft,
        }
    }

    pub const fn is_perpendicular_to(self, other: Direction) -> bool {
        let (a_row, a_col) = self.delta();
        let (b_row, b_col) = other.delta();
        a_row * b_row + a_col * b_col == 0
    }

    /// Next cell in this direction, if it stays in bounds.
    pub fn step(self, coords: Coord2, bounds: Coord2) -> Option<Coord2> {
        apply_delta(coords, self.delta(), bounds)
    }

    /// Moves `steps` cells in this direction from `coords`.
    pub fn offset(self, coords: Coord2, steps: usize, bounds: Coord2) -> Option<Coord2> {
        let (d_row, d_col) = self.delta();
        let steps: isize = steps.try_into().ok()?;
        apply_delta(coords, (d_row * steps, d_col * steps), bounds)
    }

    /// The `len` cells starting at `start`, or `None` if any of them leaves the board.
    pub fn walk(self, start: Coord2, len: usize, bounds: Coord2) -> Option<Vec<Coord2>> {
        if !in_bounds(start, bounds) {
            return None;
        }
        let mut cells = Vec::with_capacity(len);
        let mut current = start;
        for i in 0..len {
            if i > 0 {
                current = self.step(current, bounds)?;
            }
            cells.push(current);
        }
        Some(cells)
    }

    /// Direction leading from `from` to `to`, if both lie on a common line.
    pub fn between(from: Coord2, to: Coord2) -> Option<Direction> {
        let d_row = isize::from(to.0) - isize::from(from.0);
        let d_col = isize::from(to.1) - isize::from(from.1);
        if d_row == 0 && d_col == 0 {
            return None;
        }
        if d_row != 0 && d_col != 0 && d_row.abs() != d_col.abs() {
            return None;
        }
        let unit = (d_row.signum(), d_col.signum());
        Self::ALL.into_iter().find(|dir| dir.delta() == unit)
    }
}

const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = delta;
    let (max_row, max_col) = bounds;

    let next_row = row.checked_add_signed(d_row.try_into().ok()?)?;
    if next_row >= max_row {
        return None;
    }

    let next_col = col.checked_add_signed(d_col.try_into().ok()?)?;
    if next_col >= max_col {
        return None;
    }

    Some((next_row, next_col))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_has_three_neighbors() {
        let board: Array2<bool> = Array2::default((10, 10));
        let neighbors: Vec<_> = board.iter_neighbors((0, 0)).collect();
        assert_eq!(neighbors, vec![(0, 1), (1, 0), (1, 1)]);
        assert_eq!(board.iter_neighbors((5, 5)).count(), 8);
    }

    #[test]
    fn walk_stops_at_the_edge() {
        assert_eq!(
            Direction::DownRight.walk((0, 0), 3, (4, 4)),
            Some(vec![(0, 0), (1, 1), (2, 2)])
        );
        assert_eq!(Direction::Left.walk((0, 1), 3, (4, 4)), None);
        assert_eq!(Direction::Right.walk((0, 0), 4, (4, 4)).map(|c| c.len()), Some(4));
    }

    #[test]
    fn perpendicular_directions() {
        assert!(Direction::Right.is_perpendicular_to(Direction::Down));
        assert!(Direction::DownRight.is_perpendicular_to(Direction::DownLeft));
        assert!(!Direction::Right.is_perpendicular_to(Direction::Left));
        assert!(!Direction::Right.is_perpendicular_to(Direction::DownRight));
    }

    #[test]
    fn direction_between_aligned_cells() {
        assert_eq!(Direction::between((2, 2), (2, 5)), Some(Direction::Right));
        assert_eq!(Direction::between((4, 4), (1, 1)), Some(Direction::UpLeft));
        assert_eq!(Direction::between((0, 0), (1, 2)), None);
        assert_eq!(Direction::between((3, 3), (3, 3)), None);
    }
}
