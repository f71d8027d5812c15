use super::*;

/// Random placements tried per ship before giving up on it.
pub const PLACEMENT_ATTEMPTS: usize = 100;

/// Cells a ship of `size` would cover, if they all fit on the board.
pub fn ship_cells(start: Coord2, orientation: Orientation, size: usize) -> Option<Vec<Coord2>> {
    orientation
        .direction()
        .walk(start, size, (BOARD_SIZE, BOARD_SIZE))
}

/// Whether `cells` are free and no ship sits on or next to any of them.
pub fn can_place(board: &Board, cells: &[Coord2]) -> bool {
    cells.iter().all(|&cell| {
        board[cell.to_nd_index()] == Cell::Empty
            && board
                .iter_neighbors(cell)
                .all(|neighbor| board[neighbor.to_nd_index()] != Cell::Ship)
    })
}

/// Places the standard fleet at random, ships never touching, not even diagonally.
///
/// Ships are placed largest first without backtracking, so an unlucky board can leave a ship
/// unplaced; such a ship is returned with no positions.
pub fn place_fleet<R: Rng + ?Sized>(rng: &mut R) -> Fleet {
    let mut board: Board = Array2::default((BOARD_SIZE, BOARD_SIZE).to_nd_index());
    let mut ships = Vec::with_capacity(FLEET.len());

    for kind in FLEET {
        let size = kind.size();
        let mut positions = Vec::new();
        for _ in 0..PLACEMENT_ATTEMPTS {
            let orientation = if rng.random_bool(0.5) {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let start = (
                rng.random_range(0..BOARD_SIZE),
                rng.random_range(0..BOARD_SIZE),
            );
            let Some(cells) = ship_cells(start, orientation, size) else {
                continue;
            };
            if can_place(&board, &cells) {
                positions = cells;
                break;
            }
        }

        if positions.is_empty() {
            log::warn!("could not place {kind:?} after {PLACEMENT_ATTEMPTS} attempts");
        }
        for &cell in &positions {
            board[cell.to_nd_index()] = Cell::Ship;
        }
        ships.push(Ship::new(kind, positions));
    }

    Fleet { board, ships }
}
