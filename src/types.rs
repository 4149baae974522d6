use ndarray::Array2;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Converts coordinates into an `ndarray` index.
pub(crate) const fn ix((x, y): Coord2) -> [usize; 2] {
    [x as usize, y as usize]
}

pub const fn cell_count(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

const NEIGHBOR_OFFSETS: [(i16, i16); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Yields the in-bounds subset of the 8 coordinates surrounding `center`.
pub fn neighbors(center: Coord2, bounds: Coord2) -> impl Iterator<Item = Coord2> {
    let (x, y) = (center.0 as i16, center.1 as i16);
    let (max_x, max_y) = (bounds.0 as i16, bounds.1 as i16);
    NEIGHBOR_OFFSETS.iter().filter_map(move |&(dx, dy)| {
        let (nx, ny) = (x + dx, y + dy);
        if (0..max_x).contains(&nx) && (0..max_y).contains(&ny) {
            Some((nx as Coord, ny as Coord))
        } else {
            None
        }
    })
}

pub trait GridNeighbors {
    fn grid_bounds(&self) -> Coord2;

    fn iter_neighbors(&self, center: Coord2) -> impl Iterator<Item = Coord2> {
        neighbors(center, self.grid_bounds())
    }
}

impl<T> GridNeighbors for Array2<T> {
    fn grid_bounds(&self) -> Coord2 {
        let dim = self.dim();
        (
            dim.0.try_into().expect("grid width fits in Coord"),
            dim.1.try_into().expect("grid height fits in Coord"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(center: Coord2, bounds: Coord2) -> Vec<Coord2> {
        neighbors(center, bounds).collect()
    }

    #[test]
    fn corner_cell_has_three_neighbors() {
        assert_eq!(collect((0, 0), (3, 3)), vec![(1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn interior_cell_has_eight_neighbors() {
        assert_eq!(collect((1, 1), (3, 3)).len(), 8);
    }

    #[test]
    fn edge_cell_has_five_neighbors() {
        assert_eq!(collect((1, 0), (3, 3)).len(), 5);
    }

    #[test]
    fn single_cell_board_has_no_neighbors() {
        assert!(collect((0, 0), (1, 1)).is_empty());
    }
}
