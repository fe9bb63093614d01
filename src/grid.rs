use crate::error::SimError;

/// Smallest grid that still has one interior cell inside the border ring
pub const MIN_DIMENSION: usize = 3;

/// State of a single tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Unburned,
    Burning,
    Burnt,
}

impl CellState {
    pub fn name(&self) -> &str {
        match self {
            CellState::Unburned => "Unburned",
            CellState::Burning => "Burning",
            CellState::Burnt => "Burnt",
        }
    }
}

/// Number of cells in each state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridCounts {
    pub unburned: usize,
    pub burning: usize,
    pub burnt: usize,
}

/// Double-buffered forest grid.
///
/// `current` is what neighbours and renderers see. `next` only receives staged
/// values during a tick and becomes visible on [`Grid::commit`]. Outside a tick
/// both buffers are identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    current: Vec<CellState>,
    next: Vec<CellState>,
    ignition: (usize, usize),
}

impl Grid {
    /// Build a fresh grid: Burnt border ring, one Burning ignition cell,
    /// everything else Unburned.
    pub fn initialize(
        width: usize,
        height: usize,
        ignition_x: usize,
        ignition_y: usize,
    ) -> Result<Self, SimError> {
        if width < MIN_DIMENSION || height < MIN_DIMENSION {
            return Err(SimError::InvalidConfiguration { width, height });
        }

        let mut grid = Self {
            width,
            height,
            current: vec![CellState::Unburned; width * height],
            next: Vec::new(),
            ignition: (ignition_x, ignition_y),
        };
        assert!(
            grid.is_interior(ignition_x, ignition_y),
            "ignition point ({ignition_x}, {ignition_y}) is not inside the {width}x{height} interior"
        );

        for y in 0..height {
            for x in 0..width {
                let state = if grid.is_border(x, y) {
                    CellState::Burnt
                } else if (x, y) == grid.ignition {
                    CellState::Burning
                } else {
                    CellState::Unburned
                };
                let idx = grid.index(x, y);
                grid.current[idx] = state;
            }
        }
        grid.next = grid.current.clone();
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Coordinate of the cell that started burning
    pub fn ignition(&self) -> (usize, usize) {
        self.ignition
    }

    /// Number of cells inside the border ring
    pub fn interior_len(&self) -> usize {
        (self.width - 2) * (self.height - 2)
    }

    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1
    }

    pub fn is_interior(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && !self.is_border(x, y)
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) is outside the {}x{} grid",
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// Committed state at (x, y). Panics outside the grid.
    pub fn get(&self, x: usize, y: usize) -> CellState {
        self.current[self.index(x, y)]
    }

    /// Staged state at (x, y). Panics outside the grid.
    #[cfg(test)]
    pub fn get_next(&self, x: usize, y: usize) -> CellState {
        self.next[self.index(x, y)]
    }

    /// Stage the state (x, y) takes on the next commit. Border cells ignore this.
    pub fn stage_next(&mut self, x: usize, y: usize, state: CellState) {
        let idx = self.index(x, y);
        if self.is_border(x, y) {
            return;
        }
        self.next[idx] = state;
    }

    /// Make every staged state visible. Border entries in `next` are never
    /// written, so copying the whole buffer only moves interior cells.
    pub fn commit(&mut self) {
        self.current.copy_from_slice(&self.next);
    }

    /// Iterate interior coordinates in row-major order
    #[cfg(test)]
    pub fn interior(&self) -> impl Iterator<Item = (usize, usize)> {
        let (width, height) = (self.width, self.height);
        (1..height - 1).flat_map(move |y| (1..width - 1).map(move |x| (x, y)))
    }

    /// Committed cells as rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> {
        self.current.chunks(self.width)
    }

    pub fn counts(&self) -> GridCounts {
        self.current
            .iter()
            .fold(GridCounts::default(), |mut counts, state| {
                match state {
                    CellState::Unburned => counts.unburned += 1,
                    CellState::Burning => counts.burning += 1,
                    CellState::Burnt => counts.burnt += 1,
                }
                counts
            })
    }

    /// True when nothing is burning, so further ticks change nothing
    pub fn is_burned_out(&self) -> bool {
        !self.current.contains(&CellState::Burning)
    }

    /// Overwrite a cell in both buffers, bypassing the tick discipline
    #[cfg(test)]
    pub fn set_for_test(&mut self, x: usize, y: usize, state: CellState) {
        let idx = self.index(x, y);
        self.current[idx] = state;
        self.next[idx] = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_initial_layout(grid: &Grid) {
        let (ix, iy) = grid.ignition();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let expected = if grid.is_border(x, y) {
                    CellState::Burnt
                } else if (x, y) == (ix, iy) {
                    CellState::Burning
                } else {
                    CellState::Unburned
                };
                assert_eq!(grid.get(x, y), expected, "cell ({x}, {y})");
                assert_eq!(grid.get_next(x, y), expected, "staged cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_initialize_layout_for_many_sizes() {
        for width in 3..9 {
            for height in 3..9 {
                let grid = Grid::initialize(width, height, width / 2, height / 2).unwrap();
                assert_initial_layout(&grid);

                let counts = grid.counts();
                assert_eq!(counts.burning, 1);
                assert_eq!(counts.unburned, grid.interior_len() - 1);
                assert_eq!(counts.burnt, width * height - grid.interior_len());
            }
        }
    }

    #[test]
    fn test_too_small_is_invalid_configuration() {
        assert_eq!(
            Grid::initialize(2, 10, 1, 1),
            Err(SimError::InvalidConfiguration { width: 2, height: 10 })
        );
        assert_eq!(
            Grid::initialize(10, 0, 1, 1),
            Err(SimError::InvalidConfiguration { width: 10, height: 0 })
        );
    }

    #[test]
    #[should_panic(expected = "not inside")]
    fn test_ignition_on_border_panics() {
        let _ = Grid::initialize(5, 5, 0, 2);
    }

    #[test]
    #[should_panic(expected = "outside the 4x4 grid")]
    fn test_out_of_range_read_panics() {
        let grid = Grid::initialize(4, 4, 1, 1).unwrap();
        grid.get(4, 0);
    }

    #[test]
    #[should_panic(expected = "outside the 4x4 grid")]
    fn test_out_of_range_stage_panics() {
        let mut grid = Grid::initialize(4, 4, 1, 1).unwrap();
        grid.stage_next(0, 7, CellState::Burning);
    }

    #[test]
    fn test_staging_is_invisible_until_commit() {
        let mut grid = Grid::initialize(5, 5, 2, 2).unwrap();
        grid.stage_next(1, 1, CellState::Burning);
        assert_eq!(grid.get(1, 1), CellState::Unburned);
        assert_eq!(grid.get_next(1, 1), CellState::Burning);

        grid.commit();
        assert_eq!(grid.get(1, 1), CellState::Burning);
    }

    #[test]
    fn test_staging_border_is_noop() {
        let mut grid = Grid::initialize(5, 5, 2, 2).unwrap();
        grid.stage_next(0, 0, CellState::Unburned);
        grid.stage_next(4, 2, CellState::Burning);
        grid.commit();
        assert_eq!(grid.get(0, 0), CellState::Burnt);
        assert_eq!(grid.get(4, 2), CellState::Burnt);
    }

    #[test]
    fn test_interior_iteration_skips_border() {
        let grid = Grid::initialize(5, 4, 1, 1).unwrap();
        let cells: Vec<_> = grid.interior().collect();
        assert_eq!(cells.len(), grid.interior_len());
        assert_eq!(cells.first(), Some(&(1, 1)));
        assert_eq!(cells.last(), Some(&(3, 2)));
        assert!(cells.iter().all(|&(x, y)| grid.is_interior(x, y)));
    }

    #[test]
    fn test_rows_are_row_major() {
        let grid = Grid::initialize(4, 3, 2, 1).unwrap();
        let rows: Vec<_> = grid.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][2], CellState::Burning);
        assert!(rows[0].iter().all(|s| *s == CellState::Burnt));
    }

    #[test]
    fn test_burned_out() {
        let mut grid = Grid::initialize(3, 3, 1, 1).unwrap();
        assert!(!grid.is_burned_out());
        grid.stage_next(1, 1, CellState::Burnt);
        grid.commit();
        assert!(grid.is_burned_out());
    }
}
