//! Renewable resource field laid over the simulation grid.
//!
//! Cells are addressed `[x, y]` and stored x-major (`x * height + y`).

use crate::constants::{OUT_OF_SIGHT, SEARCH_JITTER};
use rand::Rng;

/// Integer grid coordinates `[x, y]`.
pub type Cell = [usize; 2];

#[derive(Clone, Debug)]
pub struct ResourceGrid {
    width: usize,
    height: usize,
    cap: i32,
    grow_rate: usize,
    data: Vec<i32>,
}

/// Round a coordinate to the nearest cell, ties to even, with `-0.0` folded into `0.0`.
fn snap_coord(value: f64) -> f64 {
    value.round_ties_even() + 0.0
}

impl ResourceGrid {
    pub fn new(width: usize, height: usize, initial: i32, cap: i32, grow_rate: usize) -> Self {
        assert!(width > 0, "width must be positive");
        assert!(height > 0, "height must be positive");
        Self {
            width,
            height,
            cap,
            grow_rate,
            data: vec![initial; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cap(&self) -> i32 {
        self.cap
    }

    pub fn grow_rate(&self) -> usize {
        self.grow_rate
    }

    pub fn data(&self) -> &[i32] {
        &self.data
    }

    /// Sum of all cell quantities. Negative cells count negatively.
    pub fn total(&self) -> i64 {
        self.data.iter().map(|&q| i64::from(q)).sum()
    }

    /// Snap `position` to its nearest cell and report whether that cell is on the grid.
    ///
    /// Pure: the caller decides whether to commit the snapped position.
    pub fn check_position(&self, position: [f64; 2]) -> (bool, [f64; 2]) {
        let snapped = [snap_coord(position[0]), snap_coord(position[1])];
        let valid = snapped[0] >= 0.0
            && snapped[1] >= 0.0
            && snapped[0] < self.width as f64
            && snapped[1] < self.height as f64;
        (valid, snapped)
    }

    pub fn is_in_bounds(&self, position: [f64; 2]) -> bool {
        self.check_position(position).0
    }

    /// Cell nearest to `position`, if it lies on the grid.
    pub fn cell_of(&self, position: [f64; 2]) -> Option<Cell> {
        match self.check_position(position) {
            (true, [x, y]) => Some([x as usize, y as usize]),
            (false, _) => None,
        }
    }

    pub fn get(&self, cell: Cell) -> i32 {
        self.data[self.index(cell)]
    }

    pub fn set(&mut self, cell: Cell, value: i32) {
        let idx = self.index(cell);
        self.data[idx] = value;
    }

    /// Resource at the cell nearest to `position`; off-grid positions read as empty.
    pub fn quantity_at(&self, position: [f64; 2]) -> i32 {
        self.cell_of(position).map_or(0, |cell| self.get(cell))
    }

    /// Subtract `amount` from the cell nearest to `position`.
    ///
    /// The result is not clamped: repeated depletion drives a cell negative.
    pub fn deplete(&mut self, position: [f64; 2], amount: i32) {
        if let Some(cell) = self.cell_of(position) {
            let idx = self.index(cell);
            self.data[idx] -= amount;
        }
    }

    /// Uniformly random on-grid cell.
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Cell {
        [
            rng.random_range(0..self.width),
            rng.random_range(0..self.height),
        ]
    }

    /// Pick `grow_rate` cells with replacement and add one unit to each that is below the cap.
    pub fn grow<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for _ in 0..self.grow_rate {
            let cell = self.random_cell(rng);
            let idx = self.index(cell);
            if self.data[idx] < self.cap {
                self.data[idx] += 1;
            }
        }
    }

    /// Find the richest cell within Euclidean distance `vision` of `position`.
    ///
    /// The search runs over a `(2 * vision + 1)` square window of a zero-padded
    /// frame, so cells past the grid edge read as empty. Window cells outside the
    /// vision circle are set to [`OUT_OF_SIGHT`]. If no candidate holds a positive
    /// quantity the search returns `None` without consuming randomness; otherwise
    /// every window cell receives independent jitter in `[0, SEARCH_JITTER)` and
    /// the first maximum wins.
    pub fn locate_best_nearby<R: Rng + ?Sized>(
        &self,
        position: [f64; 2],
        vision: u32,
        rng: &mut R,
    ) -> Option<Cell> {
        let [cx, cy] = self.cell_of(position)?;
        let (cx, cy) = (cx as i64, cy as i64);
        let radius = i64::from(vision);
        let side = 2 * vision as usize + 1;

        let mut window = self.search_window(cx, cy, radius);
        if window.iter().all(|&q| q <= 0.0) {
            return None;
        }

        let mut best_idx = 0;
        let mut best_value = f64::NEG_INFINITY;
        for (idx, value) in window.iter_mut().enumerate() {
            *value += SEARCH_JITTER * rng.random::<f64>();
            if *value > best_value {
                best_value = *value;
                best_idx = idx;
            }
        }

        let dx = (best_idx / side) as i64 - radius;
        let dy = (best_idx % side) as i64 - radius;
        let x = usize::try_from(cx + dx).ok()?;
        let y = usize::try_from(cy + dy).ok()?;
        Some([x, y])
    }

    fn search_window(&self, cx: i64, cy: i64, radius: i64) -> Vec<f64> {
        let r_sq = radius * radius;
        let side = (2 * radius + 1) as usize;
        let mut window = Vec::with_capacity(side * side);
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                let value = if dx * dx + dy * dy > r_sq {
                    OUT_OF_SIGHT
                } else {
                    f64::from(self.padded_get(cx + dx, cy + dy))
                };
                window.push(value);
            }
        }
        window
    }

    fn padded_get(&self, x: i64, y: i64) -> i32 {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) if x < self.width && y < self.height => self.get([x, y]),
            _ => 0,
        }
    }

    fn index(&self, cell: Cell) -> usize {
        cell[0] * self.height + cell[1]
    }
}
