use crate::silhouette::Silhouette;
use crate::vec::Pos;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldState {
    Empty,
    Grain,
    Outline,
}

impl FieldState {
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldState::Empty)
    }
}

/// Collision surface for the grains. Every movement decision reads and
/// writes this grid; the display only ever sees rendered copies of it.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    width: i32,
    height: i32,
    fields: Vec<FieldState>,
}

impl OccupancyGrid {
    pub fn from_silhouette(silhouette: &Silhouette) -> Self {
        let (width, height) = (silhouette.width(), silhouette.height());
        let mut fields = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                fields.push(if silhouette.is_outline(x, y) {
                    FieldState::Outline
                } else {
                    FieldState::Empty
                });
            }
        }
        Self {
            width,
            height,
            fields,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn get_id_from_pos(&self, pos: Pos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        Some((pos.x + self.width * pos.y) as usize)
    }

    /// Off-grid cells behave as outline so grains can never leave the screen.
    pub fn get(&self, pos: Pos) -> FieldState {
        self.get_id_from_pos(pos)
            .map_or(FieldState::Outline, |id| self.fields[id])
    }

    pub fn is_empty(&self, pos: Pos) -> bool {
        self.get(pos).is_empty()
    }

    /// Marks an empty cell as holding a grain. Returns false if the cell was
    /// not empty.
    pub fn place_grain(&mut self, pos: Pos) -> bool {
        match self.get_id_from_pos(pos) {
            Some(id) if self.fields[id].is_empty() => {
                self.fields[id] = FieldState::Grain;
                true
            }
            _ => false,
        }
    }

    /// Moves a grain marker into an empty cell. Returns false, leaving the
    /// grid untouched, when `from` holds no grain or `to` is not empty.
    pub fn move_grain(&mut self, from: Pos, to: Pos) -> bool {
        match (self.get_id_from_pos(from), self.get_id_from_pos(to)) {
            (Some(id_a), Some(id_b))
                if self.fields[id_a] == FieldState::Grain && self.fields[id_b].is_empty() =>
            {
                self.fields.swap(id_a, id_b);
                true
            }
            _ => false,
        }
    }

    pub fn count(&self, state: FieldState) -> usize {
        self.fields.iter().filter(|&&f| f == state).count()
    }

    pub fn row(&self, y: i32) -> &[FieldState] {
        if y < 0 || y >= self.height {
            return &[];
        }
        let start = (self.width * y) as usize;
        &self.fields[start..start + self.width as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed() -> OccupancyGrid {
        let s = Silhouette::from_ascii("####\n#..#\n#..#\n####").unwrap();
        OccupancyGrid::from_silhouette(&s)
    }

    #[test]
    fn mirrors_silhouette() {
        let grid = boxed();
        assert_eq!(grid.count(FieldState::Outline), 12);
        assert_eq!(grid.count(FieldState::Empty), 4);
        assert_eq!(grid.get(Pos::new(-1, 2)), FieldState::Outline);
        assert_eq!(grid.get(Pos::new(1, 4)), FieldState::Outline);
        assert_eq!(grid.row(1), &[
            FieldState::Outline,
            FieldState::Empty,
            FieldState::Empty,
            FieldState::Outline,
        ]);
        assert!(grid.row(7).is_empty());
    }

    #[test]
    fn grains_occupy_and_move() {
        let mut grid = boxed();
        assert!(grid.place_grain(Pos::new(1, 1)));
        assert!(!grid.place_grain(Pos::new(1, 1)));
        assert!(!grid.place_grain(Pos::new(0, 0)));
        assert!(grid.move_grain(Pos::new(1, 1), Pos::new(2, 2)));
        assert_eq!(grid.get(Pos::new(1, 1)), FieldState::Empty);
        assert_eq!(grid.get(Pos::new(2, 2)), FieldState::Grain);
        assert_eq!(grid.count(FieldState::Grain), 1);
    }

    #[test]
    fn refused_moves_leave_the_grid_alone() {
        let mut grid = boxed();
        assert!(grid.place_grain(Pos::new(1, 1)));
        assert!(grid.place_grain(Pos::new(2, 1)));

        assert!(!grid.move_grain(Pos::new(1, 2), Pos::new(2, 2)));
        assert!(!grid.move_grain(Pos::new(1, 1), Pos::new(2, 1)));
        assert!(!grid.move_grain(Pos::new(1, 1), Pos::new(0, 1)));
        assert!(!grid.move_grain(Pos::new(1, 1), Pos::new(1, -1)));
        assert!(!grid.move_grain(Pos::new(-1, 0), Pos::new(1, 2)));

        assert_eq!(grid.get(Pos::new(1, 1)), FieldState::Grain);
        assert_eq!(grid.get(Pos::new(2, 1)), FieldState::Grain);
        assert_eq!(grid.count(FieldState::Grain), 2);
        assert_eq!(grid.count(FieldState::Empty), 2);
    }
}
