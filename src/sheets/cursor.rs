/// First writable cell: row 1 and column 1 are left for sheet chrome.
pub const ORIGIN: (u32, u32) = (2, 2);

/// Movement directions understood by the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Right,
    Down,
    /// Down one row, back to the origin column.
    NewRow,
}

/// Tracks where the next cell write should land. 1-indexed, mutated in place
/// by the writer; not bounds-checked against the sheet extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub row: u32,
    pub col: u32,
}

impl Cursor {
    pub fn origin() -> Self {
        let (row, col) = ORIGIN;
        Self { row, col }
    }

    pub fn at(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    pub fn step(&mut self, step: Step) {
        match step {
            Step::Right => self.col += 1,
            Step::Down => self.row += 1,
            Step::NewRow => {
                self.row += 1;
                self.col = ORIGIN.1;
            }
        }
    }

    pub fn right(&mut self) {
        self.step(Step::Right);
    }

    pub fn down(&mut self) {
        self.step(Step::Down);
    }

    pub fn new_row(&mut self) {
        self.step(Step::NewRow);
    }
}
