//! Row visitation order of the Setup phase
//!
//! Each new row is built from the row written just before it (`prev`) and
//! one earlier row (`rowa`). `rowa` cycles through a window of rows that
//! doubles every time it wraps to 0, with a step that alternates between
//! `window + 1` and `window - 1`. Since `rowa < window <= row`, no row is
//! read before it has been written.

/// One Setup step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupStep {
    /// Row being written
    pub row: usize,
    /// Row written in the previous step
    pub prev: usize,
    /// Earlier row duplexed alongside `prev` and updated in place
    pub rowa: usize,
}

/// Iterator over the Setup steps for rows `2..rows`
#[derive(Debug, Clone)]
pub struct SetupSchedule {
    rows: usize,
    row: usize,
    prev: usize,
    rowa: usize,
    step: usize,
    window: usize,
    gap: isize,
}

impl SetupSchedule {
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            row: 2,
            prev: 1,
            rowa: 0,
            step: 1,
            window: 2,
            gap: 1,
        }
    }

    /// Last row written; Wandering starts from it
    pub fn prev(&self) -> usize {
        self.prev
    }

    /// Current `rowa`; the wrap-up reads it when there are no Wandering passes
    pub fn rowa(&self) -> usize {
        self.rowa
    }
}

impl Iterator for SetupSchedule {
    type Item = SetupStep;

    fn next(&mut self) -> Option<SetupStep> {
        if self.row >= self.rows {
            return None;
        }
        let current = SetupStep {
            row: self.row,
            prev: self.prev,
            rowa: self.rowa,
        };

        self.rowa = (self.rowa + self.step) & (self.window - 1);
        self.prev = self.row;
        self.row += 1;
        if self.rowa == 0 {
            self.step = self.window.wrapping_add_signed(self.gap);
            self.window *= 2;
            self.gap = -self.gap;
        }

        Some(current)
    }
}
