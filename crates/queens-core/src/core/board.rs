use std::ops::{Index, IndexMut};

/// Smallest board size accepted by the command surface.
pub const MIN_BOARD_SIZE: usize = 2;

/// Largest board size whose masks fit the 32-bit frame encoding.
pub const MAX_BOARD_SIZE: usize = 29;

/// Largest board size accepted when the search is split into jobs.
pub const MAX_DISTRIBUTED_BOARD_SIZE: usize = 26;

/// Number of rows fixed by a job prefix.
pub const PREFIX_DEPTH: usize = 4;

/// Frames 0..=n+1 must be addressable: 0 is the exhausted sentinel and n+1 the
/// height reached by a complete placement.
pub const FRAME_CAPACITY: usize = MAX_BOARD_SIZE + 2;

/// One level of the search: the masks describing every queen placed above it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Frame {
    /// Candidate columns of the parent row that are still unexplored.
    pub siblings: u32,
    /// Columns not yet occupied.
    pub columns: u32,
    pub diag_pos: u32,
    pub diag_neg: u32,
}

impl Frame {
    /// The empty board of size `n`: every column free, no diagonal attacked.
    #[inline]
    pub fn root(n: usize) -> Self {
        Self {
            siblings: 0,
            columns: full_mask(n),
            diag_pos: 0,
            diag_neg: 0,
        }
    }

    /// Columns that are free and not attacked along either diagonal.
    #[inline]
    pub fn candidates(&self) -> u32 {
        self.columns & !(self.diag_pos | self.diag_neg)
    }

    /// The frame one row below after a queen is placed on the single-bit column `lsb`.
    #[inline]
    pub fn place(&self, lsb: u32, siblings: u32) -> Self {
        Self {
            siblings,
            columns: self.columns & !lsb,
            diag_pos: (self.diag_pos | lsb) << 1,
            diag_neg: (self.diag_neg | lsb) >> 1,
        }
    }
}

/// A mask with the low `n` bits set.
#[inline]
pub fn full_mask(n: usize) -> u32 {
    debug_assert!(n <= MAX_BOARD_SIZE);
    (1u32 << n) - 1
}

/// Fixed-capacity frame stack indexed by height.
///
/// A board is reused across sibling branches and across independent job runs;
/// [`Board::reset`] restores the empty state for a given board size.
#[derive(Debug, Clone)]
pub struct Board {
    frames: [Frame; FRAME_CAPACITY],
}

impl Board {
    pub fn new() -> Self {
        Self {
            frames: [Frame::default(); FRAME_CAPACITY],
        }
    }

    /// Clears every frame and installs the empty root at height 1.
    pub fn reset(&mut self, n: usize) {
        self.frames.fill(Frame::default());
        self.frames[1] = Frame::root(n);
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for Board {
    type Output = Frame;

    #[inline]
    fn index(&self, height: usize) -> &Frame {
        &self.frames[height]
    }
}

impl IndexMut<usize> for Board {
    #[inline]
    fn index_mut(&mut self, height: usize) -> &mut Frame {
        &mut self.frames[height]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_frame_has_every_column_free() {
        let root = Frame::root(8);
        assert_eq!(root.columns, 0xFF);
        assert_eq!(root.candidates(), 0xFF);
        assert_eq!(root.siblings, 0);
    }

    #[test]
    fn placing_a_queen_blocks_column_and_both_diagonals() {
        let root = Frame::root(8);
        let next = root.place(1 << 3, 0);

        assert_eq!(next.columns, 0xFF & !(1 << 3));
        assert_eq!(next.diag_pos, 1 << 4);
        assert_eq!(next.diag_neg, 1 << 2);
        assert_eq!(next.candidates() & (1 << 2 | 1 << 3 | 1 << 4), 0);
    }

    #[test]
    fn placement_on_the_widest_board_drops_shifted_out_bits() {
        let frame = Frame {
            siblings: 0,
            columns: full_mask(MAX_BOARD_SIZE),
            diag_pos: 1 << 31,
            diag_neg: 0,
        };

        let next = frame.place(1 << (MAX_BOARD_SIZE - 1), 0);

        assert_eq!(next.diag_pos, 1 << MAX_BOARD_SIZE);
        assert_eq!(next.diag_neg, 1 << (MAX_BOARD_SIZE - 2));
        assert_eq!(next.candidates() >> MAX_BOARD_SIZE, 0);
    }

    #[test]
    fn reset_clears_previous_search_state() {
        let mut board = Board::new();
        board[5] = Frame {
            siblings: 7,
            columns: 7,
            diag_pos: 7,
            diag_neg: 7,
        };

        board.reset(6);

        assert_eq!(board[1], Frame::root(6));
        assert!(board.frames().iter().skip(2).all(|f| *f == Frame::default()));
        assert_eq!(board[0], Frame::default());
    }
}
