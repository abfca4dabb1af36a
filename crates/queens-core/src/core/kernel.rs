use super::board::{Board, Frame};
use std::ops::Range;

/// Counts the complete placements reachable from `height` with candidate mask `row`.
///
/// The board must already hold valid frames for heights `1..=height`. The
/// traversal is an explicit depth-first walk over the frame stack: descending
/// consumes the lowest candidate bit and records the untried ones in the child
/// frame, backtracking restores them. A placement is complete when the walk
/// backs out of height `n + 1` into height `n`.
pub fn count_from(board: &mut Board, n: usize, height: usize, row: u32) -> u64 {
    walk(board, n, height, row, |_, _| {})
}

/// The walk behind [`count_from`]; `on_descend` sees each frame as it is pushed.
#[inline(always)]
fn walk<F>(board: &mut Board, n: usize, mut height: usize, mut row: u32, mut on_descend: F) -> u64
where
    F: FnMut(usize, &Frame),
{
    let mut solutions = 0;

    loop {
        if row != 0 {
            let lsb = row & row.wrapping_neg();
            let next = board[height].place(lsb, row & !lsb);
            board[height + 1] = next;
            on_descend(height + 1, &next);
            row = next.candidates();
            height += 1;
        } else {
            row = board[height].siblings;
            height -= 1;

            if height == 0 {
                break;
            }
            if height == n {
                solutions += 1;
            }
        }
    }

    solutions
}

/// Places one queen per row on rows `1..=columns.len()` and returns the
/// candidate mask of the following row.
///
/// Returns `None` if a column lies off the board or is attacked by an earlier
/// queen. On success the board holds frames up to height `columns.len() + 1`,
/// ready for [`count_from`].
pub fn seed_prefix(board: &mut Board, n: usize, columns: &[usize]) -> Option<u32> {
    board.reset(n);

    for (offset, &column) in columns.iter().enumerate() {
        if column >= n {
            return None;
        }
        let height = offset + 1;
        let lsb = 1u32 << column;
        let frame = board[height];

        if frame.columns & lsb == 0 || (frame.diag_pos | frame.diag_neg) & lsb != 0 {
            return None;
        }
        board[height + 1] = frame.place(lsb, 0);
    }

    Some(board[columns.len() + 1].candidates())
}

/// Row-1 columns that need exploring; the rest are mirror images.
#[inline]
pub fn first_row_columns(n: usize) -> Range<usize> {
    0..n.div_ceil(2)
}

/// Whether a row-1 column has a distinct mirror image on the other half of the board.
#[inline]
pub fn is_mirrored(n: usize, column: usize) -> bool {
    column < n / 2
}

/// Multiplier applied to counts rooted at a row-1 column.
#[inline]
pub fn mirror_weight(n: usize, column: usize) -> u64 {
    if is_mirrored(n, column) { 2 } else { 1 }
}

/// Counts placements whose row-1 queen sits on `column`.
pub fn count_with_first_column(board: &mut Board, n: usize, column: usize) -> u64 {
    board.reset(n);
    count_from(board, n, 1, 1u32 << column)
}

/// Counts every solution of an `n`-queens board on the calling thread.
pub fn count_solutions(n: usize) -> u64 {
    let mut board = Board::new();
    first_row_columns(n)
        .map(|column| count_with_first_column(&mut board, n, column) * mirror_weight(n, column))
        .sum()
}
