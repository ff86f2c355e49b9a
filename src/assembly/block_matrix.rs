//! Assembly of dense matrices out of grids of smaller blocks.
use cauchy::Scalar;
use log::trace;
use ndarray::{s, Array2, ArrayBase, Data, Ix2};

use crate::error::{BlockAxis, Error, Result};
use crate::types::Block;

/// Builds a dense matrix from a rectangular grid of blocks
///
/// The number of block-columns is given by the first block-row, and every other block-row
/// has to contain the same number of cells. The height of each block-row is fixed by the
/// first present block in it, and the width of each block-column by the first present block
/// in it. Every further present block has to agree with both. Zero blocks take whatever
/// size their block-row and block-column end up with; a block-row or block-column holding
/// only zero blocks has size zero. A present block constrains its block-row and block-column
/// even when it has no elements, so a present block of shape (0, k) fixes the height of its
/// block-row to zero; use `Block::Zero` for a cell that should not constrain anything.
///
/// The result is zero everywhere except where present blocks are copied in.
///
/// ```
/// use ndarray::{arr2, Array2};
/// use loclin::assembly::assemble;
/// use loclin::types::Block;
///
/// let grid = vec![
///     vec![Block::from(Array2::eye(2)), Block::Zero],
///     vec![Block::Zero, Block::from(arr2(&[[3.0]]))],
/// ];
/// let matrix = assemble(&grid).unwrap();
/// assert_eq!(matrix, arr2(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 3.0]]));
/// ```
pub fn assemble<A: Scalar>(grid: &[Vec<Block<'_, A>>]) -> Result<Array2<A>> {
    let (row_sizes, col_sizes) = block_sizes(grid)?;
    let rows: usize = row_sizes.iter().sum();
    let cols: usize = col_sizes.iter().sum();
    trace!(
        "assembling {}x{} matrix from block-rows {:?} and block-columns {:?}",
        rows,
        cols,
        row_sizes,
        col_sizes
    );

    let mut output = Array2::zeros((rows, cols));
    let mut row_offset = 0;
    for (cells, &height) in grid.iter().zip(&row_sizes) {
        let mut col_offset = 0;
        for (cell, &width) in cells.iter().zip(&col_sizes) {
            if let Block::Present(data) = cell {
                output
                    .slice_mut(s![row_offset..row_offset + height, col_offset..col_offset + width])
                    .assign(data);
            }
            col_offset += width;
        }
        row_offset += height;
    }
    Ok(output)
}

/// Infers the height of each block-row and the width of each block-column
fn block_sizes<A>(grid: &[Vec<Block<'_, A>>]) -> Result<(Vec<usize>, Vec<usize>)> {
    let expected_cols = grid.first().map_or(0, Vec::len);
    let mut row_sizes: Vec<Option<usize>> = vec![None; grid.len()];
    let mut col_sizes: Vec<Option<usize>> = vec![None; expected_cols];

    for (i, cells) in grid.iter().enumerate() {
        if cells.len() != expected_cols {
            return Err(Error::MalformedGrid {
                row: i,
                expected: expected_cols,
                actual: cells.len(),
            });
        }

        for (j, cell) in cells.iter().enumerate() {
            let shape = match cell.shape() {
                Some(shape) => shape,
                None => continue,
            };
            check_size(&mut row_sizes[i], shape.0, BlockAxis::Height, (i, j), shape)?;
            check_size(&mut col_sizes[j], shape.1, BlockAxis::Width, (i, j), shape)?;
        }
    }

    let unwrap_sizes = |sizes: Vec<Option<usize>>| -> Vec<usize> {
        sizes.into_iter().map(|size| size.unwrap_or(0)).collect()
    };
    Ok((unwrap_sizes(row_sizes), unwrap_sizes(col_sizes)))
}

fn check_size(
    known: &mut Option<usize>,
    size: usize,
    axis: BlockAxis,
    (row, col): (usize, usize),
    shape: (usize, usize),
) -> Result<()> {
    match *known {
        Some(expected) if expected != size => Err(Error::BlockShapeMismatch {
            row,
            col,
            shape,
            axis,
            expected,
        }),
        Some(_) => Ok(()),
        None => {
            *known = Some(size);
            Ok(())
        }
    }
}

/// Places the given blocks along the diagonal of an otherwise zero matrix
///
/// Blocks may have any shape, including empty ones, and the result has as many rows and
/// columns as all the blocks together.
pub fn block_diag<A, S>(blocks: &[ArrayBase<S, Ix2>]) -> Array2<A>
where
    A: Scalar,
    S: Data<Elem = A>,
{
    let rows: usize = blocks.iter().map(|block| block.nrows()).sum();
    let cols: usize = blocks.iter().map(|block| block.ncols()).sum();
    let mut output = Array2::zeros((rows, cols));
    let (mut row_offset, mut col_offset) = (0, 0);
    for block in blocks {
        let (height, width) = block.dim();
        output
            .slice_mut(s![row_offset..row_offset + height, col_offset..col_offset + width])
            .assign(block);
        row_offset += height;
        col_offset += width;
    }
    output
}
