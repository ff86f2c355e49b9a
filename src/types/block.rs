use cauchy::Scalar;
use ndarray::{Array2, ArrayView2, CowArray, Ix2};

use crate::error::{Error, Result};

/// Single cell of a block grid
///
/// A `Present` block is copied verbatim into the assembled matrix. A `Zero` block stands for
/// a block of zeros whose size is inferred from the other blocks in its block-row and
/// block-column, and therefore places no constraint on the shape of the assembled matrix.
#[derive(Debug, Clone)]
pub enum Block<'a, A> {
    Present(CowArray<'a, A, Ix2>),
    Zero,
}

impl<'a, A> Block<'a, A> {
    /// Shape of the block, or `None` for a zero block of inferred size
    pub fn shape(&self) -> Option<(usize, usize)> {
        match self {
            Block::Present(data) => Some(data.dim()),
            Block::Zero => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Block::Zero)
    }
}

impl<'a, A> Default for Block<'a, A> {
    fn default() -> Self {
        Block::Zero
    }
}

impl<'a, A> From<Array2<A>> for Block<'a, A> {
    fn from(data: Array2<A>) -> Self {
        Block::Present(CowArray::from(data))
    }
}

impl<'a, A> From<ArrayView2<'a, A>> for Block<'a, A> {
    fn from(data: ArrayView2<'a, A>) -> Self {
        Block::Present(CowArray::from(data))
    }
}

/// Rectangular grid of blocks
///
/// A freshly created grid holds only zero blocks. Blocks are placed with `BlockGrid::set`
/// and the dense matrix is produced by `BlockGrid::assemble`. Every row of a grid built by
/// `BlockGrid::new` has the same number of cells, while a grid built from explicit rows is
/// checked for that when it is assembled.
#[derive(Debug, Clone)]
pub struct BlockGrid<'a, A> {
    cells: Vec<Vec<Block<'a, A>>>,
}

impl<'a, A> BlockGrid<'a, A> {
    pub fn new(rows: usize, cols: usize) -> Self {
        let cells = (0..rows)
            .map(|_| (0..cols).map(|_| Block::Zero).collect())
            .collect();
        BlockGrid { cells }
    }

    pub fn from_rows(cells: Vec<Vec<Block<'a, A>>>) -> Self {
        BlockGrid { cells }
    }

    /// Number of block-rows
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Number of block-columns, as given by the first block-row
    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Block<'a, A>> {
        self.cells.get(row).and_then(|cells| cells.get(col))
    }

    /// Places `block` at block-index (`row`, `col`), returning the block previously stored there
    pub fn set<B: Into<Block<'a, A>>>(
        &mut self,
        row: usize,
        col: usize,
        block: B,
    ) -> Result<Block<'a, A>> {
        let (rows, cols) = (self.rows(), self.cols());
        let cell = self
            .cells
            .get_mut(row)
            .and_then(|cells| cells.get_mut(col))
            .ok_or(Error::BlockIndexOutOfBounds {
                row,
                col,
                rows,
                cols,
            })?;
        Ok(std::mem::replace(cell, block.into()))
    }

    pub fn as_rows(&self) -> &[Vec<Block<'a, A>>] {
        &self.cells
    }
}

impl<'a, A: Scalar> BlockGrid<'a, A> {
    pub fn assemble(&self) -> Result<Array2<A>> {
        crate::assembly::assemble(&self.cells)
    }
}
