//! Dense matrix assembly: block grids, block diagonals and Kronecker products.

pub mod block_matrix;
pub mod kronecker;

pub use block_matrix::{assemble, block_diag};
pub use kronecker::{kron, kron_eye};
