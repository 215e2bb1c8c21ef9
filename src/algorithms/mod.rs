pub mod a_star;
pub mod breadth_first;
pub mod common;
pub mod ida_star;

pub use common::{Algorithm, FinderOptions, Heuristic, PathFinder};
