pub mod error;
pub mod grid;

pub use error::{AreaGridError, AreaGridResult};
