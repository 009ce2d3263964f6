use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AreaGridError {
    #[error("cell size must be positive (cell_size: {cell_size})")]
    InvalidCellSize { cell_size: i32 },
    #[error("grid bounds must be positive (bound_x: {bound_x}, bound_z: {bound_z})")]
    InvalidBounds { bound_x: i32, bound_z: i32 },
    #[error("registry capacity must be between 1 and {max} (max_entities: {max_entities})")]
    InvalidCapacity { max_entities: usize, max: usize },
    #[error("grid of {rows}x{cols} cells exceeds the configured limit of {max_cells} cells")]
    GridTooLarge {
        rows: u32,
        cols: u32,
        max_cells: usize,
    },
    #[error("entity {id} is already present")]
    DuplicateId { id: u64 },
    #[error("entity {id} is not present")]
    UnknownId { id: u64 },
    #[error("position ({x}, {z}) lies outside the grid")]
    OutOfBounds { x: f32, z: f32 },
    #[error(
        "entity values must be finite with a non-negative radius (x: {x}, z: {z}, radius: {radius})"
    )]
    InvalidEntity { x: f32, z: f32, radius: f32 },
    #[error("entity registry is full (capacity: {capacity})")]
    RegistryFull { capacity: usize },
}

pub type AreaGridResult<T> = Result<T, AreaGridError>;
