mod buckets;
mod config;
mod core;
mod query;
mod registry;
mod types;

pub use config::Config;
pub use types::{EntityRecord, QueryFilter, DEFAULT_QUERY_LIMIT};

use buckets::BucketStore;
use registry::{Registry, RegistryError};
use types::{CellRange, Entity};

/// Uniform grid over `[0, bound_x] x [0, bound_z]` that indexes circular
/// entities by the cell holding their center.
///
/// Rows follow `z`, columns follow `x`. Entities wider than a cell raise
/// `extra_check_grids`, the margin every query adds around its covering
/// cells. The margin only ever grows.
pub struct AreaGrid {
    bound_x: i32,
    bound_z: i32,
    cell_size: i32,
    extra_check_grids: u32,
    registry: Registry,
    buckets: BucketStore,
}
