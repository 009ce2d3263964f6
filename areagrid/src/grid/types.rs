pub(crate) const NO_ENTITY: u32 = 0;
pub(crate) const NO_BUCKET: u32 = 0;

/// Result count used when the caller does not bound a query.
pub const DEFAULT_QUERY_LIMIT: usize = 0x7fff;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Entity {
    pub(crate) id: u64,
    pub(crate) x: f32,
    pub(crate) z: f32,
    pub(crate) radius: f32,
    pub(crate) entity_type: i32,
    pub(crate) bucket: u32,
    pub(crate) prev: u32,
    pub(crate) next: u32,
    pub(crate) next_free: u32,
    pub(crate) alive: bool,
}

impl Entity {
    pub(crate) fn sentinel() -> Self {
        Self {
            id: 0,
            x: 0.0,
            z: 0.0,
            radius: 0.0,
            entity_type: 0,
            bucket: NO_BUCKET,
            prev: NO_ENTITY,
            next: NO_ENTITY,
            next_free: NO_ENTITY,
            alive: false,
        }
    }

    pub(crate) fn new(id: u64) -> Self {
        Self {
            id,
            alive: true,
            ..Self::sentinel()
        }
    }

    /// The entity must carry every bit of `query_type`.
    #[inline(always)]
    pub(crate) fn matches_type(&self, query_type: i32) -> bool {
        (query_type & self.entity_type) == query_type
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Bucket {
    pub(crate) center_x: f32,
    pub(crate) center_z: f32,
    pub(crate) row: u32,
    pub(crate) col: u32,
    pub(crate) head: u32,
    pub(crate) len: u32,
}

impl Bucket {
    pub(crate) fn sentinel() -> Self {
        Self {
            center_x: 0.0,
            center_z: 0.0,
            row: 0,
            col: 0,
            head: NO_ENTITY,
            len: 0,
        }
    }

    pub(crate) fn new(row: u32, col: u32, cell_size: f32) -> Self {
        Self {
            center_x: (col as f32 + 0.5) * cell_size,
            center_z: (row as f32 + 0.5) * cell_size,
            row,
            col,
            head: NO_ENTITY,
            len: 0,
        }
    }
}

/// Snapshot of a live entity as returned by `AreaGrid::describe`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityRecord {
    pub id: u64,
    pub x: f32,
    pub z: f32,
    pub radius: f32,
    pub entity_type: i32,
    pub cell_row: i32,
    pub cell_col: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryFilter {
    /// Bits an entity's type mask must contain. `0` matches everything.
    pub entity_type: i32,
    /// Traversal stops once this many ids have been accepted.
    pub limit: usize,
}

impl QueryFilter {
    pub fn new(entity_type: i32, limit: usize) -> Self {
        Self { entity_type, limit }
    }

    pub fn with_type(entity_type: i32) -> Self {
        Self {
            entity_type,
            ..Self::default()
        }
    }
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            entity_type: 0,
            limit: DEFAULT_QUERY_LIMIT,
        }
    }
}

/// Inclusive rectangle of cell indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CellRange {
    pub(crate) row_min: i64,
    pub(crate) row_max: i64,
    pub(crate) col_min: i64,
    pub(crate) col_max: i64,
}

impl CellRange {
    pub(crate) const EMPTY: CellRange = CellRange {
        row_min: 0,
        row_max: -1,
        col_min: 0,
        col_max: -1,
    };

    #[inline(always)]
    pub(crate) fn is_empty(&self) -> bool {
        self.row_min > self.row_max || self.col_min > self.col_max
    }

    #[inline(always)]
    pub(crate) fn contains(&self, row: i64, col: i64) -> bool {
        row >= self.row_min && row <= self.row_max && col >= self.col_min && col <= self.col_max
    }

    /// Intersection with `[0, row_count) x [0, col_count)`.
    pub(crate) fn clamp(self, row_count: u32, col_count: u32) -> Option<CellRange> {
        let clamped = CellRange {
            row_min: self.row_min.max(0),
            row_max: self.row_max.min(row_count as i64 - 1),
            col_min: self.col_min.max(0),
            col_max: self.col_max.min(col_count as i64 - 1),
        };
        (!clamped.is_empty()).then_some(clamped)
    }
}
