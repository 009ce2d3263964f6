use super::*;
use crate::error::{AreaGridError, AreaGridResult};
use tracing::{debug, trace, warn};

const MAX_REGISTRY_CAPACITY: usize = 1 << 31;

fn validate_entity(x: f32, z: f32, radius: f32) -> AreaGridResult<()> {
    if x.is_finite() && z.is_finite() && radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(AreaGridError::InvalidEntity { x, z, radius })
    }
}

impl AreaGrid {
    pub fn new(bound_x: i32, bound_z: i32, cell_size: i32) -> AreaGridResult<Self> {
        Self::new_with_config(bound_x, bound_z, cell_size, Config::default())
    }

    pub fn new_with_config(
        bound_x: i32,
        bound_z: i32,
        cell_size: i32,
        config: Config,
    ) -> AreaGridResult<Self> {
        if cell_size <= 0 {
            return Err(AreaGridError::InvalidCellSize { cell_size });
        }
        if bound_x <= 0 || bound_z <= 0 {
            return Err(AreaGridError::InvalidBounds { bound_x, bound_z });
        }
        if config.max_entities == 0 || config.max_entities > MAX_REGISTRY_CAPACITY {
            return Err(AreaGridError::InvalidCapacity {
                max_entities: config.max_entities,
                max: MAX_REGISTRY_CAPACITY,
            });
        }

        // The far edges get a cell of their own.
        let rows = (bound_z / cell_size) as u32 + 1;
        let cols = (bound_x / cell_size) as u32 + 1;
        let fits = (rows as usize)
            .checked_mul(cols as usize)
            .map_or(false, |cells| {
                cells <= config.max_cells && cells < u32::MAX as usize
            });
        if !fits {
            return Err(AreaGridError::GridTooLarge {
                rows,
                cols,
                max_cells: config.max_cells,
            });
        }

        debug!(
            bound_x,
            bound_z,
            cell_size,
            rows,
            cols,
            max_entities = config.max_entities,
            "created area grid"
        );
        Ok(Self {
            bound_x,
            bound_z,
            cell_size,
            extra_check_grids: 0,
            registry: Registry::with_capacity(config.max_entities),
            buckets: BucketStore::new(rows, cols, cell_size as f32),
        })
    }

    /// Cell of `(x, z)`, rejected when it falls outside the grid.
    fn locate(&self, x: f32, z: f32) -> AreaGridResult<(i64, i64)> {
        self.buckets
            .cell_of(x, z)
            .filter(|&(row, col)| self.buckets.in_bounds(row, col))
            .ok_or(AreaGridError::OutOfBounds { x, z })
    }

    pub fn try_insert(
        &mut self,
        id: u64,
        x: f32,
        z: f32,
        radius: f32,
        entity_type: i32,
    ) -> AreaGridResult<()> {
        validate_entity(x, z, radius)?;
        if self.registry.lookup(id).is_some() {
            return Err(AreaGridError::DuplicateId { id });
        }
        let (row, col) = self.locate(x, z)?;

        let handle = match self.registry.insert(id) {
            Ok(handle) => handle,
            Err(RegistryError::Duplicate) => return Err(AreaGridError::DuplicateId { id }),
            Err(RegistryError::Full) => {
                let capacity = self.registry.capacity();
                warn!(id, capacity, "entity registry is full");
                return Err(AreaGridError::RegistryFull { capacity });
            }
        };
        let bucket = match self.buckets.bucket_at_or_create(row, col) {
            Some(bucket) => bucket,
            None => {
                self.registry.remove(id);
                return Err(AreaGridError::OutOfBounds { x, z });
            }
        };

        let entity = self.registry.entity_mut(handle);
        entity.x = x;
        entity.z = z;
        entity.radius = radius;
        entity.entity_type = entity_type;
        self.buckets
            .attach(self.registry.entities_mut(), bucket, handle);
        self.widen_for_radius(radius);
        Ok(())
    }

    /// Adds a new entity. Returns `false`, leaving the grid untouched, when
    /// the id is taken, the values are invalid, the position lies outside
    /// the grid or the registry is full.
    pub fn insert(&mut self, id: u64, x: f32, z: f32, radius: f32, entity_type: i32) -> bool {
        match self.try_insert(id, x, z, radius, entity_type) {
            Ok(()) => true,
            Err(error) => {
                trace!(id, %error, "insert rejected");
                false
            }
        }
    }

    /// Moves an entity and optionally changes its radius. A rejected update
    /// leaves the entity exactly as it was.
    pub fn try_update(&mut self, id: u64, x: f32, z: f32, radius: Option<f32>) -> AreaGridResult<()> {
        let handle = self
            .registry
            .lookup(id)
            .ok_or(AreaGridError::UnknownId { id })?;
        let current = *self.registry.entity(handle);
        let radius = radius.unwrap_or(current.radius);
        validate_entity(x, z, radius)?;
        let (row, col) = self.locate(x, z)?;

        if self.buckets.bucket_at(row, col) != Some(current.bucket) {
            let bucket = self
                .buckets
                .bucket_at_or_create(row, col)
                .ok_or(AreaGridError::OutOfBounds { x, z })?;
            let entities = self.registry.entities_mut();
            self.buckets.detach(entities, handle);
            self.buckets.attach(entities, bucket, handle);
        }

        let entity = self.registry.entity_mut(handle);
        entity.x = x;
        entity.z = z;
        entity.radius = radius;
        self.widen_for_radius(radius);
        Ok(())
    }

    pub fn update(&mut self, id: u64, x: f32, z: f32, radius: Option<f32>) -> bool {
        match self.try_update(id, x, z, radius) {
            Ok(()) => true,
            Err(error) => {
                trace!(id, %error, "update rejected");
                false
            }
        }
    }

    /// Removes an entity. Returns `false` when the id is not present.
    pub fn delete(&mut self, id: u64) -> bool {
        let Some(handle) = self.registry.lookup(id) else {
            trace!(id, "delete of unknown entity");
            return false;
        };
        self.buckets.detach(self.registry.entities_mut(), handle);
        self.registry.remove(id).is_some()
    }

    pub fn describe(&self, id: u64) -> Option<EntityRecord> {
        let handle = self.registry.lookup(id)?;
        Some(self.record(self.registry.entity(handle)))
    }

    fn record(&self, entity: &Entity) -> EntityRecord {
        let bucket = self.buckets.bucket(entity.bucket);
        EntityRecord {
            id: entity.id,
            x: entity.x,
            z: entity.z,
            radius: entity.radius,
            entity_type: entity.entity_type,
            cell_row: bucket.row as i32,
            cell_col: bucket.col as i32,
        }
    }

    fn widen_for_radius(&mut self, radius: f32) {
        let cell_size = self.cell_size as f64;
        let radius = radius as f64;
        if radius <= self.extra_check_grids as f64 * cell_size {
            return;
        }
        let needed = (radius / cell_size).ceil() as u32;
        if needed > self.extra_check_grids {
            debug!(
                from = self.extra_check_grids,
                to = needed,
                radius,
                "widened query margin"
            );
            self.extra_check_grids = needed;
        }
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    pub fn contains(&self, id: u64) -> bool {
        self.registry.lookup(id).is_some()
    }

    /// Maximum number of live entities.
    pub fn capacity(&self) -> usize {
        self.registry.capacity()
    }

    /// Every live entity, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = EntityRecord> + '_ {
        self.registry.iter().map(|entity| self.record(entity))
    }

    /// Ids stored in one cell. Empty for cells outside the grid or cells
    /// that never held an entity.
    pub fn cell_entities(&self, row: i32, col: i32) -> Vec<u64> {
        let Some(bucket) = self.buckets.bucket_at(row as i64, col as i64) else {
            return Vec::new();
        };
        let mut ids = Vec::with_capacity(self.buckets.bucket(bucket).len as usize);
        ids.extend(
            self.buckets
                .members(bucket, self.registry.entities())
                .map(|entity| entity.id),
        );
        debug_assert_eq!(ids.len(), self.buckets.bucket(bucket).len as usize);
        ids
    }

    /// Midpoint `(x, z)` of an allocated cell. `None` until the cell has
    /// held an entity.
    pub fn cell_center(&self, row: i32, col: i32) -> Option<(f32, f32)> {
        let bucket = self.buckets.bucket_at(row as i64, col as i64)?;
        let bucket = self.buckets.bucket(bucket);
        Some((bucket.center_x, bucket.center_z))
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.bucket_count()
    }

    pub fn extra_check_grids(&self) -> u32 {
        self.extra_check_grids
    }

    pub fn row_count(&self) -> u32 {
        self.buckets.row_count()
    }

    pub fn col_count(&self) -> u32 {
        self.buckets.col_count()
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// `(bound_x, bound_z)` as given at construction.
    pub fn bounds(&self) -> (i32, i32) {
        (self.bound_x, self.bound_z)
    }
}
