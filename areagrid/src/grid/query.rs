use super::*;
use common::shapes::{Aabb, Circle, OrientedRect, Sector, Shape, ShapeEnum, HALF_SQRT2};

impl AreaGrid {
    pub fn search_circle(
        &self,
        x: f32,
        z: f32,
        radius: f32,
        entity_type: i32,
        limit: usize,
    ) -> Vec<u64> {
        self.query(
            &Circle::new(x, z, radius),
            QueryFilter::new(entity_type, limit),
        )
    }

    /// `half_height` extends along `(dir_x, dir_z)`, `half_width` across it.
    #[allow(clippy::too_many_arguments)]
    pub fn search_rect(
        &self,
        x: f32,
        z: f32,
        dir_x: f32,
        dir_z: f32,
        half_width: f32,
        half_height: f32,
        entity_type: i32,
        limit: usize,
    ) -> Vec<u64> {
        self.query(
            &OrientedRect::new(x, z, dir_x, dir_z, half_width, half_height),
            QueryFilter::new(entity_type, limit),
        )
    }

    /// `angle_degrees` is the full opening angle, centered on `(dir_x, dir_z)`.
    #[allow(clippy::too_many_arguments)]
    pub fn search_sector(
        &self,
        x: f32,
        z: f32,
        dir_x: f32,
        dir_z: f32,
        angle_degrees: f32,
        radius: f32,
        entity_type: i32,
        limit: usize,
    ) -> Vec<u64> {
        self.query(
            &Sector::from_degrees(x, z, dir_x, dir_z, angle_degrees, radius),
            QueryFilter::new(entity_type, limit),
        )
    }

    pub fn query<S: Shape + ?Sized>(&self, shape: &S, filter: QueryFilter) -> Vec<u64> {
        let mut found = Vec::new();
        self.query_with(shape, filter, |id| found.push(id));
        found
    }

    pub fn query_batch(&self, shapes: &[ShapeEnum], filter: QueryFilter) -> Vec<Vec<u64>> {
        shapes
            .iter()
            .map(|shape| self.query(shape, filter))
            .collect()
    }

    /// Calls `f` with every matching id and returns how many were accepted.
    ///
    /// Cells are visited row by row. Entities in cells that lie entirely
    /// inside the shape's safe circle skip the geometry test. Traversal ends
    /// as soon as `filter.limit` ids have been accepted.
    pub fn query_with<S, F>(&self, shape: &S, filter: QueryFilter, mut f: F) -> usize
    where
        S: Shape + ?Sized,
        F: FnMut(u64),
    {
        if filter.limit == 0 {
            return 0;
        }
        let Some(covering) = self.covering_range(&shape.bounding_box(), shape.reach()) else {
            return 0;
        };
        let safe = shape
            .safe_circle()
            .map_or(CellRange::EMPTY, |circle| self.safe_range(&circle));

        let entities = self.registry.entities();
        let mut accepted = 0;
        for row in covering.row_min..=covering.row_max {
            for col in covering.col_min..=covering.col_max {
                let Some(bucket) = self.buckets.bucket_at(row, col) else {
                    continue;
                };
                let inside = safe.contains(row, col);
                for entity in self.buckets.members(bucket, entities) {
                    if !entity.matches_type(filter.entity_type) {
                        continue;
                    }
                    if !inside && !shape.overlaps_circle(entity.x, entity.z, entity.radius) {
                        continue;
                    }
                    f(entity.id);
                    accepted += 1;
                    if accepted >= filter.limit {
                        return accepted;
                    }
                }
            }
        }
        accepted
    }

    /// Cells that may hold an entity overlapping `bounding_box`, clamped to
    /// the grid. The margin is `extra_check_grids` cells per unit of `reach`.
    /// `None` when nothing is left.
    pub(crate) fn covering_range(&self, bounding_box: &Aabb, reach: u32) -> Option<CellRange> {
        if !bounding_box.is_finite()
            || bounding_box.min_x > bounding_box.max_x
            || bounding_box.min_z > bounding_box.max_z
        {
            return None;
        }
        let cell_size = self.cell_size as f64;
        let extra = self.extra_check_grids as i64 * reach as i64;
        let cell = |v: f32| (v as f64 / cell_size).floor() as i64;
        CellRange {
            row_min: cell(bounding_box.min_z).saturating_sub(extra),
            row_max: cell(bounding_box.max_z).saturating_add(extra),
            col_min: cell(bounding_box.min_x).saturating_sub(extra),
            col_max: cell(bounding_box.max_x).saturating_add(extra),
        }
        .clamp(self.row_count(), self.col_count())
    }

    /// Cells lying entirely inside the square inscribed in `circle`.
    pub(crate) fn safe_range(&self, circle: &Circle) -> CellRange {
        let half = circle.radius as f64 * HALF_SQRT2 as f64;
        if !(half > 0.0) || !half.is_finite() || !circle.x.is_finite() || !circle.z.is_finite()
        {
            return CellRange::EMPTY;
        }
        let cell_size = self.cell_size as f64;
        let (x, z) = (circle.x as f64, circle.z as f64);
        CellRange {
            row_min: ((z - half) / cell_size).ceil() as i64,
            row_max: ((z + half) / cell_size).floor() as i64 - 1,
            col_min: ((x - half) / cell_size).ceil() as i64,
            col_max: ((x + half) / cell_size).floor() as i64 - 1,
        }
    }
}
