use super::types::{Bucket, Entity, NO_BUCKET, NO_ENTITY};
use tracing::trace;

/// Row-major cell table plus the arena of buckets that back occupied cells.
///
/// A cell index of `0` means no bucket has been allocated for it yet. Buckets
/// are never freed; an emptied bucket stays attached to its cell.
pub(crate) struct BucketStore {
    cell_size: f32,
    row_count: u32,
    col_count: u32,
    cells: Vec<u32>,
    buckets: Vec<Bucket>,
}

impl BucketStore {
    pub(crate) fn new(row_count: u32, col_count: u32, cell_size: f32) -> Self {
        Self {
            cell_size,
            row_count,
            col_count,
            cells: vec![NO_BUCKET; row_count as usize * col_count as usize],
            buckets: vec![Bucket::sentinel()],
        }
    }

    #[inline(always)]
    pub(crate) fn row_count(&self) -> u32 {
        self.row_count
    }

    #[inline(always)]
    pub(crate) fn col_count(&self) -> u32 {
        self.col_count
    }

    /// Number of buckets allocated so far.
    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len() - 1
    }

    /// `(row, col)` of the cell containing `(x, z)`. May lie outside the grid;
    /// `None` for non-finite coordinates.
    #[inline(always)]
    pub(crate) fn cell_of(&self, x: f32, z: f32) -> Option<(i64, i64)> {
        if !x.is_finite() || !z.is_finite() {
            return None;
        }
        let cell_size = self.cell_size as f64;
        Some((
            (z as f64 / cell_size).floor() as i64,
            (x as f64 / cell_size).floor() as i64,
        ))
    }

    #[inline(always)]
    pub(crate) fn in_bounds(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && row < self.row_count as i64 && col < self.col_count as i64
    }

    #[inline(always)]
    fn cell_index(&self, row: i64, col: i64) -> usize {
        row as usize * self.col_count as usize + col as usize
    }

    pub(crate) fn bucket_at(&self, row: i64, col: i64) -> Option<u32> {
        if !self.in_bounds(row, col) {
            return None;
        }
        let bucket = self.cells[self.cell_index(row, col)];
        (bucket != NO_BUCKET).then_some(bucket)
    }

    /// Returns the bucket for the cell, allocating it on first use.
    /// `None` when the cell lies outside the grid.
    pub(crate) fn bucket_at_or_create(&mut self, row: i64, col: i64) -> Option<u32> {
        if !self.in_bounds(row, col) {
            return None;
        }
        let index = self.cell_index(row, col);
        if self.cells[index] == NO_BUCKET {
            self.buckets
                .push(Bucket::new(row as u32, col as u32, self.cell_size));
            self.cells[index] = (self.buckets.len() - 1) as u32;
            trace!(row, col, "allocated bucket");
        }
        Some(self.cells[index])
    }

    #[inline(always)]
    pub(crate) fn bucket(&self, bucket: u32) -> &Bucket {
        &self.buckets[bucket as usize]
    }

    /// Pushes `entity` to the front of `bucket`.
    pub(crate) fn attach(&mut self, entities: &mut [Entity], bucket: u32, entity: u32) {
        let target = &mut self.buckets[bucket as usize];
        let old_head = target.head;
        target.head = entity;
        target.len += 1;
        if old_head != NO_ENTITY {
            entities[old_head as usize].prev = entity;
        }
        let entity = &mut entities[entity as usize];
        entity.bucket = bucket;
        entity.prev = NO_ENTITY;
        entity.next = old_head;
    }

    /// Unlinks `entity` from whatever bucket it sits in.
    pub(crate) fn detach(&mut self, entities: &mut [Entity], entity: u32) {
        let Entity {
            bucket, prev, next, ..
        } = entities[entity as usize];
        if bucket == NO_BUCKET {
            return;
        }
        if prev != NO_ENTITY {
            entities[prev as usize].next = next;
        } else {
            self.buckets[bucket as usize].head = next;
        }
        if next != NO_ENTITY {
            entities[next as usize].prev = prev;
        }
        self.buckets[bucket as usize].len -= 1;

        let entity = &mut entities[entity as usize];
        entity.bucket = NO_BUCKET;
        entity.prev = NO_ENTITY;
        entity.next = NO_ENTITY;
    }

    pub(crate) fn members<'a>(&self, bucket: u32, entities: &'a [Entity]) -> BucketIter<'a> {
        BucketIter {
            entities,
            cursor: self.buckets[bucket as usize].head,
        }
    }
}

pub(crate) struct BucketIter<'a> {
    entities: &'a [Entity],
    cursor: u32,
}

impl<'a> Iterator for BucketIter<'a> {
    type Item = &'a Entity;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NO_ENTITY {
            return None;
        }
        let entity = &self.entities[self.cursor as usize];
        self.cursor = entity.next;
        Some(entity)
    }
}
