use super::types::{Entity, NO_BUCKET, NO_ENTITY};
use fxhash::hash64;

const NO_SLOT: u32 = u32::MAX;

#[derive(Clone, Copy, Debug)]
struct Slot {
    id: u64,
    entity: u32,
    next: u32,
}

impl Slot {
    const EMPTY: Slot = Slot {
        id: 0,
        entity: NO_ENTITY,
        next: NO_SLOT,
    };

    #[inline(always)]
    fn is_empty(&self) -> bool {
        self.entity == NO_ENTITY
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RegistryError {
    Duplicate,
    Full,
}

/// Id -> entity table with chained scatter over a fixed slot array.
///
/// Every id hashes to a main position. A key whose main position is taken by
/// a key from another chain evicts that occupant to a free slot; a key whose
/// main position holds a member of its own chain is linked in right after the
/// head. Each chain therefore starts at its main position and only holds ids
/// sharing that main position. Free slots are found by walking `last_free`
/// downwards; every slot at or above `last_free` is occupied.
///
/// The registry also owns the entity arena. Handle `0` is a sentinel.
pub(crate) struct Registry {
    slots: Vec<Slot>,
    mask: usize,
    last_free: usize,
    entities: Vec<Entity>,
    free_entity: u32,
    len: usize,
}

impl Registry {
    pub(crate) fn with_capacity(max_entities: usize) -> Self {
        let size = max_entities.max(1).next_power_of_two();
        let mut entities = Vec::with_capacity(size.min(1 << 20) + 1);
        entities.push(Entity::sentinel());
        Self {
            slots: vec![Slot::EMPTY; size],
            mask: size - 1,
            last_free: size,
            entities,
            free_entity: NO_ENTITY,
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    fn main_position(&self, id: u64) -> usize {
        (hash64(&id) as usize) & self.mask
    }

    fn find_slot(&self, id: u64) -> Option<usize> {
        let mut pos = self.main_position(id);
        loop {
            let slot = &self.slots[pos];
            if !slot.is_empty() && slot.id == id {
                return Some(pos);
            }
            if slot.next == NO_SLOT {
                return None;
            }
            pos = slot.next as usize;
        }
    }

    pub(crate) fn lookup(&self, id: u64) -> Option<u32> {
        self.find_slot(id).map(|pos| self.slots[pos].entity)
    }

    fn get_free_pos(&mut self) -> Option<usize> {
        while self.last_free > 0 {
            self.last_free -= 1;
            if self.slots[self.last_free].is_empty() {
                return Some(self.last_free);
            }
        }
        None
    }

    fn free_slot(&mut self, pos: usize) {
        self.slots[pos] = Slot::EMPTY;
        if pos >= self.last_free {
            self.last_free = pos + 1;
        }
    }

    /// Allocates a fresh entity for `id` and returns its handle.
    pub(crate) fn insert(&mut self, id: u64) -> Result<u32, RegistryError> {
        if self.find_slot(id).is_some() {
            return Err(RegistryError::Duplicate);
        }

        let main = self.main_position(id);
        let mut target = main;
        if !self.slots[main].is_empty() {
            let free = self.get_free_pos().ok_or(RegistryError::Full)?;
            let occupant_main = self.main_position(self.slots[main].id);
            if occupant_main != main {
                let mut prev = occupant_main;
                while self.slots[prev].next as usize != main {
                    debug_assert!(self.slots[prev].next != NO_SLOT, "broken slot chain");
                    prev = self.slots[prev].next as usize;
                }
                self.slots[prev].next = free as u32;
                self.slots[free] = self.slots[main];
                self.slots[main] = Slot::EMPTY;
            } else {
                self.slots[free].next = self.slots[main].next;
                self.slots[main].next = free as u32;
                target = free;
            }
        }

        let handle = self.alloc_entity(id);
        let slot = &mut self.slots[target];
        slot.id = id;
        slot.entity = handle;
        self.len += 1;
        Ok(handle)
    }

    /// Unlinks `id` and releases its entity. The returned copy is the last
    /// state the entity had; its handle may be reused by the next insert.
    pub(crate) fn remove(&mut self, id: u64) -> Option<Entity> {
        let mut prev = None;
        let mut pos = self.main_position(id);
        loop {
            let slot = &self.slots[pos];
            if !slot.is_empty() && slot.id == id {
                break;
            }
            if slot.next == NO_SLOT {
                return None;
            }
            prev = Some(pos);
            pos = slot.next as usize;
        }

        let slot = self.slots[pos];
        match prev {
            Some(prev) => {
                self.slots[prev].next = slot.next;
                self.free_slot(pos);
            }
            // Chain head: pull the successor into the main position.
            None if slot.next != NO_SLOT => {
                let next = slot.next as usize;
                self.slots[pos] = self.slots[next];
                self.free_slot(next);
            }
            None => self.free_slot(pos),
        }
        self.len -= 1;
        Some(self.release_entity(slot.entity))
    }

    fn alloc_entity(&mut self, id: u64) -> u32 {
        let entity = Entity::new(id);
        if self.free_entity != NO_ENTITY {
            let handle = self.free_entity;
            self.free_entity = self.entities[handle as usize].next_free;
            self.entities[handle as usize] = entity;
            handle
        } else {
            self.entities.push(entity);
            (self.entities.len() - 1) as u32
        }
    }

    fn release_entity(&mut self, handle: u32) -> Entity {
        let removed = self.entities[handle as usize];
        let entity = &mut self.entities[handle as usize];
        entity.alive = false;
        entity.bucket = NO_BUCKET;
        entity.prev = NO_ENTITY;
        entity.next = NO_ENTITY;
        entity.next_free = self.free_entity;
        self.free_entity = handle;
        removed
    }

    #[inline(always)]
    pub(crate) fn entity(&self, handle: u32) -> &Entity {
        &self.entities[handle as usize]
    }

    #[inline(always)]
    pub(crate) fn entity_mut(&mut self, handle: u32) -> &mut Entity {
        &mut self.entities[handle as usize]
    }

    #[inline(always)]
    pub(crate) fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[inline(always)]
    pub(crate) fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().skip(1).filter(|entity| entity.alive)
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        let mut reachable = 0usize;
        for (pos, slot) in self.slots.iter().enumerate() {
            if slot.is_empty() {
                assert_eq!(slot.next, NO_SLOT, "empty slot {} keeps a link", pos);
                continue;
            }
            let main = self.main_position(slot.id);
            if main == pos {
                let mut cursor = pos;
                loop {
                    let member = &self.slots[cursor];
                    assert_eq!(
                        self.main_position(member.id),
                        main,
                        "chain at {} holds a foreign id",
                        main
                    );
                    reachable += 1;
                    if member.next == NO_SLOT {
                        break;
                    }
                    cursor = member.next as usize;
                }
            }
            let entity = self.entity(slot.entity);
            assert!(entity.alive, "slot {} points at a dead entity", pos);
            assert_eq!(entity.id, slot.id);
        }
        assert_eq!(reachable, self.len, "chains do not cover the live set");
        for pos in self.last_free..self.slots.len() {
            assert!(!self.slots[pos].is_empty(), "free slot {} above cursor", pos);
        }
    }
}
