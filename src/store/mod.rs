//! Pooled, index-linked object record store
//!
//! Records live in one contiguous pool and are threaded into singly linked
//! lists by slot index. Each octree node owns one such list via its head
//! index. Freed slots go onto a free list and are reused before the pool
//! grows.

use bytemuck::{Pod, Zeroable};

use crate::math::Aabb;

/// Slot capacity of a freshly created store
pub const INITIAL_CAPACITY: usize = 1024;

/// Sentinel index marking the end of a record list
pub const NIL: i32 = -1;

/// One pooled object record - exactly 32 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ObjectRecord {
    /// Object bounds as (min_x, min_y, min_z, max_x, max_y, max_z)
    pub bounds: [f32; 6],
    /// Caller-supplied object identifier
    pub id: i32,
    /// Index of the next record in the same list, or [`NIL`]
    pub next: i32,
}

/// Owned view of a record; the bounds are a value copy
#[derive(Clone, Copy, Debug)]
pub struct RecordView {
    pub bounds: Aabb,
    pub id: i32,
    pub next: i32,
}

/// Zero-copy view into the pool.
///
/// Valid until the next allocation; a grow moves the backing storage.
#[derive(Debug)]
pub struct RawRecord<'a> {
    pub bounds: &'a [f32; 6],
    pub id: i32,
    pub next: i32,
}

/// Growable pool of [`ObjectRecord`]s addressed by slot index.
pub struct RecordStore {
    records: Vec<ObjectRecord>,
    free_list: Vec<i32>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            records: Vec::with_capacity(INITIAL_CAPACITY),
            free_list: Vec::new(),
        }
    }

    /// Allocate a record at the front of the list rooted at `head`.
    ///
    /// Returns the new head (the allocated slot); its `next` points to the
    /// old head. Reuses a freed slot when one exists, otherwise appends,
    /// doubling the pool first when it is full.
    pub fn allocate(&mut self, head: i32, bounds: [f32; 6], id: i32) -> i32 {
        let record = ObjectRecord { bounds, id, next: head };
        if let Some(idx) = self.free_list.pop() {
            self.records[idx as usize] = record;
            return idx;
        }
        if self.records.len() == self.records.capacity() {
            let capacity = self.records.capacity();
            log::debug!("record store growing from {} to {} slots", capacity, capacity * 2);
            self.records.reserve_exact(capacity);
        }
        let idx = self.records.len() as i32;
        self.records.push(record);
        idx
    }

    /// Remove the first record with a matching `id` from the list rooted at
    /// `head` and return the (possibly unchanged) head.
    ///
    /// Interior matches are spliced out; a missing id leaves the list
    /// untouched. The freed slot becomes reusable immediately.
    pub fn free(&mut self, head: i32, id: i32) -> i32 {
        let mut prev = NIL;
        let mut cur = head;
        while cur != NIL {
            let record = self.records[cur as usize];
            if record.id == id {
                self.free_list.push(cur);
                if prev == NIL {
                    return record.next;
                }
                self.records[prev as usize].next = record.next;
                return head;
            }
            prev = cur;
            cur = record.next;
        }
        head
    }

    /// Number of records in the list rooted at `head`
    pub fn length(&self, head: i32) -> usize {
        let mut count = 0;
        let mut cur = head;
        while cur != NIL {
            count += 1;
            cur = self.records[cur as usize].next;
        }
        count
    }

    /// Read a record as an owned view
    pub fn get(&self, idx: i32) -> RecordView {
        let record = &self.records[idx as usize];
        RecordView {
            bounds: Aabb::from_bounds(&record.bounds),
            id: record.id,
            next: record.next,
        }
    }

    /// Read a record as a zero-copy view into the pool
    pub fn get_raw(&self, idx: i32) -> RawRecord<'_> {
        let record = &self.records[idx as usize];
        RawRecord {
            bounds: &record.bounds,
            id: record.id,
            next: record.next,
        }
    }

    /// Re-thread an existing record onto a different list
    pub(crate) fn set_next(&mut self, idx: i32, next: i32) {
        self.records[idx as usize].next = next;
    }

    /// Walk the list rooted at `head` front-to-back.
    ///
    /// The visitor returns `false` to stop early.
    pub fn traverse<F: FnMut(&ObjectRecord) -> bool>(&self, head: i32, mut visit: F) {
        let mut cur = head;
        while cur != NIL {
            let record = &self.records[cur as usize];
            if !visit(record) {
                return;
            }
            cur = record.next;
        }
    }

    /// Drop every record. The backing buffer is retained.
    pub fn clear(&mut self) {
        self.records.clear();
        self.free_list.clear();
    }

    /// First never-allocated slot index
    pub fn next_slot(&self) -> usize {
        self.records.len()
    }

    /// Current slot capacity
    pub fn capacity(&self) -> usize {
        self.records.capacity()
    }

    /// Number of freed slots awaiting reuse
    pub fn free_len(&self) -> usize {
        self.free_list.len()
    }

    /// Raw bytes of every allocated slot, 32 per record
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.records)
    }
}
