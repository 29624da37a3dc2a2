//! Submission buffer: append-only polygon slots in fixed-size blocks.
//!
//! Blocks sit behind `Arc` so a slot keeps its address when the buffer grows
//! and a worker can hold on to it while the submitting thread keeps
//! appending. Each reset bumps the generation; a worker finishing after the
//! reset finds a foreign generation (or an empty slot) and drops its result.

use std::sync::Arc;

use parking_lot::Mutex;

use super::polygon::{Polygon, Vertex};

struct Entry {
    generation: u64,
    polygon: Polygon,
}

struct Block {
    slots: Box<[Mutex<Option<Entry>>]>,
}

impl Block {
    fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| Mutex::new(None)).collect(),
        }
    }
}

/// Handle to one slot, valid for one batch generation.
#[derive(Clone)]
pub struct SlotRef {
    block: Arc<Block>,
    offset: usize,
    generation: u64,
}

impl SlotRef {
    /// Shared vertices of the slot's polygon, if the slot still belongs to
    /// this generation.
    pub fn vertices(&self) -> Option<Arc<[Vertex]>> {
        let slot = self.block.slots[self.offset].lock();
        match slot.as_ref() {
            Some(entry) if entry.generation == self.generation => {
                Some(entry.polygon.shared_vertices())
            }
            _ => None,
        }
    }

    /// Stores triangulation output. Returns `false` if the slot was reset
    /// in the meantime.
    pub fn store_indices(&self, indices: Vec<u16>) -> bool {
        let mut slot = self.block.slots[self.offset].lock();
        match slot.as_mut() {
            Some(entry) if entry.generation == self.generation => {
                entry.polygon.set_indices(indices);
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct SubmissionBuffer {
    blocks: Vec<Arc<Block>>,
    block_len: usize,
    len: usize,
    generation: u64,
}

impl SubmissionBuffer {
    pub fn new(block_len: usize) -> Self {
        let block_len = block_len.max(1);
        Self {
            blocks: vec![Arc::new(Block::new(block_len))],
            block_len,
            len: 0,
            generation: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.blocks.len() * self.block_len
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Writes `polygon` at the next slot, growing by one block when full.
    pub fn push(&mut self, polygon: Polygon) -> (usize, SlotRef) {
        if self.len == self.capacity() {
            self.blocks.push(Arc::new(Block::new(self.block_len)));
            log::trace!("submission buffer grew to {} slots", self.capacity());
        }

        let index = self.len;
        let slot = self.slot_ref(index);
        *slot.block.slots[slot.offset].lock() = Some(Entry {
            generation: self.generation,
            polygon,
        });
        self.len += 1;

        (index, slot)
    }

    /// Number of live slots still waiting for indices.
    pub fn pending(&self) -> usize {
        (0..self.len)
            .filter(|&i| {
                let (block, offset) = self.locate(i);
                self.blocks[block].slots[offset]
                    .lock()
                    .as_ref()
                    .is_some_and(|e| !e.polygon.is_indexed())
            })
            .count()
    }

    /// Moves the live polygons out, in submission order, and resets.
    pub fn drain_into(&mut self, out: &mut Vec<Polygon>) {
        for i in 0..self.len {
            let (block, offset) = self.locate(i);
            if let Some(entry) = self.blocks[block].slots[offset].lock().take() {
                out.push(entry.polygon);
            }
        }
        self.reset();
    }

    /// Empties the live slots and starts a new generation. Capacity is kept.
    pub fn reset(&mut self) {
        for i in 0..self.len {
            let (block, offset) = self.locate(i);
            *self.blocks[block].slots[offset].lock() = None;
        }
        self.len = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    #[inline]
    fn locate(&self, index: usize) -> (usize, usize) {
        (index / self.block_len, index % self.block_len)
    }

    fn slot_ref(&self, index: usize) -> SlotRef {
        let (block, offset) = self.locate(index);
        SlotRef {
            block: Arc::clone(&self.blocks[block]),
            offset,
            generation: self.generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::polygon::{TextureHandle, TextureId};
    use crate::coords::Vec2;
    use crate::paint::Color;

    const TEX: TextureHandle = TextureHandle::new(TextureId(1), 8, 8);

    fn pentagon() -> Polygon {
        let pts = [(0.0, 0.0), (4.0, 0.0), (5.0, 3.0), (2.0, 5.0), (-1.0, 3.0)]
            .iter()
            .map(|&(x, y)| Vertex::new(Vec2::new(x, y), 0.0, Color::WHITE, Vec2::ZERO))
            .collect::<Vec<_>>();
        Polygon::new(TEX, 0.0, pts).unwrap()
    }

    #[test]
    fn grows_by_whole_blocks() {
        let mut buf = SubmissionBuffer::new(4);
        for _ in 0..5 {
            buf.push(pentagon());
        }
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.capacity(), 8);
    }

    #[test]
    fn drain_resets_but_keeps_capacity() {
        let mut buf = SubmissionBuffer::new(2);
        for _ in 0..3 {
            buf.push(pentagon());
        }
        let mut out = Vec::new();
        buf.drain_into(&mut out);

        assert_eq!(out.len(), 3);
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 4);
    }

    #[test]
    fn slot_ref_survives_growth() {
        let mut buf = SubmissionBuffer::new(1);
        let (_, first) = buf.push(pentagon());
        for _ in 0..10 {
            buf.push(pentagon());
        }
        assert!(first.store_indices(vec![0, 1, 2]));
        assert_eq!(buf.pending(), 10);
    }

    #[test]
    fn stale_slot_ref_is_ignored_after_reset() {
        let mut buf = SubmissionBuffer::new(4);
        let (_, stale) = buf.push(pentagon());
        buf.reset();
        let (_, fresh) = buf.push(pentagon());

        assert!(stale.vertices().is_none());
        assert!(!stale.store_indices(vec![0, 1, 2]));
        assert!(fresh.vertices().is_some());
        assert_eq!(buf.pending(), 1);
    }
}
