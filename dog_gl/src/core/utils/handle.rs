use std::fmt::Debug;

use num::{Integer, Zero};

/// Handles for GPU resources like shader programs.
/// We use a concrete type to ensure that resource handles are always of the
/// same type no matter the backend. A handle carries the generation of its slot,
/// so once the resource is freed the handle is dead forever, even if the slot
/// gets reused by a new resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenericHandle<IndexType, GenType>
where
    IndexType: Integer,
    GenType: Integer + Zero,
{
    pub(super) index: IndexType,
    pub(super) generation: GenType,
}

pub type Handle = GenericHandle<u32, u32>;

pub trait IsHandle: Clone + Copy + Debug {
    type Index: Integer + TryInto<usize> + TryFrom<usize> + Clone + Copy + Debug;
    type Generation: Integer + Zero + Clone + Copy + Debug;
    fn index(&self) -> Self::Index;
    fn generation(&self) -> Self::Generation;
    fn new(index: Self::Index, generation: Self::Generation) -> Self;

    /// Position of the slot in the allocator storage. Indices that don't fit
    /// in a `usize` map to `usize::MAX`, which is never a valid slot
    fn array_index(&self) -> usize {
        self.index().try_into().unwrap_or(usize::MAX)
    }
}

impl<IndexType, GenType> IsHandle for GenericHandle<IndexType, GenType>
where
    IndexType: Integer + TryInto<usize> + TryFrom<usize> + Clone + Copy + Debug,
    GenType: Integer + Clone + Copy + Debug,
{
    type Generation = GenType;
    type Index = IndexType;

    fn new(index: Self::Index, generation: Self::Generation) -> Self {
        GenericHandle { index, generation }
    }

    fn generation(&self) -> Self::Generation {
        self.generation
    }

    fn index(&self) -> Self::Index {
        self.index
    }
}

/// Use this allocator in most cases. If you really need
/// one with a specific type of handle, you can use [GenerationalIndexAllocator] with
/// your specific type of Handle
pub type Allocator<V> = GenerationalIndexAllocator<Handle, V>;

/// Slot storage addressed by generational handles.
///
/// Freed slots are recycled, but every free bumps the slot generation, so
/// handles to the old value stop being live.
pub struct GenerationalIndexAllocator<K: IsHandle, V> {
    free: Vec<usize>,
    entries: Vec<AllocatorEntry<V, K::Generation>>,
    live_count: usize,
}

struct AllocatorEntry<V, G> {
    value: Option<V>,
    generation: G,
}

impl<K: IsHandle, V> Default for GenerationalIndexAllocator<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: IsHandle, V> GenerationalIndexAllocator<K, V> {
    const INITIAL_SIZE: usize = 64;

    pub fn new() -> Self {
        GenerationalIndexAllocator {
            free: Vec::new(),
            entries: Vec::with_capacity(Self::INITIAL_SIZE),
            live_count: 0,
        }
    }

    pub fn allocate(&mut self, value: V) -> K {
        self.live_count += 1;

        if let Some(free_index) = self.free.pop() {
            let entry = &mut self.entries[free_index];
            entry.value = Some(value);
            return K::new(Self::slot_to_index(free_index), entry.generation);
        }

        let next_index = self.entries.len();
        self.entries.push(AllocatorEntry {
            value: Some(value),
            generation: K::Generation::zero(),
        });

        K::new(Self::slot_to_index(next_index), K::Generation::zero())
    }

    #[inline(always)]
    pub fn is_live(&self, key: K) -> bool {
        self.entries
            .get(key.array_index())
            .is_some_and(|entry| entry.value.is_some() && entry.generation == key.generation())
    }

    /// Release the value behind `key`. Returns `None` if the handle was already dead
    pub fn free(&mut self, key: K) -> Option<V> {
        if !self.is_live(key) {
            return None;
        }

        let index = key.array_index();
        let entry = &mut self.entries[index];
        let value = entry.value.take();
        entry.generation.inc();

        // Add to the free stack again
        self.free.push(index);
        self.live_count -= 1;
        value
    }

    pub fn get(&self, key: K) -> Option<&V> {
        if !self.is_live(key) {
            return None;
        }
        self.entries[key.array_index()].value.as_ref()
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        if !self.is_live(key) {
            return None;
        }
        self.entries[key.array_index()].value.as_mut()
    }

    /// Handles of every live value, in slot order
    pub fn live_handles(&self) -> Vec<K> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.value.is_some())
            .map(|(index, entry)| K::new(Self::slot_to_index(index), entry.generation))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.live_count
    }

    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    fn slot_to_index(slot: usize) -> K::Index {
        match K::Index::try_from(slot) {
            Ok(index) => index,
            Err(_) => panic!("Handle index space exhausted at slot {slot}"),
        }
    }
}
