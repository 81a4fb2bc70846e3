//! Node table: an arena of reference-counted cells plus a unique table.
//!
//! Cells are addressed by index. Cell 0 is a permanently occupied sentry, so index 0
//! doubles as the "end of chain" marker in the collision lists.
//!
//! The unique table is a vector of buckets, each holding the head of an intrusive
//! collision chain threaded through the `next` field of the cells. A value is
//! canonical iff it is reachable from its bucket. Freed cells are unlinked from their
//! chain and pushed onto a free list, which later allocations pop from. The bucket
//! array doubles whenever the table holds more cells than buckets.

use std::ops::Index;

use log::debug;

use crate::utils::MyHash;

#[derive(Clone)]
struct Entry<T> {
    value: T,
    next: usize,
    refs: u32,
    occupied: bool,
}

impl<T> Entry<T> {
    /// Create a new cell with the given value.
    pub fn new(value: T) -> Self {
        Self {
            value,
            next: 0,
            refs: 0,
            occupied: false,
        }
    }
}

impl<T> Default for Entry<T>
where
    T: Default,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

pub struct Table<T> {
    data: Vec<Entry<T>>,

    buckets: Vec<usize>,
    bitmask: u64,
    /// Bucket count to return to on [`Table::clear`].
    initial_bits: usize,

    /// Indices of freed cells, most recently freed last.
    free: Vec<usize>,
    /// Number of occupied cells.
    real_size: usize,
}

impl<T> Table<T>
where
    T: Default,
{
    /// Create a new table with initially `2^bits` buckets.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 24, "Bucket bits should be in the range 0..=24");

        let mut data: Vec<Entry<T>> = Vec::with_capacity(1 << bits);
        data.push(Entry::default());
        data[0].occupied = true; // Set 0th cell as occupied (sentry).

        let buckets_size = 1 << bits;
        let buckets = vec![0; buckets_size];
        let bitmask = (buckets_size - 1) as u64;

        Self {
            data,
            buckets,
            bitmask,
            initial_bits: bits,
            free: Vec::new(),
            real_size: 0,
        }
    }

    /// Allocate a new cell in the table and return its index.
    pub(crate) fn alloc(&mut self) -> usize {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.data.push(Entry::default());
                self.data.len() - 1
            }
        };
        debug_assert!(!self.data[index].occupied, "Free cell {} is occupied", index);

        self.data[index].occupied = true;
        self.real_size += 1;

        index
    }

    /// Free the cell at the given index, dropping its value.
    pub fn drop(&mut self, index: usize) {
        assert_ne!(index, 0, "Index is 0");
        assert!(self.is_occupied(index), "Index {} is not occupied", index);

        let entry = &mut self.data[index];
        entry.value = T::default();
        entry.occupied = false;
        entry.next = 0;
        entry.refs = 0;
        self.free.push(index);
        self.real_size -= 1;
    }

    /// Add a new value to the table and return its index.
    ///
    /// The value is not registered in the unique table.
    pub fn add(&mut self, value: T) -> usize {
        let index = self.alloc();

        self.data[index].value = value;
        self.data[index].next = 0;
        self.data[index].refs = 0;

        index
    }

    /// Drop every cell except the sentry and shrink the buckets back to their initial size.
    pub fn clear(&mut self) {
        self.data.truncate(1);
        self.free.clear();
        let buckets_size = 1 << self.initial_bits;
        self.buckets = vec![0; buckets_size];
        self.bitmask = (buckets_size - 1) as u64;
        self.real_size = 0;
    }
}

impl<T> Table<T> {
    /// Get the number of allocated cells (including the sentry).
    pub fn capacity(&self) -> usize {
        self.data.len()
    }
    /// Get the number of occupied cells.
    pub fn real_size(&self) -> usize {
        self.real_size
    }
    /// Get the number of buckets in the unique table.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Get the reference to the value at the given index.
    pub fn value(&self, index: usize) -> &T {
        assert_ne!(index, 0, "Index is 0");
        &self.data[index].value
    }
    /// Get the mutable reference to the value at the given index.
    ///
    /// Changing a registered value requires [`Table::rehash`] afterwards.
    pub(crate) fn value_mut(&mut self, index: usize) -> &mut T {
        assert_ne!(index, 0, "Index is 0");
        &mut self.data[index].value
    }

    /// Check if the cell at the given index is occupied.
    pub fn is_occupied(&self, index: usize) -> bool {
        assert_ne!(index, 0, "Index is 0");
        self.data.get(index).is_some_and(|e| e.occupied)
    }
    /// Get the index of the next cell in the collision chain.
    pub fn next(&self, index: usize) -> usize {
        assert_ne!(index, 0, "Index is 0");
        self.data[index].next
    }
    /// Set the index of the next cell in the collision chain.
    pub fn set_next(&mut self, index: usize, next: usize) {
        assert_ne!(index, 0, "Index is 0");
        self.data[index].next = next;
    }

    /// Get the reference count of the cell.
    pub fn refs(&self, index: usize) -> u32 {
        assert_ne!(index, 0, "Index is 0");
        self.data[index].refs
    }
    /// Increment the reference count of the cell.
    pub fn retain(&mut self, index: usize) {
        assert!(self.is_occupied(index), "Index {} is not occupied", index);
        self.data[index].refs += 1;
    }
    /// Decrement the reference count of the cell and return the new count.
    pub fn release(&mut self, index: usize) -> u32 {
        assert!(self.is_occupied(index), "Index {} is not occupied", index);
        let entry = &mut self.data[index];
        assert!(entry.refs > 0, "Releasing unreferenced cell {}", index);
        entry.refs -= 1;
        entry.refs
    }

    /// Iterate over the indices of all occupied cells (excluding the sentry).
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        (1..self.data.len()).filter(|&i| self.data[i].occupied)
    }
}

impl<T> Table<T>
where
    T: MyHash,
{
    fn bucket_index(&self, value: &T) -> usize {
        (value.hash() & self.bitmask) as usize
    }

    /// Find the registered cell holding an equal value.
    pub fn find(&self, value: &T) -> Option<usize>
    where
        T: Eq,
    {
        let mut index = self.buckets[self.bucket_index(value)];
        while index != 0 {
            if value == self.value(index) {
                return Some(index);
            }
            index = self.next(index);
        }
        None
    }

    /// Add a value and register it in the unique table.
    ///
    /// The caller must ensure that no equal value is registered yet.
    pub fn insert(&mut self, value: T) -> usize
    where
        T: Default + Eq,
    {
        debug_assert!(self.find(&value).is_none(), "Value is already registered");
        let bucket_index = self.bucket_index(&value);
        let index = self.add(value);
        // Prepend to the collision chain.
        self.data[index].next = self.buckets[bucket_index];
        self.buckets[bucket_index] = index;
        if self.real_size > self.buckets.len() {
            self.grow();
        }
        index
    }

    /// Double the number of buckets and rebuild the collision chains.
    fn grow(&mut self) {
        let buckets_size = self.buckets.len() * 2;
        debug!("Growing unique table to {} buckets for {} cells", buckets_size, self.real_size);
        self.buckets = vec![0; buckets_size];
        self.bitmask = (buckets_size - 1) as u64;
        self.rehash();
    }

    /// Unlink the cell from its collision chain and free it.
    pub fn remove(&mut self, index: usize)
    where
        T: Default,
    {
        let bucket_index = self.bucket_index(self.value(index));
        let mut cur = self.buckets[bucket_index];
        let mut prev = 0;
        while cur != 0 && cur != index {
            prev = cur;
            cur = self.next(cur);
        }
        assert_eq!(cur, index, "Cell {} is not registered", index);

        let next = self.next(index);
        if prev == 0 {
            self.buckets[bucket_index] = next;
        } else {
            self.set_next(prev, next);
        }
        self.drop(index);
    }

    /// Rebuild all collision chains, e.g. after values were rewritten in place.
    pub fn rehash(&mut self) {
        self.buckets.fill(0);
        for index in 1..self.data.len() {
            if self.data[index].occupied {
                let bucket_index = self.bucket_index(&self.data[index].value);
                self.data[index].next = self.buckets[bucket_index];
                self.buckets[bucket_index] = index;
            }
        }
    }

    /// Length of the longest collision chain.
    pub fn max_chain(&self) -> usize {
        self.buckets
            .iter()
            .map(|&head| {
                let mut len = 0;
                let mut index = head;
                while index != 0 {
                    len += 1;
                    index = self.next(index);
                }
                len
            })
            .max()
            .unwrap_or(0)
    }
}

impl<T> Index<usize> for Table<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.value(index)
    }
}
